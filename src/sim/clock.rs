/// A simulation clock stepping discrete time from zero to a fixed horizon.
///
/// Ticks run at `t = 0, dt, 2*dt, ...` up to and including
/// `floor(t_max / dt) * dt`, so the horizon itself is sampled whenever it is
/// an exact multiple of the step size.
///
/// # Examples
///
/// ```
/// use v2g_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(2.0, 1.0);
/// let mut times = Vec::new();
///
/// clock.run(|tick| times.push(tick.time_s));
/// assert_eq!(times, vec![0.0, 1.0, 2.0]);
/// ```
pub struct Clock {
    /// Current step of the simulation
    current: usize,
    /// Total ticks the clock will produce
    total: usize,
    /// Step size in seconds
    dt_s: f32,
}

/// One clock tick: step index and the simulated time it maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub step: usize,
    pub time_s: f32,
}

impl Clock {
    /// Creates a clock covering `[0, t_max_s]` at step size `dt_s`.
    ///
    /// Both arguments must be positive; the engine validates them before
    /// construction.
    pub fn new(t_max_s: f32, dt_s: f32) -> Self {
        Self {
            current: 0,
            total: (t_max_s / dt_s).floor() as usize + 1,
            dt_s,
        }
    }

    /// Advances the clock by one tick.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The tick to simulate, before advancing
    /// * `None` - If the clock has passed the horizon
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some(Tick {
                step,
                time_s: step as f32 * self.dt_s,
            })
        } else {
            None
        }
    }

    /// Runs a function for each remaining tick until the horizon is reached.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }

    /// Returns `true` once every tick has been consumed.
    pub fn is_done(&self) -> bool {
        self.current >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_sequence() {
        let mut clock = Clock::new(2.0, 1.0);
        assert_eq!(clock.tick().map(|t| t.time_s), Some(0.0));
        assert_eq!(clock.tick().map(|t| t.time_s), Some(1.0));
        assert_eq!(clock.tick().map(|t| t.time_s), Some(2.0));
        assert_eq!(clock.tick(), None);
        assert!(clock.is_done());
    }

    #[test]
    fn test_horizon_included_when_divisible() {
        let mut clock = Clock::new(10.0, 2.5);
        let mut times = Vec::new();
        clock.run(|t| times.push(t.time_s));
        assert_eq!(times, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_uneven_horizon_truncates() {
        let mut clock = Clock::new(10.0, 3.0);
        let mut times = Vec::new();
        clock.run(|t| times.push(t.time_s));
        assert_eq!(times, vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_sub_step_horizon_yields_single_tick() {
        let mut clock = Clock::new(0.5, 1.0);
        let mut count = 0;
        clock.run(|_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_run_consumes_everything() {
        let mut clock = Clock::new(3.0, 1.0);
        let mut steps = Vec::new();
        clock.run(|t| steps.push(t.step));
        assert_eq!(steps, vec![0, 1, 2, 3]);

        let mut was_called = false;
        clock.run(|_| was_called = true);
        assert!(!was_called);
    }
}
