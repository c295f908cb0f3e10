//! Core simulation types: run configuration, sample records, and config errors.

use std::fmt;

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"attack.jitter_window_s"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

/// Validated run configuration consumed by the engine.
///
/// The engine and all fleet components reference this struct; it is immutable
/// for the lifetime of a run. Build it directly for programmatic use or lower
/// a [`crate::config::ScenarioConfig`] loaded from TOML.
///
/// # Examples
///
/// ```
/// use v2g_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::default();
/// assert_eq!(cfg.total_samples(), 101);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Total simulation duration in seconds.
    pub t_max_s: f32,
    /// Time step size in seconds.
    pub dt_s: f32,
    /// Number of charging stations in the fleet.
    pub n_stations: usize,
    /// Base grid load excluding the fleet (kW).
    pub base_load_kw: f32,
    /// Attack trigger time in seconds. Values beyond `t_max_s` produce an
    /// attack-free run.
    pub attack_time_s: f32,
    /// Pre-attack discharge setpoint for the first station group (kW,
    /// negative = injecting into the grid).
    pub initial_discharge_kw: f32,
    /// Post-attack charge setpoint for the last station group (kW).
    pub attack_charge_kw: f32,
    /// Maximum power change rate per station (kW/s).
    pub ramp_rate_kw_per_s: f32,
    /// Command delivery jitter window in seconds (0 = synchronous dispatch).
    pub jitter_window_s: f32,
    /// Per-step Gaussian power noise standard deviation (kW, 0 = none).
    pub noise_std_kw: f32,
    /// Master random seed for jitter and noise draws.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            t_max_s: 100.0,
            dt_s: 1.0,
            n_stations: 10,
            base_load_kw: 500.0,
            attack_time_s: 60.0,
            initial_discharge_kw: -10.0,
            attack_charge_kw: 20.0,
            ramp_rate_kw_per_s: 10.0,
            jitter_window_s: 0.0,
            noise_std_kw: 0.0,
            seed: 42,
        }
    }
}

impl SimConfig {
    /// Total number of samples a run produces, one per clock tick
    /// (`floor(t_max / dt) + 1`, the `t = 0` sample included).
    pub fn total_samples(&self) -> usize {
        (self.t_max_s / self.dt_s).floor() as usize + 1
    }

    /// Checks all run invariants.
    ///
    /// Called by [`crate::sim::engine::Engine::new`] before any run state is
    /// created, so a rejected configuration leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_fields = [
            ("t_max_s", self.t_max_s),
            ("dt_s", self.dt_s),
            ("base_load_kw", self.base_load_kw),
            ("attack_time_s", self.attack_time_s),
            ("initial_discharge_kw", self.initial_discharge_kw),
            ("attack_charge_kw", self.attack_charge_kw),
            ("ramp_rate_kw_per_s", self.ramp_rate_kw_per_s),
            ("jitter_window_s", self.jitter_window_s),
            ("noise_std_kw", self.noise_std_kw),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(ConfigError::new(field, "must be finite"));
            }
        }

        if self.t_max_s <= 0.0 {
            return Err(ConfigError::new("t_max_s", "must be > 0"));
        }
        if self.dt_s <= 0.0 {
            return Err(ConfigError::new("dt_s", "must be > 0"));
        }
        if self.ramp_rate_kw_per_s <= 0.0 {
            return Err(ConfigError::new("ramp_rate_kw_per_s", "must be > 0"));
        }
        if self.attack_time_s < 0.0 {
            return Err(ConfigError::new("attack_time_s", "must be >= 0"));
        }
        if self.jitter_window_s < 0.0 {
            return Err(ConfigError::new("jitter_window_s", "must be >= 0"));
        }
        if self.noise_std_kw < 0.0 {
            return Err(ConfigError::new("noise_std_kw", "must be >= 0"));
        }

        Ok(())
    }
}

/// One recorded simulation tick: timestamp, per-station power snapshot
/// (ordered by station index), and total grid load.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Simulation time in seconds.
    pub time_s: f32,
    /// Power of each station at this tick (kW, index order).
    pub station_kw: Vec<f32>,
    /// Total grid load: station sum plus base load (kW).
    pub total_kw: f32,
}

impl Sample {
    /// Net fleet contribution to grid load (total minus base load).
    pub fn net_ev_kw(&self) -> f32 {
        self.station_kw.iter().sum()
    }
}
