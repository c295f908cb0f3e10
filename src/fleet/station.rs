use rand::rngs::StdRng;

use crate::fleet::types::gaussian_noise;

/// A charging station tracking its power setpoint under a ramp-rate limit.
///
/// Power moves toward `target_kw` by at most `ramp_rate * dt` per step, with
/// optional additive Gaussian measurement noise on top of the ramped value.
/// The station never changes its own target; the attack scheduler owns that.
///
/// # Power Convention
/// Negative values inject into the grid (V2G discharge), positive values draw
/// from it (charging).
#[derive(Debug, Clone)]
pub struct Station {
    /// Current power in kilowatts.
    pub power_kw: f32,
    /// Target power setpoint in kilowatts.
    pub target_kw: f32,
}

impl Station {
    /// Creates a station at zero power with the given initial target.
    pub fn new(target_kw: f32) -> Self {
        Self {
            power_kw: 0.0,
            target_kw,
        }
    }

    /// Executes one time step of the ramp-limited power update.
    ///
    /// The step toward the target is clamped to `±ramp_rate_kw_per_s * dt_s`;
    /// noise is drawn only when `noise_std_kw > 0`, so disabling noise
    /// consumes nothing from the random stream.
    ///
    /// # Returns
    ///
    /// The station power after this step, in kW.
    pub fn advance(
        &mut self,
        dt_s: f32,
        ramp_rate_kw_per_s: f32,
        noise_std_kw: f32,
        rng: &mut StdRng,
    ) -> f32 {
        let max_step = ramp_rate_kw_per_s * dt_s;
        let delta = (self.target_kw - self.power_kw).clamp(-max_step, max_step);
        self.power_kw += delta;
        self.power_kw += gaussian_noise(rng, noise_std_kw);
        self.power_kw
    }
}
