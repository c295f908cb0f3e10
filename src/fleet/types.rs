//! Common types and helpers for the charging-station fleet.

use rand::{Rng, rngs::StdRng};

/// Attack-role group a station belongs to, fixed by its index.
///
/// The first `min(5, n)` stations discharge into the grid before the attack;
/// the last `min(5, n)` sit idle and are switched to charging by the attack.
/// For fleets smaller than ten stations the index ranges overlap and the
/// discharge assignment wins, since it is made first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Pre-attack V2G discharge; the attack command stops the discharge.
    Discharge,
    /// Pre-attack standby; the attack command starts charging.
    Charge,
    /// Never targeted by a command.
    Idle,
}

/// Returns the role of station `index` in a fleet of `n_stations`.
pub fn role_for(index: usize, n_stations: usize) -> Role {
    let group = n_stations.min(5);
    if index < group {
        Role::Discharge
    } else if index >= n_stations - group {
        Role::Charge
    } else {
        Role::Idle
    }
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// Returns exactly `0.0` without consuming any draws when `std_dev <= 0`, so
/// noise-free runs stay deterministic across configurations.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}
