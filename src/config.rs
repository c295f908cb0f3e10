//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::types::{ConfigError, SimConfig};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the canonical attack scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default, then lower into the
/// core config with [`ScenarioConfig::to_sim_config`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationSection,
    /// Grid parameters outside the fleet.
    #[serde(default)]
    pub grid: GridSection,
    /// Charging-fleet composition and dynamics.
    #[serde(default)]
    pub fleet: FleetSection,
    /// Attack timing and disturbance parameters.
    #[serde(default)]
    pub attack: AttackSection,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Total duration in seconds (must be > 0).
    pub t_max_s: f32,
    /// Step size in seconds (must be > 0).
    pub dt_s: f32,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            t_max_s: 100.0,
            dt_s: 1.0,
            seed: 42,
        }
    }
}

/// Grid parameters outside the fleet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSection {
    /// Base load excluding the fleet (kW).
    pub base_load_kw: f32,
}

impl Default for GridSection {
    fn default() -> Self {
        Self { base_load_kw: 500.0 }
    }
}

/// Charging-fleet composition and dynamics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FleetSection {
    /// Number of stations (0 runs a grid-only scenario).
    pub n_stations: usize,
    /// Pre-attack discharge setpoint for the first station group (kW).
    pub initial_discharge_kw: f32,
    /// Post-attack charge setpoint for the last station group (kW).
    pub attack_charge_kw: f32,
    /// Maximum power change rate per station (kW/s, must be > 0).
    pub ramp_rate_kw_per_s: f32,
}

impl Default for FleetSection {
    fn default() -> Self {
        Self {
            n_stations: 10,
            initial_discharge_kw: -10.0,
            attack_charge_kw: 20.0,
            ramp_rate_kw_per_s: 10.0,
        }
    }
}

/// Attack timing and disturbance parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttackSection {
    /// Trigger time in seconds; beyond the horizon means no attack fires.
    pub attack_time_s: f32,
    /// Command delivery jitter window in seconds (0 = synchronous).
    pub jitter_window_s: f32,
    /// Per-step power noise standard deviation (kW).
    pub noise_std_kw: f32,
}

impl Default for AttackSection {
    fn default() -> Self {
        Self {
            attack_time_s: 60.0,
            jitter_window_s: 0.0,
            noise_std_kw: 0.0,
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: ten stations, synchronous noiseless
    /// attack at t=60s.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationSection::default(),
            grid: GridSection::default(),
            fleet: FleetSection::default(),
            attack: AttackSection::default(),
        }
    }

    /// Returns the jittered preset: distributed command delivery with
    /// measurement noise, the realistic-botnet variant.
    pub fn jittered() -> Self {
        Self {
            attack: AttackSection {
                jitter_window_s: 15.0,
                noise_std_kw: 0.5,
                ..AttackSection::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the metro-fleet preset: a larger urban fleet on a heavier
    /// feeder with slower ramps and a later trigger.
    pub fn metro_fleet() -> Self {
        Self {
            simulation: SimulationSection {
                t_max_s: 240.0,
                ..SimulationSection::default()
            },
            grid: GridSection {
                base_load_kw: 2000.0,
            },
            fleet: FleetSection {
                n_stations: 40,
                initial_discharge_kw: -12.0,
                attack_charge_kw: 22.0,
                ramp_rate_kw_per_s: 8.0,
            },
            attack: AttackSection {
                attack_time_s: 120.0,
                jitter_window_s: 5.0,
                noise_std_kw: 0.3,
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "jittered", "metro_fleet"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "jittered" => Ok(Self::jittered()),
            "metro_fleet" => Ok(Self::metro_fleet()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if !s.t_max_s.is_finite() || s.t_max_s <= 0.0 {
            errors.push(ConfigError::new("simulation.t_max_s", "must be finite and > 0"));
        }
        if !s.dt_s.is_finite() || s.dt_s <= 0.0 {
            errors.push(ConfigError::new("simulation.dt_s", "must be finite and > 0"));
        }

        if !self.grid.base_load_kw.is_finite() {
            errors.push(ConfigError::new("grid.base_load_kw", "must be finite"));
        }

        let fl = &self.fleet;
        if !fl.ramp_rate_kw_per_s.is_finite() || fl.ramp_rate_kw_per_s <= 0.0 {
            errors.push(ConfigError::new(
                "fleet.ramp_rate_kw_per_s",
                "must be finite and > 0",
            ));
        }
        if !fl.initial_discharge_kw.is_finite() {
            errors.push(ConfigError::new("fleet.initial_discharge_kw", "must be finite"));
        }
        if !fl.attack_charge_kw.is_finite() {
            errors.push(ConfigError::new("fleet.attack_charge_kw", "must be finite"));
        }

        let a = &self.attack;
        if !a.attack_time_s.is_finite() || a.attack_time_s < 0.0 {
            errors.push(ConfigError::new(
                "attack.attack_time_s",
                "must be finite and >= 0",
            ));
        }
        if !a.jitter_window_s.is_finite() || a.jitter_window_s < 0.0 {
            errors.push(ConfigError::new(
                "attack.jitter_window_s",
                "must be finite and >= 0",
            ));
        }
        if !a.noise_std_kw.is_finite() || a.noise_std_kw < 0.0 {
            errors.push(ConfigError::new(
                "attack.noise_std_kw",
                "must be finite and >= 0",
            ));
        }

        errors
    }

    /// Lowers the scenario into the flat core configuration.
    pub fn to_sim_config(&self) -> SimConfig {
        SimConfig {
            t_max_s: self.simulation.t_max_s,
            dt_s: self.simulation.dt_s,
            n_stations: self.fleet.n_stations,
            base_load_kw: self.grid.base_load_kw,
            attack_time_s: self.attack.attack_time_s,
            initial_discharge_kw: self.fleet.initial_discharge_kw,
            attack_charge_kw: self.fleet.attack_charge_kw,
            ramp_rate_kw_per_s: self.fleet.ramp_rate_kw_per_s,
            jitter_window_s: self.attack.jitter_window_s,
            noise_std_kw: self.attack.noise_std_kw,
            seed: self.simulation.seed,
        }
    }
}
