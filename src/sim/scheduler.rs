//! Attack command scheduling: role targets, jittered dispatch times, firing.

use std::fmt;

use rand::{Rng, rngs::StdRng};

use crate::fleet::Station;
use crate::fleet::types::{Role, role_for};

use super::types::SimConfig;

/// Remote-control command a compromised CSMS sends to a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Start a charging transaction (charge group, target = attack charge).
    StartTransaction,
    /// Stop the running transaction (discharge group, target = 0).
    StopTransaction,
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTransaction => write!(f, "RemoteStartTransaction"),
            Self::StopTransaction => write!(f, "RemoteStopTransaction"),
        }
    }
}

/// One planned command: which station, what to do, and when it lands.
#[derive(Debug, Clone)]
pub struct PlannedCommand {
    /// Target station index.
    pub station: usize,
    pub command: RemoteCommand,
    /// Target power the command applies (kW).
    pub target_kw: f32,
    /// Simulated time the command takes effect, jitter included.
    pub dispatch_time_s: f32,
    fired: bool,
}

/// Assigns attack roles and delivers each station's command exactly once.
///
/// The dispatch plan is fixed at construction: every role station gets a
/// command time of `attack_time + uniform(0, jitter_window)`, the offsets
/// drawn in station-index order from the run's random stream (or zero when
/// the window is zero, for perfectly synchronous delivery). A command fires
/// on the first tick whose time reaches its dispatch time and is idempotent
/// afterwards.
pub struct AttackScheduler {
    commands: Vec<PlannedCommand>,
}

impl AttackScheduler {
    /// Builds the dispatch plan for a validated configuration.
    ///
    /// Consumes one uniform draw per role station when jitter is enabled;
    /// idle mid-fleet stations have no command and consume nothing.
    pub fn new(config: &SimConfig, rng: &mut StdRng) -> Self {
        let mut commands = Vec::new();
        for index in 0..config.n_stations {
            let (command, target_kw) = match role_for(index, config.n_stations) {
                Role::Discharge => (RemoteCommand::StopTransaction, 0.0),
                Role::Charge => (RemoteCommand::StartTransaction, config.attack_charge_kw),
                Role::Idle => continue,
            };
            let offset = if config.jitter_window_s > 0.0 {
                rng.random_range(0.0..=config.jitter_window_s)
            } else {
                0.0
            };
            commands.push(PlannedCommand {
                station: index,
                command,
                target_kw,
                dispatch_time_s: config.attack_time_s + offset,
                fired: false,
            });
        }
        Self { commands }
    }

    /// Pre-attack target for station `index`: the discharge group holds its
    /// discharge setpoint, everyone else stands by at zero.
    pub fn initial_target_kw(config: &SimConfig, index: usize) -> f32 {
        match role_for(index, config.n_stations) {
            Role::Discharge => config.initial_discharge_kw,
            Role::Charge | Role::Idle => 0.0,
        }
    }

    /// Applies every not-yet-fired command whose dispatch time has been
    /// reached, retargeting the affected stations.
    ///
    /// # Returns
    ///
    /// The number of commands fired this tick.
    pub fn fire_due(&mut self, time_s: f32, stations: &mut [Station]) -> usize {
        let mut fired = 0;
        for cmd in &mut self.commands {
            if !cmd.fired && time_s >= cmd.dispatch_time_s {
                stations[cmd.station].target_kw = cmd.target_kw;
                cmd.fired = true;
                fired += 1;
                log::info!(
                    "[t={time_s:.1}s] {} -> station {} target={:.1} kW",
                    cmd.command,
                    cmd.station,
                    cmd.target_kw
                );
            }
        }
        fired
    }

    /// The planned commands, in station-index order.
    pub fn commands(&self) -> &[PlannedCommand] {
        &self.commands
    }

    /// Earliest dispatch time across the plan, if any command exists.
    pub fn earliest_dispatch_s(&self) -> Option<f32> {
        self.commands
            .iter()
            .map(|c| c.dispatch_time_s)
            .reduce(f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn stations(config: &SimConfig) -> Vec<Station> {
        (0..config.n_stations)
            .map(|i| Station::new(AttackScheduler::initial_target_kw(config, i)))
            .collect()
    }

    #[test]
    fn initial_targets_follow_roles() {
        let config = SimConfig::default();
        let fleet = stations(&config);
        for st in &fleet[..5] {
            assert_eq!(st.target_kw, -10.0);
        }
        for st in &fleet[5..] {
            assert_eq!(st.target_kw, 0.0);
        }
    }

    #[test]
    fn zero_jitter_plans_all_commands_at_attack_time() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let sched = AttackScheduler::new(&config, &mut rng);
        assert_eq!(sched.commands().len(), 10);
        for cmd in sched.commands() {
            assert_eq!(cmd.dispatch_time_s, 60.0);
        }
        assert_eq!(sched.earliest_dispatch_s(), Some(60.0));
    }

    #[test]
    fn jitter_offsets_stay_inside_window() {
        let config = SimConfig {
            jitter_window_s: 15.0,
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let sched = AttackScheduler::new(&config, &mut rng);
        for cmd in sched.commands() {
            assert!(cmd.dispatch_time_s >= 60.0);
            assert!(cmd.dispatch_time_s <= 75.0);
        }
    }

    #[test]
    fn commands_fire_exactly_once() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut sched = AttackScheduler::new(&config, &mut rng);
        let mut fleet = stations(&config);

        assert_eq!(sched.fire_due(59.0, &mut fleet), 0);
        assert_eq!(sched.fire_due(60.0, &mut fleet), 10);
        assert_eq!(sched.fire_due(61.0, &mut fleet), 0);

        for st in &fleet[..5] {
            assert_eq!(st.target_kw, 0.0);
        }
        for st in &fleet[5..] {
            assert_eq!(st.target_kw, 20.0);
        }
    }

    #[test]
    fn attack_beyond_horizon_never_fires() {
        let config = SimConfig {
            attack_time_s: 150.0,
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut sched = AttackScheduler::new(&config, &mut rng);
        let mut fleet = stations(&config);

        let mut t = 0.0;
        while t <= config.t_max_s {
            assert_eq!(sched.fire_due(t, &mut fleet), 0);
            t += config.dt_s;
        }
        for st in &fleet[..5] {
            assert_eq!(st.target_kw, -10.0);
        }
    }

    #[test]
    fn attack_at_zero_fires_on_first_tick() {
        let config = SimConfig {
            attack_time_s: 0.0,
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut sched = AttackScheduler::new(&config, &mut rng);
        let mut fleet = stations(&config);
        assert_eq!(sched.fire_due(0.0, &mut fleet), 10);
    }

    #[test]
    fn small_fleet_has_no_charge_commands() {
        let config = SimConfig {
            n_stations: 4,
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let sched = AttackScheduler::new(&config, &mut rng);
        // all four stations take the discharge role; each gets a stop command
        assert_eq!(sched.commands().len(), 4);
        for cmd in sched.commands() {
            assert_eq!(cmd.command, RemoteCommand::StopTransaction);
        }
    }

    #[test]
    fn large_fleet_skips_idle_middle() {
        let config = SimConfig {
            n_stations: 14,
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let sched = AttackScheduler::new(&config, &mut rng);
        assert_eq!(sched.commands().len(), 10);
        let targeted: Vec<usize> = sched.commands().iter().map(|c| c.station).collect();
        assert_eq!(targeted, vec![0, 1, 2, 3, 4, 9, 10, 11, 12, 13]);
    }
}
