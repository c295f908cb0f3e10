//! Simulation engine that orchestrates the fleet, scheduler, and aggregation.

use rand::{SeedableRng, rngs::StdRng};

use crate::fleet::Station;

use super::aggregator::LoadAggregator;
use super::clock::Clock;
use super::metrics::{AnalysisError, AttackImpactMetrics};
use super::scheduler::AttackScheduler;
use super::types::{ConfigError, Sample, SimConfig};

/// Simulation engine owning the fleet, scheduler, aggregator, and the run's
/// random stream.
///
/// Each run owns all of its state; nothing is shared between runs, so batch
/// sweeps can run one engine per worker with no coordination. A run is fully
/// deterministic for a given configuration: jitter offsets are drawn at
/// construction in station-index order, then noise draws happen in
/// station-index order within each tick.
pub struct Engine {
    config: SimConfig,
    stations: Vec<Station>,
    scheduler: AttackScheduler,
    aggregator: LoadAggregator,
    rng: StdRng,
    done: bool,
}

impl Engine {
    /// Creates a new engine for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration violates any run
    /// invariant; no partial state is created in that case.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let stations = (0..config.n_stations)
            .map(|i| Station::new(AttackScheduler::initial_target_kw(&config, i)))
            .collect();
        let scheduler = AttackScheduler::new(&config, &mut rng);
        let aggregator = LoadAggregator::new(config.base_load_kw, config.total_samples());

        log::info!(
            "engine initialized: {} stations, t_max={}s, attack at t={}s",
            config.n_stations,
            config.t_max_s,
            config.attack_time_s
        );

        Ok(Self {
            config,
            stations,
            scheduler,
            aggregator,
            rng,
            done: false,
        })
    }

    /// Executes one tick: fire due commands, advance every station in index
    /// order, record the sample.
    fn step(&mut self, time_s: f32) {
        self.scheduler.fire_due(time_s, &mut self.stations);

        let mut powers = Vec::with_capacity(self.stations.len());
        for st in &mut self.stations {
            powers.push(st.advance(
                self.config.dt_s,
                self.config.ramp_rate_kw_per_s,
                self.config.noise_std_kw,
                &mut self.rng,
            ));
        }

        self.aggregator.record(time_s, powers);
    }

    /// Runs the simulation to completion and returns the recorded series.
    ///
    /// The loop is synchronous and cannot be cancelled mid-run; once
    /// finished, the engine stays done and further calls return the same
    /// series without re-running.
    pub fn run(&mut self) -> &[Sample] {
        if !self.done {
            let mut clock = Clock::new(self.config.t_max_s, self.config.dt_s);
            clock.run(|tick| self.step(tick.time_s));
            self.done = true;
            log::info!("simulation complete: {} samples", self.aggregator.len());
        }
        self.aggregator.samples()
    }

    /// Computes attack-impact metrics over the recorded series.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InsufficientData` when the series holds fewer
    /// than two samples.
    pub fn analyze(&self) -> Result<AttackImpactMetrics, AnalysisError> {
        AttackImpactMetrics::from_series(self.aggregator.samples(), self.config.attack_time_s)
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns the recorded series (empty until `run` is called).
    pub fn series(&self) -> &[Sample] {
        self.aggregator.samples()
    }

    /// Returns the aggregator for derived-series queries.
    pub fn aggregator(&self) -> &LoadAggregator {
        &self.aggregator
    }

    /// Returns the scheduler's dispatch plan.
    pub fn scheduler(&self) -> &AttackScheduler {
        &self.scheduler
    }

    /// Returns `true` once the run has completed.
    pub fn is_done(&self) -> bool {
        self.done
    }
}
