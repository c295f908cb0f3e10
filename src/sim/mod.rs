/// Load aggregation into the run time series.
pub mod aggregator;
/// Simulation clock for timestep management.
pub mod clock;
pub mod engine;
/// Attack-impact metrics derived from the finished series.
pub mod metrics;
/// Attack command scheduling and dispatch.
pub mod scheduler;
pub mod types;
