use super::types::Sample;

/// Aggregates per-station powers into the run's total-load time series.
///
/// Net load convention:
/// - Positive station values increase grid load (charging)
/// - Negative station values reduce grid load (V2G discharge)
///
/// Samples are appended once per clock tick in time order and exposed
/// read-only once the run completes; the ordering carries the meaning of
/// every downstream metric (baseline window, peak time).
#[derive(Debug, Clone)]
pub struct LoadAggregator {
    base_load_kw: f32,
    samples: Vec<Sample>,
}

impl LoadAggregator {
    /// Creates an aggregator for a run of `capacity` expected ticks.
    pub fn new(base_load_kw: f32, capacity: usize) -> Self {
        Self {
            base_load_kw,
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Appends one tick: `total = sum(station_kw) + base_load`.
    pub fn record(&mut self, time_s: f32, station_kw: Vec<f32>) {
        let total_kw = station_kw.iter().sum::<f32>() + self.base_load_kw;
        self.samples.push(Sample {
            time_s,
            station_kw,
            total_kw,
        });
    }

    /// The recorded series, in tick order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The constant base load this run aggregates on top of.
    pub fn base_load_kw(&self) -> f32 {
        self.base_load_kw
    }

    /// Total grid load per tick.
    pub fn total_load_kw(&self) -> Vec<f32> {
        self.samples.iter().map(|s| s.total_kw).collect()
    }

    /// Derived net fleet contribution per tick (total minus base load).
    pub fn net_ev_kw(&self) -> Vec<f32> {
        self.samples.iter().map(Sample::net_ev_kw).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_includes_base_load() {
        let mut agg = LoadAggregator::new(500.0, 4);
        agg.record(0.0, vec![-10.0, -10.0, 0.0]);
        assert_eq!(agg.len(), 1);
        let s = &agg.samples()[0];
        assert!((s.total_kw - 480.0).abs() < 1e-6);
        assert!((s.net_ev_kw() + 20.0).abs() < 1e-6);
    }

    #[test]
    fn empty_fleet_totals_equal_base_load() {
        let mut agg = LoadAggregator::new(750.0, 2);
        agg.record(0.0, Vec::new());
        agg.record(1.0, Vec::new());
        assert_eq!(agg.total_load_kw(), vec![750.0, 750.0]);
        assert_eq!(agg.net_ev_kw(), vec![0.0, 0.0]);
    }

    #[test]
    fn samples_keep_insertion_order() {
        let mut agg = LoadAggregator::new(0.0, 3);
        for t in 0..3 {
            agg.record(t as f32, vec![t as f32]);
        }
        let times: Vec<f32> = agg.samples().iter().map(|s| s.time_s).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn derived_series_match_samples() {
        let mut agg = LoadAggregator::new(100.0, 2);
        agg.record(0.0, vec![5.0, -3.0]);
        agg.record(1.0, vec![10.0, 10.0]);
        assert_eq!(agg.total_load_kw(), vec![102.0, 120.0]);
        assert_eq!(agg.net_ev_kw(), vec![2.0, 20.0]);
    }
}
