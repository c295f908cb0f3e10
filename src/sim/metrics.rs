//! Post-hoc attack-impact metrics computed from the completed time series.

use std::fmt;

use serde::Serialize;

use super::types::Sample;

/// Analysis error for series that cannot support the statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Fewer than two samples recorded (empty series, or a horizon shorter
    /// than one step).
    InsufficientData { samples: usize },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { samples } => write!(
                f,
                "analysis error: insufficient data — {samples} sample(s), need at least 2"
            ),
        }
    }
}

/// Descriptive statistics over one station's full power trace.
///
/// Population statistics, not sample-corrected.
#[derive(Debug, Clone, Serialize)]
pub struct StationStats {
    pub mean_kw: f32,
    pub std_kw: f32,
    pub min_kw: f32,
    pub max_kw: f32,
    /// Power at the final tick.
    pub final_kw: f32,
}

/// Aggregate attack-impact metrics derived from a complete simulation run.
///
/// Computed post-hoc from the recorded series to keep the reported numbers
/// consistent with the data, not with an analytic recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct AttackImpactMetrics {
    /// Total load at the last tick before the attack time (pre-attack
    /// steady state), or at the first tick when the attack starts at zero.
    pub baseline_load_kw: f32,
    /// Observed total load at the final tick (post-attack steady state).
    pub post_attack_load_kw: f32,
    /// Maximum total load over the whole series.
    pub peak_load_kw: f32,
    /// Time of the first occurrence of the peak.
    pub peak_time_s: f32,
    /// Peak minus baseline.
    pub load_swing_kw: f32,
    /// Swing as a percentage of baseline, 0 when baseline is zero.
    pub swing_pct: f32,
    /// Per-station descriptive statistics, in station-index order.
    pub station_stats: Vec<StationStats>,
}

impl AttackImpactMetrics {
    /// Computes all metrics from the recorded series.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InsufficientData` when the series holds fewer
    /// than two samples.
    pub fn from_series(samples: &[Sample], attack_time_s: f32) -> Result<Self, AnalysisError> {
        if samples.len() < 2 {
            return Err(AnalysisError::InsufficientData {
                samples: samples.len(),
            });
        }

        let baseline_load_kw = samples
            .iter()
            .rev()
            .find(|s| s.time_s < attack_time_s)
            .unwrap_or(&samples[0])
            .total_kw;

        let mut peak_load_kw = f32::NEG_INFINITY;
        let mut peak_time_s = samples[0].time_s;
        for s in samples {
            // strict comparison keeps the earliest occurrence on ties
            if s.total_kw > peak_load_kw {
                peak_load_kw = s.total_kw;
                peak_time_s = s.time_s;
            }
        }

        let post_attack_load_kw = samples[samples.len() - 1].total_kw;
        let load_swing_kw = peak_load_kw - baseline_load_kw;
        let swing_pct = if baseline_load_kw != 0.0 {
            100.0 * load_swing_kw / baseline_load_kw
        } else {
            0.0
        };

        let n_stations = samples[0].station_kw.len();
        let station_stats = (0..n_stations)
            .map(|idx| station_trace_stats(samples, idx))
            .collect();

        Ok(Self {
            baseline_load_kw,
            post_attack_load_kw,
            peak_load_kw,
            peak_time_s,
            load_swing_kw,
            swing_pct,
            station_stats,
        })
    }
}

fn station_trace_stats(samples: &[Sample], idx: usize) -> StationStats {
    let n = samples.len() as f32;
    let mut sum = 0.0_f32;
    let mut min_kw = f32::INFINITY;
    let mut max_kw = f32::NEG_INFINITY;
    for s in samples {
        let p = s.station_kw[idx];
        sum += p;
        min_kw = min_kw.min(p);
        max_kw = max_kw.max(p);
    }
    let mean_kw = sum / n;

    let mut sq_sum = 0.0_f32;
    for s in samples {
        let d = s.station_kw[idx] - mean_kw;
        sq_sum += d * d;
    }

    StationStats {
        mean_kw,
        std_kw: (sq_sum / n).sqrt(),
        min_kw,
        max_kw,
        final_kw: samples[samples.len() - 1].station_kw[idx],
    }
}

impl fmt::Display for AttackImpactMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Attack Impact ---")?;
        writeln!(f, "Baseline load:        {:.1} kW", self.baseline_load_kw)?;
        writeln!(f, "Post-attack load:     {:.1} kW", self.post_attack_load_kw)?;
        writeln!(
            f,
            "Peak load:            {:.1} kW at t={:.1}s",
            self.peak_load_kw, self.peak_time_s
        )?;
        writeln!(f, "Load swing:           {:.1} kW", self.load_swing_kw)?;
        write!(f, "Swing percentage:     {:.1}%", self.swing_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time_s: f32, station_kw: Vec<f32>, base: f32) -> Sample {
        let total_kw = station_kw.iter().sum::<f32>() + base;
        Sample {
            time_s,
            station_kw,
            total_kw,
        }
    }

    fn flat_series(totals: &[f32]) -> Vec<Sample> {
        totals
            .iter()
            .enumerate()
            .map(|(t, &v)| sample(t as f32, vec![v], 0.0))
            .collect()
    }

    #[test]
    fn baseline_is_last_pre_attack_sample() {
        let series = flat_series(&[450.0, 452.0, 600.0, 600.0]);
        let m = AttackImpactMetrics::from_series(&series, 2.0).unwrap();
        assert_eq!(m.baseline_load_kw, 452.0);
    }

    #[test]
    fn baseline_falls_back_to_first_sample() {
        let series = flat_series(&[450.0, 500.0, 600.0]);
        let m = AttackImpactMetrics::from_series(&series, 0.0).unwrap();
        assert_eq!(m.baseline_load_kw, 450.0);
    }

    #[test]
    fn peak_tie_breaks_to_earliest_time() {
        let series = flat_series(&[100.0, 300.0, 200.0, 300.0]);
        let m = AttackImpactMetrics::from_series(&series, 1.0).unwrap();
        assert_eq!(m.peak_load_kw, 300.0);
        assert_eq!(m.peak_time_s, 1.0);
    }

    #[test]
    fn swing_and_percentage() {
        let series = flat_series(&[450.0, 450.0, 600.0]);
        let m = AttackImpactMetrics::from_series(&series, 2.0).unwrap();
        assert!((m.load_swing_kw - 150.0).abs() < 1e-4);
        assert!((m.swing_pct - 33.3333).abs() < 1e-2);
    }

    #[test]
    fn zero_baseline_reports_zero_percentage() {
        let series = flat_series(&[0.0, 0.0, 50.0]);
        let m = AttackImpactMetrics::from_series(&series, 2.0).unwrap();
        assert_eq!(m.swing_pct, 0.0);
        assert_eq!(m.load_swing_kw, 50.0);
    }

    #[test]
    fn post_attack_is_final_sample() {
        let series = flat_series(&[450.0, 600.0, 590.0]);
        let m = AttackImpactMetrics::from_series(&series, 1.0).unwrap();
        assert_eq!(m.post_attack_load_kw, 590.0);
    }

    #[test]
    fn station_stats_are_population_statistics() {
        // trace: [2, 4, 4, 4, 6] -> mean 4, population std sqrt(8/5)
        let series: Vec<Sample> = [2.0, 4.0, 4.0, 4.0, 6.0]
            .iter()
            .enumerate()
            .map(|(t, &p)| sample(t as f32, vec![p], 0.0))
            .collect();
        let m = AttackImpactMetrics::from_series(&series, 10.0).unwrap();
        let st = &m.station_stats[0];
        assert!((st.mean_kw - 4.0).abs() < 1e-5);
        assert!((st.std_kw - (8.0_f32 / 5.0).sqrt()).abs() < 1e-5);
        assert_eq!(st.min_kw, 2.0);
        assert_eq!(st.max_kw, 6.0);
        assert_eq!(st.final_kw, 6.0);
    }

    #[test]
    fn empty_fleet_yields_empty_stats() {
        let series = vec![sample(0.0, vec![], 500.0), sample(1.0, vec![], 500.0)];
        let m = AttackImpactMetrics::from_series(&series, 0.5).unwrap();
        assert!(m.station_stats.is_empty());
        assert_eq!(m.baseline_load_kw, 500.0);
    }

    #[test]
    fn empty_series_is_insufficient() {
        let err = AttackImpactMetrics::from_series(&[], 10.0).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientData { samples: 0 });
    }

    #[test]
    fn single_sample_is_insufficient() {
        let series = flat_series(&[500.0]);
        let err = AttackImpactMetrics::from_series(&series, 10.0).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientData { samples: 1 });
    }

    #[test]
    fn display_does_not_panic() {
        let series = flat_series(&[450.0, 600.0]);
        let m = AttackImpactMetrics::from_series(&series, 1.0).unwrap();
        let text = format!("{m}");
        assert!(text.contains("Load swing"));
    }
}
