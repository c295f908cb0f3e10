//! Human-readable text report for a completed run.

use std::fmt::Write;

use crate::sim::metrics::AttackImpactMetrics;
use crate::sim::types::SimConfig;

const RULE: &str = "----------------------------------------------------------------------";

/// Renders the full run report: configuration, attack-impact metrics, and
/// the per-station statistics table.
///
/// Output is deterministic for identical inputs, so reports can be diffed
/// across runs.
pub fn render_report(config: &SimConfig, metrics: &AttackImpactMetrics) -> String {
    let mut out = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out, "V2G FLEET ATTACK SIMULATION REPORT");
    let _ = writeln!(out, "{}", "=".repeat(70));
    let _ = writeln!(out);

    let _ = writeln!(out, "CONFIGURATION");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  Simulation duration:        {:.1} s", config.t_max_s);
    let _ = writeln!(out, "  Time step:                  {:.2} s", config.dt_s);
    let _ = writeln!(out, "  Number of stations:         {}", config.n_stations);
    let _ = writeln!(out, "  Attack time:                {:.1} s", config.attack_time_s);
    let _ = writeln!(out, "  Base grid load:             {:.1} kW", config.base_load_kw);
    let _ = writeln!(
        out,
        "  Initial discharge power:    {:.1} kW",
        config.initial_discharge_kw
    );
    let _ = writeln!(
        out,
        "  Attack charge power:        {:.1} kW",
        config.attack_charge_kw
    );
    let _ = writeln!(
        out,
        "  Ramp rate:                  {:.1} kW/s",
        config.ramp_rate_kw_per_s
    );
    let _ = writeln!(
        out,
        "  Command jitter window:      {:.1} s",
        config.jitter_window_s
    );
    let _ = writeln!(out, "  Noise std deviation:        {:.1} kW", config.noise_std_kw);
    let _ = writeln!(out, "  Seed:                       {}", config.seed);
    let _ = writeln!(out);

    let _ = writeln!(out, "ATTACK IMPACT METRICS");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "  Baseline load (pre-attack): {:>10.1} kW",
        metrics.baseline_load_kw
    );
    let _ = writeln!(
        out,
        "  Post-attack load:           {:>10.1} kW",
        metrics.post_attack_load_kw
    );
    let _ = writeln!(
        out,
        "  Peak load observed:         {:>10.1} kW",
        metrics.peak_load_kw
    );
    let _ = writeln!(
        out,
        "  Peak time:                  {:>10.1} s",
        metrics.peak_time_s
    );
    let _ = writeln!(
        out,
        "  Load swing:                 {:>10.1} kW",
        metrics.load_swing_kw
    );
    let _ = writeln!(
        out,
        "  Swing percentage:           {:>10.1} %",
        metrics.swing_pct
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "STATION STATISTICS");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "{:<6} {:<12} {:<12} {:<12} {:<12} {:<12}",
        "ID", "Mean (kW)", "Std (kW)", "Min (kW)", "Max (kW)", "Final (kW)"
    );
    let _ = writeln!(out, "{RULE}");
    for (i, st) in metrics.station_stats.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<6} {:<12.2} {:<12.2} {:<12.2} {:<12.2} {:<12.2}",
            i + 1,
            st.mean_kw,
            st.std_kw,
            st.min_kw,
            st.max_kw,
            st.final_kw
        );
    }
    let _ = writeln!(out, "{}", "=".repeat(70));

    out
}
