//! Simulator entry point — CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use v2g_sim::config::ScenarioConfig;
use v2g_sim::io::export::{ResultsDocument, export_csv, export_json};
use v2g_sim::report::render_report;
use v2g_sim::sim::engine::Engine;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    attack_time_override: Option<f32>,
    jitter_override: Option<f32>,
    noise_override: Option<f32>,
    telemetry_out: Option<String>,
    json_out: Option<String>,
    report_out: Option<String>,
    quiet: bool,
}

fn print_help() {
    eprintln!("v2g-sim — V2G charging-fleet attack-impact simulator");
    eprintln!();
    eprintln!("Usage: v2g-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, jittered, metro_fleet)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --attack-time <f32>      Override attack trigger time (seconds)");
    eprintln!("  --jitter-window <f32>    Override command jitter window (seconds)");
    eprintln!("  --noise-std <f32>        Override power noise std deviation (kW)");
    eprintln!("  --telemetry-out <path>   Export the time series to CSV");
    eprintln!("  --json-out <path>        Export series and metrics to JSON");
    eprintln!("  --report-out <path>      Write the text report to a file");
    eprintln!("  --quiet                  Suppress the report on stdout");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        attack_time_override: None,
        jitter_override: None,
        noise_override: None,
        telemetry_out: None,
        json_out: None,
        report_out: None,
        quiet: false,
    };

    fn take_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> &'a str {
        *i += 1;
        match args.get(*i) {
            Some(v) => v,
            None => {
                eprintln!("error: {flag} requires a value");
                process::exit(1);
            }
        }
    }

    fn parse_value<T: std::str::FromStr>(raw: &str, flag: &str, kind: &str) -> T {
        raw.parse().unwrap_or_else(|_| {
            eprintln!("error: {flag} value \"{raw}\" is not a valid {kind}");
            process::exit(1);
        })
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(take_value(&args, &mut i, "--scenario").to_string());
            }
            "--preset" => {
                cli.preset = Some(take_value(&args, &mut i, "--preset").to_string());
            }
            "--seed" => {
                let raw = take_value(&args, &mut i, "--seed");
                cli.seed_override = Some(parse_value(raw, "--seed", "u64"));
            }
            "--attack-time" => {
                let raw = take_value(&args, &mut i, "--attack-time");
                cli.attack_time_override = Some(parse_value(raw, "--attack-time", "number"));
            }
            "--jitter-window" => {
                let raw = take_value(&args, &mut i, "--jitter-window");
                cli.jitter_override = Some(parse_value(raw, "--jitter-window", "number"));
            }
            "--noise-std" => {
                let raw = take_value(&args, &mut i, "--noise-std");
                cli.noise_override = Some(parse_value(raw, "--noise-std", "number"));
            }
            "--telemetry-out" => {
                cli.telemetry_out = Some(take_value(&args, &mut i, "--telemetry-out").to_string());
            }
            "--json-out" => {
                cli.json_out = Some(take_value(&args, &mut i, "--json-out").to_string());
            }
            "--report-out" => {
                cli.report_out = Some(take_value(&args, &mut i, "--report-out").to_string());
            }
            "--quiet" => {
                cli.quiet = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    env_logger::Builder::from_default_env().init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(t) = cli.attack_time_override {
        scenario.attack.attack_time_s = t;
    }
    if let Some(w) = cli.jitter_override {
        scenario.attack.jitter_window_s = w;
    }
    if let Some(n) = cli.noise_override {
        scenario.attack.noise_std_kw = n;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build and run
    let mut engine = match Engine::new(scenario.to_sim_config()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    engine.run();

    let metrics = match engine.analyze() {
        Ok(metrics) => metrics,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let report = render_report(engine.config(), &metrics);
    if !cli.quiet {
        println!("{report}");
    }

    // Export CSV if requested
    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(engine.series(), Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    // Export JSON if requested
    if let Some(ref path) = cli.json_out {
        let doc = ResultsDocument::new(engine.series(), metrics.clone());
        if let Err(e) = export_json(&doc, Path::new(path)) {
            eprintln!("error: failed to write JSON: {e}");
            process::exit(1);
        }
        eprintln!("Results written to {path}");
    }

    // Write report file if requested
    if let Some(ref path) = cli.report_out {
        if let Err(e) = std::fs::write(path, &report) {
            eprintln!("error: failed to write report: {e}");
            process::exit(1);
        }
        eprintln!("Report written to {path}");
    }
}
