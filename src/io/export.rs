//! CSV and JSON export for simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::metrics::AttackImpactMetrics;
use crate::sim::types::Sample;

/// Fixed leading columns of the CSV telemetry schema; one `station_<i>`
/// column per station follows, in index order.
const FIXED_HEADER: [&str; 3] = ["time_s", "net_ev_kw", "total_load_kw"];

/// Exports the recorded series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(samples: &[Sample], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(samples, buf)
}

/// Writes the recorded series as CSV to any writer.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(samples: &[Sample], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let n_stations = samples.first().map_or(0, |s| s.station_kw.len());

    // Header
    let mut header: Vec<String> = FIXED_HEADER.iter().map(|s| s.to_string()).collect();
    for i in 0..n_stations {
        header.push(format!("station_{}", i + 1));
    }
    wtr.write_record(&header)?;

    // Data rows
    for s in samples {
        let mut record = vec![
            format!("{:.2}", s.time_s),
            format!("{:.4}", s.net_ev_kw()),
            format!("{:.4}", s.total_kw),
        ];
        for p in &s.station_kw {
            record.push(format!("{p:.4}"));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Structured results document: the full series plus the derived metrics,
/// the shape downstream tooling ingests.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsDocument {
    /// Tick timestamps in seconds.
    pub time_s: Vec<f32>,
    /// Total grid load per tick (kW).
    pub total_grid_load_kw: Vec<f32>,
    /// Net fleet contribution per tick (kW).
    pub net_ev_power_kw: Vec<f32>,
    /// Per-station power traces, station-index order.
    pub stations: Vec<Vec<f32>>,
    /// Attack-impact metrics for the run.
    pub metrics: AttackImpactMetrics,
}

impl ResultsDocument {
    /// Assembles the document from the recorded series and its metrics.
    pub fn new(samples: &[Sample], metrics: AttackImpactMetrics) -> Self {
        let n_stations = samples.first().map_or(0, |s| s.station_kw.len());
        let stations = (0..n_stations)
            .map(|i| samples.iter().map(|s| s.station_kw[i]).collect())
            .collect();
        Self {
            time_s: samples.iter().map(|s| s.time_s).collect(),
            total_grid_load_kw: samples.iter().map(|s| s.total_kw).collect(),
            net_ev_power_kw: samples.iter().map(Sample::net_ev_kw).collect(),
            stations,
            metrics,
        }
    }
}

/// Exports the results document as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_json(doc: &ResultsDocument, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_json(doc, buf)
}

/// Writes the results document as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_json(doc: &ResultsDocument, writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, doc).map_err(io::Error::other)
}
