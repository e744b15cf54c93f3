//! Trace export to CSV and JSON.

use crate::ResultsResult;
use crate::types::RunRecord;
use ht_sim::SimulationTrace;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Render a trace as CSV, one row per sample.
///
/// Columns are `time_s,temperature_c,control,raw_control`, plus `height_m`
/// when the trace carries a level series.
pub fn to_csv_string(trace: &SimulationTrace) -> String {
    let with_height = trace.height_m.is_some();
    let mut csv = String::from("time_s,temperature_c,control,raw_control");
    if with_height {
        csv.push_str(",height_m");
    }
    csv.push('\n');

    for s in trace.samples() {
        let _ = write!(
            csv,
            "{},{},{},{}",
            s.time_s, s.temperature_c, s.control, s.raw_control
        );
        if let Some(h) = s.height_m {
            let _ = write!(csv, ",{}", h);
        }
        csv.push('\n');
    }
    csv
}

pub fn write_csv(path: &Path, trace: &SimulationTrace) -> ResultsResult<()> {
    std::fs::write(path, to_csv_string(trace))?;
    info!(path = %path.display(), rows = trace.len(), "wrote trace CSV");
    Ok(())
}

pub fn write_json(path: &Path, record: &RunRecord) -> ResultsResult<()> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), run_id = %record.manifest.run_id, "wrote run record");
    Ok(())
}

pub fn read_json(path: &Path) -> ResultsResult<RunRecord> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
