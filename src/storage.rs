use crate::models::Observation;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn safe_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save observations as CSV: `time_id,time_label,observation,value`, one row per observation.
pub fn save_csv<P: AsRef<Path>>(observations: &[Observation], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(["time_id", "time_label", "observation", "value"])?;
    for o in observations {
        let time = o.time();
        let id = time.map(|t| t.id.as_str()).unwrap_or_default();
        let label = time.and_then(|t| t.label.as_deref()).unwrap_or_default();
        let value = o.value().map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            safe_cell(id),
            safe_cell(label),
            safe_cell(&o.observation),
            value,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save observations as a pretty JSON array, exactly as received.
pub fn save_json<P: AsRef<Path>>(observations: &[Observation], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(observations)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
