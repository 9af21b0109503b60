use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{ScoredCombination, measured};

/// Column headers of the exported table, in output order.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Sender",
    "Receiver",
    "GFP",
    "mCherry",
    "TriggerTime_min",
    "diff_score",
];

/// Write ranked matches as CSV. Undefined values are left blank.
pub fn write_csv<W: Write>(writer: W, matches: &[ScoredCombination]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for m in matches {
        let r = &m.record;
        wtr.write_record([
            r.sender.clone(),
            r.receiver.clone(),
            optional_cell(measured(r.gfp)),
            optional_cell(measured(r.mcherry)),
            optional_cell(r.trigger_minutes),
            optional_cell(m.diff_score),
        ])?;
    }
    wtr.flush().context("flushing CSV output")?;
    Ok(())
}

/// Write ranked matches to a CSV file at `path`.
pub fn export_csv(path: &Path, matches: &[ScoredCombination]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, matches).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} matches to {}", matches.len(), path.display());
    Ok(())
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
