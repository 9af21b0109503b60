use thiserror::Error;

use super::model::{
    CombinationRecord, DurationMatrix, ExpressionMatrix, PromoterMatrix, RawDataset,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The three matrices cannot be aligned into one table.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("{matrix} matrix has no rows or no columns")]
    Empty { matrix: &'static str },

    #[error("{matrix} matrix receiver labels {found:?} differ from GFP labels {expected:?}")]
    RowLabelMismatch {
        matrix: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{matrix} matrix sender labels {found:?} differ from GFP labels {expected:?}")]
    ColumnLabelMismatch {
        matrix: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{matrix} matrix has {found} value rows for {expected} receiver labels")]
    RowCount {
        matrix: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{matrix} matrix: expected {expected_rows}×{expected_cols} cells, row {row} has {found}")]
    Ragged {
        matrix: &'static str,
        expected_rows: usize,
        expected_cols: usize,
        row: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Duration parsing
// ---------------------------------------------------------------------------

/// Convert an `HH:MM:SS` string into minutes.
///
/// Returns `None` for anything that is not exactly three integer fields;
/// this is a per-cell condition, not an error.
pub fn normalize_duration(raw: &str) -> Option<f64> {
    let mut fields = raw.split(':');
    let h = fields.next()?.trim().parse::<i64>().ok()?;
    let m = fields.next()?.trim().parse::<i64>().ok()?;
    let s = fields.next()?.trim().parse::<i64>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(h as f64 * 60.0 + m as f64 + s as f64 / 60.0)
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Align the three matrices by label and emit one record per cell,
/// row-major (receiver fixed, senders swept).
pub fn build_flat_table(
    gfp: &ExpressionMatrix,
    mcherry: &ExpressionMatrix,
    duration: &DurationMatrix,
) -> Result<Vec<CombinationRecord>, TableError> {
    check_rectangular("GFP", gfp)?;
    check_aligned("mCherry", gfp, mcherry)?;
    check_aligned("time", gfp, duration)?;

    let minutes = duration.map(|raw| normalize_duration(raw));
    let undefined = minutes
        .values
        .iter()
        .flatten()
        .filter(|m| m.is_none())
        .count();
    if undefined > 0 {
        log::warn!("{undefined} trigger time cell(s) could not be parsed as HH:MM:SS");
    }

    let (rows, cols) = gfp.shape();
    let mut records = Vec::with_capacity(rows * cols);
    for (r, receiver) in gfp.receivers.iter().enumerate() {
        for (c, sender) in gfp.senders.iter().enumerate() {
            let trigger_minutes = minutes.values[r][c];
            if trigger_minutes.is_none() {
                log::debug!(
                    "({receiver}, {sender}): unparseable duration {:?}",
                    duration.values[r][c]
                );
            }
            records.push(CombinationRecord {
                sender: sender.clone(),
                receiver: receiver.clone(),
                gfp: gfp.values[r][c],
                mcherry: mcherry.values[r][c],
                trigger_minutes,
            });
        }
    }
    Ok(records)
}

impl RawDataset {
    /// Flatten into the long table; see [`build_flat_table`].
    pub fn to_table(&self) -> Result<Vec<CombinationRecord>, TableError> {
        build_flat_table(&self.gfp, &self.mcherry, &self.time)
    }
}

fn check_rectangular<T>(name: &'static str, m: &PromoterMatrix<T>) -> Result<(), TableError> {
    let (rows, cols) = m.shape();
    if rows == 0 || cols == 0 {
        return Err(TableError::Empty { matrix: name });
    }
    let ragged = |row: usize, found: usize| TableError::Ragged {
        matrix: name,
        expected_rows: rows,
        expected_cols: cols,
        row,
        found,
    };
    if m.values.len() != rows {
        return Err(TableError::RowCount {
            matrix: name,
            expected: rows,
            found: m.values.len(),
        });
    }
    match m.values.iter().position(|row| row.len() != cols) {
        Some(r) => Err(ragged(r, m.values[r].len())),
        None => Ok(()),
    }
}

fn check_aligned<T, U>(
    name: &'static str,
    reference: &PromoterMatrix<T>,
    other: &PromoterMatrix<U>,
) -> Result<(), TableError> {
    if other.receivers != reference.receivers {
        return Err(TableError::RowLabelMismatch {
            matrix: name,
            expected: reference.receivers.clone(),
            found: other.receivers.clone(),
        });
    }
    if other.senders != reference.senders {
        return Err(TableError::ColumnLabelMismatch {
            matrix: name,
            expected: reference.senders.clone(),
            found: other.senders.clone(),
        });
    }
    check_rectangular(name, other)
}
