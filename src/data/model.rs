use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PromoterMatrix – one measured quantity over receiver × sender
// ---------------------------------------------------------------------------

/// A labelled grid of cells: rows are receiver promoters, columns are
/// sender promoters. `values[r][c]` belongs to `(receivers[r], senders[c])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoterMatrix<T> {
    pub receivers: Vec<String>,
    pub senders: Vec<String>,
    pub values: Vec<Vec<T>>,
}

impl<T> PromoterMatrix<T> {
    pub fn new(receivers: Vec<String>, senders: Vec<String>, values: Vec<Vec<T>>) -> Self {
        Self {
            receivers,
            senders,
            values,
        }
    }

    /// `(rows, columns)` according to the label axes.
    pub fn shape(&self) -> (usize, usize) {
        (self.receivers.len(), self.senders.len())
    }

    /// Apply `f` to every cell, keeping the labels.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PromoterMatrix<U> {
        PromoterMatrix {
            receivers: self.receivers.clone(),
            senders: self.senders.clone(),
            values: self
                .values
                .iter()
                .map(|row| row.iter().map(&mut f).collect())
                .collect(),
        }
    }
}

/// Trigger time as recorded in the time sheet: `HH:MM:SS` text.
pub type DurationMatrix = PromoterMatrix<String>;

/// GFP or mCherry expression levels.
pub type ExpressionMatrix = PromoterMatrix<f64>;

/// The three matrices exactly as read from the source, before alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    pub gfp: ExpressionMatrix,
    pub mcherry: ExpressionMatrix,
    pub time: DurationMatrix,
}

// ---------------------------------------------------------------------------
// CombinationRecord – one row of the flat table
// ---------------------------------------------------------------------------

/// One (sender, receiver) pairing with its three measurements.
///
/// `trigger_minutes` is `None` when the source duration could not be parsed;
/// such records stay in the table but can never be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRecord {
    pub sender: String,
    pub receiver: String,
    pub gfp: f64,
    pub mcherry: f64,
    pub trigger_minutes: Option<f64>,
}

// ---------------------------------------------------------------------------
// ScoredCombination – output of one ranking pass
// ---------------------------------------------------------------------------

/// A record together with its distance to the current target.
/// Lower `diff_score` is a closer match; `None` means unscorable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCombination {
    pub record: CombinationRecord,
    pub diff_score: Option<f64>,
}

impl fmt::Display for ScoredCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}: score {}",
            self.record.sender,
            self.record.receiver,
            format_optional(self.diff_score)
        )
    }
}

/// Render an optional measurement for display; undefined values show as `—`.
pub fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "—".to_owned(),
    }
}

/// A blank expression cell is loaded as NaN; treat it as undefined.
pub fn measured(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

// ---------------------------------------------------------------------------
// TargetProfile – what the user is looking for
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    pub desired_gfp: f64,
    pub desired_mcherry: f64,
    pub desired_trigger_minutes: f64,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            desired_gfp: 0.4,
            desired_mcherry: 0.4,
            desired_trigger_minutes: 200.0,
        }
    }
}
