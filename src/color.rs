use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ScoredCombination;

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical mapping: receiver label → Color32
// ---------------------------------------------------------------------------

/// Maps receiver promoters to distinct colours for the bar chart.
#[derive(Debug, Clone)]
pub struct ReceiverColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ReceiverColors {
    /// One colour per distinct receiver among `matches`, assigned in label order.
    pub fn new(matches: &[ScoredCombination]) -> Self {
        let mut labels: Vec<&str> = matches.iter().map(|m| m.record.receiver.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();

        let mapping = labels
            .iter()
            .zip(generate_palette(labels.len()))
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ReceiverColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, receiver: &str) -> Color32 {
        self.mapping
            .get(receiver)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous mapping: diff score → Color32
// ---------------------------------------------------------------------------

/// Blue for the best score in view, through green, to red for the worst.
/// Undefined scores are gray.
#[derive(Debug, Clone, Copy)]
pub struct ScoreGradient {
    min: f64,
    max: f64,
}

impl ScoreGradient {
    pub fn new(matches: &[ScoredCombination]) -> Self {
        let (min, max) = matches
            .iter()
            .filter_map(|m| m.diff_score)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
        Self { min, max }
    }

    /// Position of `score` within the observed range, in `[0, 1]`.
    pub fn fraction(&self, score: f64) -> f32 {
        let range = self.max - self.min;
        if !range.is_finite() || range.abs() < f64::EPSILON {
            return 0.0;
        }
        ((score - self.min) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, score: Option<f64>) -> Color32 {
        match score {
            Some(s) => hsl_to_color32(240.0 * (1.0 - self.fraction(s)), 0.8, 0.5),
            None => Color32::GRAY,
        }
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        (self.min <= self.max).then_some((self.min, self.max))
    }
}
