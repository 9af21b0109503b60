use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::loader::SheetNames;
use crate::data::model::TargetProfile;
use crate::data::rank::ScoreConfig;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "PROMOTER_PICKER_CONFIG";

/// Settings file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "promoter_picker.json";

/// Upper bound of the top-N slider.
pub const MAX_TOP_N: usize = 50;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// User-tunable settings. Every field has a default, so a settings file
/// only needs to mention what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub time_scale_divisor: f64,
    pub top_n: usize,
    pub default_target: TargetProfile,
    pub gfp_range: [f64; 2],
    pub mcherry_range: [f64; 2],
    pub trigger_range: [f64; 2],
    pub sheets: SheetNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scale_divisor: ScoreConfig::default().time_scale_divisor,
            top_n: 10,
            default_target: TargetProfile::default(),
            gfp_range: [0.0, 2.0],
            mcherry_range: [0.0, 2.0],
            trigger_range: [0.0, 400.0],
            sheets: SheetNames::default(),
        }
    }
}

impl Settings {
    pub fn score_config(&self) -> ScoreConfig {
        ScoreConfig {
            time_scale_divisor: self.time_scale_divisor,
        }
    }

    /// Read and validate a settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.time_scale_divisor.is_finite() || self.time_scale_divisor <= 0.0 {
            bail!(
                "time_scale_divisor must be a positive number, got {}",
                self.time_scale_divisor
            );
        }
        if !(1..=MAX_TOP_N).contains(&self.top_n) {
            bail!("top_n must be between 1 and {MAX_TOP_N}, got {}", self.top_n);
        }
        for (name, [lo, hi]) in [
            ("gfp_range", self.gfp_range),
            ("mcherry_range", self.mcherry_range),
            ("trigger_range", self.trigger_range),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                bail!("{name} must be an increasing pair of numbers, got [{lo}, {hi}]");
            }
        }
        Ok(())
    }

    /// Resolve settings: an explicit path wins, then `promoter_picker.json`
    /// in the working directory, then built-in defaults. A broken file is
    /// logged and the defaults are used instead.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let candidate: Option<PathBuf> = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.is_file().then_some(local)
            }
        };

        let Some(path) = candidate else {
            return Settings::default();
        };

        match Settings::from_file(&path) {
            Ok(settings) => {
                log::info!("Using settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::error!("Ignoring settings file: {e:#}");
                Settings::default()
            }
        }
    }
}
