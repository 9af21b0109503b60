use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::data::cache::DatasetCache;
use crate::data::model::{CombinationRecord, ScoredCombination, TargetProfile};
use crate::data::rank::{ScoreConfig, top_matches};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Owner of the loaded flat table (empty until a dataset loads).
    pub cache: DatasetCache,

    /// What the user is looking for.
    pub target: TargetProfile,

    pub score_config: ScoreConfig,

    /// How many matches to show.
    pub top_n: usize,

    /// Ranked matches for the current target (recomputed on change).
    pub matches: Vec<ScoredCombination>,

    /// Rotation of the 3D projection, in degrees.
    pub yaw: f32,
    pub pitch: f32,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            cache: DatasetCache::new(settings.sheets.clone()),
            target: settings.default_target,
            score_config: settings.score_config(),
            top_n: settings.top_n,
            matches: Vec::new(),
            yaw: 35.0,
            pitch: 25.0,
            status_message: None,
            settings,
        }
    }

    /// Load (or fetch from cache) a dataset and rank it.
    pub fn open(&mut self, path: &Path) {
        let result = self.cache.load(path);
        self.apply_load(result);
    }

    /// Re-read the current dataset from disk.
    pub fn reload(&mut self) {
        let result = self.cache.reload();
        self.apply_load(result);
    }

    /// Drop the loaded dataset and its ranking.
    pub fn close(&mut self) {
        self.cache.invalidate();
        self.matches.clear();
        self.status_message = None;
    }

    fn apply_load(&mut self, result: anyhow::Result<Arc<[CombinationRecord]>>) {
        match result {
            Ok(_) => {
                self.status_message = None;
                self.rerank();
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn set_target(&mut self, target: TargetProfile) {
        if target != self.target {
            self.target = target;
            self.rerank();
        }
    }

    pub fn set_top_n(&mut self, n: usize) {
        if n != self.top_n {
            self.top_n = n;
            self.rerank();
        }
    }

    /// Restore the target from settings.
    pub fn reset_target(&mut self) {
        self.set_target(self.settings.default_target);
    }

    /// Recompute `matches` from the current table and target.
    pub fn rerank(&mut self) {
        self.matches = match self.cache.table() {
            Some(table) => top_matches(&table, &self.target, &self.score_config, self.top_n),
            None => Vec::new(),
        };
        if let Some(best) = self.matches.first() {
            log::debug!("Re-ranked for {:?}; best {best}", self.target);
        }
    }

    /// Number of records in the loaded table.
    pub fn table_len(&self) -> usize {
        self.cache.table().map_or(0, |t| t.len())
    }
}
