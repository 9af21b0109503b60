use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::loader::{SheetNames, load_path};
use super::model::CombinationRecord;

/// Owns the flat table built from the most recently loaded dataset.
///
/// The table is shared behind an `Arc` and never mutated; ranking passes
/// borrow it and produce their own scored copies.
#[derive(Debug, Default)]
pub struct DatasetCache {
    sheets: SheetNames,
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    table: Arc<[CombinationRecord]>,
}

impl DatasetCache {
    pub fn new(sheets: SheetNames) -> Self {
        Self {
            sheets,
            entry: None,
        }
    }

    /// Return the table for `path`, reading it only if it is not already cached.
    ///
    /// On failure the previously cached table stays in place.
    pub fn load(&mut self, path: &Path) -> Result<Arc<[CombinationRecord]>> {
        if let Some(entry) = &self.entry {
            if entry.path.as_path() == path {
                log::debug!("Dataset {} served from cache", path.display());
                return Ok(Arc::clone(&entry.table));
            }
        }
        self.read(path)
    }

    /// Re-read the current source, replacing the cached table.
    pub fn reload(&mut self) -> Result<Arc<[CombinationRecord]>> {
        let path = self
            .entry
            .as_ref()
            .map(|e| e.path.clone())
            .context("no dataset loaded")?;
        self.read(&path)
    }

    /// Drop the cached table; the next `load` reads from disk.
    pub fn invalidate(&mut self) {
        if let Some(entry) = self.entry.take() {
            log::debug!("Dropped cached dataset {}", entry.path.display());
        }
    }

    pub fn table(&self) -> Option<Arc<[CombinationRecord]>> {
        self.entry.as_ref().map(|e| Arc::clone(&e.table))
    }

    pub fn source(&self) -> Option<&Path> {
        self.entry.as_ref().map(|e| e.path.as_path())
    }

    fn read(&mut self, path: &Path) -> Result<Arc<[CombinationRecord]>> {
        let raw = load_path(path, &self.sheets)
            .with_context(|| format!("loading {}", path.display()))?;
        let records = raw
            .to_table()
            .with_context(|| format!("aligning matrices from {}", path.display()))?;

        let (rows, cols) = raw.gfp.shape();
        log::info!(
            "Loaded {} combinations ({rows} receivers × {cols} senders) from {}",
            records.len(),
            path.display()
        );

        let table: Arc<[CombinationRecord]> = records.into();
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            table: Arc::clone(&table),
        });
        Ok(table)
    }
}
