//! Owned, lazily-loaded cleaned dataset.
//!
//! [`DatasetCache`] cleans the source file on first access and hands out the
//! same [`CleanTable`] until the file's modification time changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

use crate::config::ColumnNames;
use crate::dataset::CleanTable;
use crate::error::LoadError;

struct Loaded {
    table: Arc<CleanTable>,
    modified: Option<SystemTime>,
}

pub struct DatasetCache {
    path: PathBuf,
    columns: ColumnNames,
    loaded: Option<Loaded>,
    loads: usize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnNames) -> Self {
        Self {
            path: path.into(),
            columns,
            loaded: None,
            loads: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times the file has been read and cleaned.
    pub fn loads(&self) -> usize {
        self.loads
    }

    /// Drops the cached table so the next [`get`](Self::get) reloads.
    pub fn invalidate(&mut self) {
        self.loaded = None;
    }

    /// Returns the cleaned table, loading it if absent or if the source file
    /// changed since the last load.
    pub fn get(&mut self) -> Result<Arc<CleanTable>, LoadError> {
        let modified = self.modified()?;

        if let Some(loaded) = &self.loaded {
            if loaded.modified == modified {
                debug!(path = %self.path.display(), "Using cached dataset");
                return Ok(Arc::clone(&loaded.table));
            }
            info!(path = %self.path.display(), "Source file changed, reloading");
        }

        let table = Arc::new(CleanTable::load(&self.path, &self.columns)?);
        self.loads += 1;
        self.loaded = Some(Loaded {
            table: Arc::clone(&table),
            modified,
        });

        Ok(table)
    }

    fn modified(&self) -> Result<Option<SystemTime>, LoadError> {
        let meta = std::fs::metadata(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        // Platforms without mtime support fall back to load-once.
        Ok(meta.modified().ok())
    }
}
