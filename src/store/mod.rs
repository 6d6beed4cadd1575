pub mod document;

pub use document::{CleanupStats, PriceHistory, PriceRecord};

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// File-backed store for the price history document.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted history. A missing or unreadable file yields an
    /// empty document, so a fresh deployment or a corrupted file never blocks
    /// the next run.
    pub fn load(&self) -> PriceHistory {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No readable history at {}: {}", self.path.display(), e);
                return PriceHistory::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                warn!(
                    "History file {} is not valid JSON ({}); starting with an empty document",
                    self.path.display(),
                    e
                );
                PriceHistory::default()
            }
        }
    }

    /// Writes the full document through a temp file in the same directory
    /// and swaps it into place, so a concurrent reader observes either the
    /// old document or the new one, never a partial write.
    pub fn save(&self, history: &PriceHistory) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;

        let json =
            serde_json::to_string_pretty(history).context("Failed to serialize price history")?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write price history")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace history file: {}", self.path.display()))?;

        debug!(
            "Saved {} records to {}",
            history.records.len(),
            self.path.display()
        );
        Ok(())
    }
}
