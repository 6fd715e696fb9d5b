//! JSON file checkpoint
//!
//! The file is a flat object of show name to completion flag, rewritten in
//! full after every finished show so it is always a complete snapshot.

use crate::storage::traits::{CheckpointStore, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Checkpoint backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonCheckpointStore {
    path: PathBuf,
    entries: BTreeMap<String, bool>,
}

impl JsonCheckpointStore {
    /// Loads the checkpoint at `path`
    ///
    /// A missing or unreadable file yields an empty mapping; this never fails.
    ///
    /// # Arguments
    ///
    /// * `path` - Checkpoint file, also the target of later saves
    ///
    /// # Returns
    ///
    /// A store holding whatever completion flags could be read
    pub fn load(path: &Path) -> Self {
        // Read the checkpoint file
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, bool>>(&content) {
                Ok(entries) => {
                    tracing::info!(
                        "Loaded checkpoint {} ({} shows done)",
                        path.display(),
                        entries.values().filter(|done| **done).count()
                    );
                    entries
                }
                Err(e) => {
                    tracing::warn!(
                        "Ignoring unreadable checkpoint {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No checkpoint at {}, starting from scratch", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!("Could not read checkpoint {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Starts with an empty mapping, ignoring whatever is on disk
    ///
    /// The file is only overwritten once the first show completes.
    ///
    /// # Arguments
    ///
    /// * `path` - Checkpoint file to write on the first `mark_done`
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: BTreeMap::new(),
        }
    }

    /// Writes the whole mapping to disk
    fn save(&self) -> StorageResult<()> {
        // Ensure the parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let data = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, data).map_err(|e| StorageError::io(&self.path, e))
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn is_done(&self, show_name: &str) -> bool {
        self.entries.get(show_name).copied().unwrap_or(false)
    }

    /// Sets the show's flag and rewrites the file
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The flag is on disk
    /// * `Err(StorageError)` - The write failed; the in-memory flag is restored
    fn mark_done(&mut self, show_name: &str) -> StorageResult<()> {
        let previous = self.entries.insert(show_name.to_string(), true);

        if let Err(e) = self.save() {
            // Roll back so memory matches disk
            match previous {
                Some(flag) => self.entries.insert(show_name.to_string(), flag),
                None => self.entries.remove(show_name),
            };
            return Err(e);
        }

        tracing::debug!("Checkpointed show '{}'", show_name);
        Ok(())
    }

    fn completed_count(&self) -> usize {
        self.entries.values().filter(|done| **done).count()
    }
}
