//! Storage traits and error types
//!
//! This module defines the checkpoint interface used by the show pipeline and
//! the errors local persistence can raise.

use thiserror::Error;

/// Errors that can occur while persisting local state
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable record of which shows have been fully processed
///
/// Invariant: a show is only marked done after its complete, deduplicated
/// output file has been written.
pub trait CheckpointStore {
    /// Returns true if `show_name` was fully processed by an earlier run
    fn is_done(&self, show_name: &str) -> bool;

    /// Marks `show_name` as done and persists the whole mapping
    ///
    /// If persisting fails the in-memory flag is left unset.
    fn mark_done(&mut self, show_name: &str) -> StorageResult<()>;

    /// Number of shows currently marked done
    fn completed_count(&self) -> usize;
}
