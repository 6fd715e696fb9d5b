//! Storage module for local crawl state
//!
//! This module handles everything the crawl writes to disk:
//! - The checkpoint of fully processed shows
//! - One deduplicated tracklist file per show
//!
//! Crash safety comes from idempotence rather than transactions: a show whose
//! output was written but whose checkpoint was not is simply re-fetched and
//! merged again on the next run.

mod checkpoint;
mod tracklist;
mod traits;

pub use checkpoint::JsonCheckpointStore;
pub use tracklist::{
    read_tracklist, sanitize_show_name, tracklist_path, write_tracklist, TRACKLIST_SUFFIX,
};
pub use traits::{CheckpointStore, StorageError, StorageResult};
