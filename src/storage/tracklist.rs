//! Per-show tracklist files
//!
//! Each show is persisted as `{root}/{mixtape_alias}/{sanitized_name}_tracklist.json`,
//! a JSON array of `{artist, title}` objects rewritten in full on every
//! successful (re-)processing.

use crate::dedup::Track;
use crate::storage::traits::{StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Suffix shared by every tracklist file
pub const TRACKLIST_SUFFIX: &str = "_tracklist.json";

/// Turns a show name into a filename stem
///
/// Lowercases, collapses whitespace runs to `_` and replaces `/` with `_`.
pub fn sanitize_show_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace('/', "_")
}

/// Location of a show's tracklist file
///
/// # Arguments
///
/// * `root` - Output root directory
/// * `mixtape_alias` - Used verbatim as the subdirectory name
/// * `show_name` - Sanitized into the file stem
pub fn tracklist_path(root: &Path, mixtape_alias: &str, show_name: &str) -> PathBuf {
    root.join(mixtape_alias)
        .join(format!("{}{}", sanitize_show_name(show_name), TRACKLIST_SUFFIX))
}

/// Reads a previously written tracklist
///
/// A missing or unparseable file is an empty baseline, never an error.
///
/// # Returns
///
/// The stored tracks, or an empty list when there is nothing usable
pub fn read_tracklist(path: &Path) -> Vec<Track> {
    // Read the existing output file
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!("Could not read {}: {}, treating as empty", path.display(), e);
            return Vec::new();
        }
    };

    // Parse it as a track array
    match serde_json::from_str(&content) {
        Ok(tracks) => tracks,
        Err(e) => {
            tracing::warn!(
                "Could not parse {}: {}, treating as empty",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

/// Overwrites `path` with `tracks`, creating parent directories as needed
///
/// # Arguments
///
/// * `path` - Target file, replaced in full
/// * `tracks` - Tracks in the order they should appear
///
/// # Returns
///
/// * `Ok(())` - The file was written
/// * `Err(StorageError)` - The directory or file could not be written
pub fn write_tracklist(path: &Path, tracks: &[Track]) -> StorageResult<()> {
    // Create the mixtape directory
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let data = serde_json::to_string_pretty(tracks)?;
    std::fs::write(path, data).map_err(|e| StorageError::io(path, e))
}
