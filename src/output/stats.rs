//! Statistics over the harvested output tree
//!
//! Read-only: walks `{root}/{mixtape}/*_tracklist.json` and tallies total and
//! distinct tracks per show and overall. Files that fail to parse are listed,
//! never fatal.

use crate::dedup::{DedupStore, Track};
use crate::storage::TRACKLIST_SUFFIX;
use crate::HarvestError;
use std::path::{Path, PathBuf};

/// Counts for one show file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowStatistics {
    pub mixtape: String,
    /// File name without the tracklist suffix
    pub show: String,
    pub total_tracks: usize,
    pub unique_tracks: usize,
}

/// Harvest statistics summary
#[derive(Debug, Clone, Default)]
pub struct HarvestStatistics {
    /// Per-show counts, ordered by mixtape then show
    pub shows: Vec<ShowStatistics>,

    /// Sum of all entries in all files
    pub total_tracks: usize,

    /// Sum of the per-show distinct counts
    pub unique_tracks_per_show: usize,

    /// Distinct tracks across every show
    pub unique_tracks_overall: usize,

    /// Files that could not be read as a track array
    pub unreadable_files: Vec<PathBuf>,
}

/// Loads statistics from the output tree rooted at `root`
///
/// # Returns
///
/// * `Ok(HarvestStatistics)` - Counts for every readable tracklist file
/// * `Err(HarvestError)` - `root` or one of its directories could not be listed
pub fn load_statistics(root: &Path) -> Result<HarvestStatistics, HarvestError> {
    let mut stats = HarvestStatistics::default();
    let mut overall = DedupStore::new();

    for mixtape_dir in sorted_entries(root)? {
        if !mixtape_dir.is_dir() {
            continue;
        }
        let mixtape = file_name(&mixtape_dir);

        for file in sorted_entries(&mixtape_dir)? {
            let name = file_name(&file);
            let Some(show) = name.strip_suffix(TRACKLIST_SUFFIX) else {
                continue;
            };

            let tracks = match read_strict(&file) {
                Some(tracks) => tracks,
                None => {
                    stats.unreadable_files.push(file);
                    continue;
                }
            };

            let unique: DedupStore = tracks.iter().cloned().collect();
            stats.total_tracks += tracks.len();
            stats.unique_tracks_per_show += unique.len();
            stats.shows.push(ShowStatistics {
                mixtape: mixtape.clone(),
                show: show.to_string(),
                total_tracks: tracks.len(),
                unique_tracks: unique.len(),
            });
            overall.extend(tracks);
        }
    }

    stats.unique_tracks_overall = overall.len();
    Ok(stats)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, HarvestError> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_strict(path: &Path) -> Option<Vec<Track>> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(tracks) => Some(tracks),
        Err(e) => {
            tracing::debug!("Unreadable tracklist {}: {}", path.display(), e);
            None
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    let mut current_mixtape: Option<&str> = None;
    for show in &stats.shows {
        if current_mixtape != Some(show.mixtape.as_str()) {
            println!("{}:", show.mixtape);
            current_mixtape = Some(show.mixtape.as_str());
        }
        println!(
            "  {}: {} tracks ({} unique)",
            show.show, show.total_tracks, show.unique_tracks
        );
    }
    println!();

    println!("Overview:");
    println!("  Shows: {}", stats.shows.len());
    println!("  Total tracks: {}", stats.total_tracks);
    println!("  Unique tracks per show: {}", stats.unique_tracks_per_show);
    println!("  Unique tracks overall: {}", stats.unique_tracks_overall);

    if !stats.unreadable_files.is_empty() {
        println!();
        println!("Unreadable Files ({}):", stats.unreadable_files.len());
        for path in &stats.unreadable_files {
            println!("  - {}", path.display());
        }
    }
}
