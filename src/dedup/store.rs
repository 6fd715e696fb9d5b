use crate::dedup::{Fingerprint, Track};
use std::collections::BTreeMap;

/// Set of tracks keyed by fingerprint
///
/// Iteration is ordered by `(artist, title)`, so a given set always
/// serializes to the same bytes.
#[derive(Debug, Clone, Default)]
pub struct DedupStore {
    tracks: BTreeMap<Fingerprint, Track>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `track` unless an equal track is already present
    ///
    /// Returns `true` if the track was new.
    pub fn add(&mut self, track: Track) -> bool {
        let fingerprint = track.fingerprint();
        if self.tracks.contains_key(&fingerprint) {
            return false;
        }
        self.tracks.insert(fingerprint, track);
        true
    }

    /// Adds every track, returning how many were new
    pub fn extend<I: IntoIterator<Item = Track>>(&mut self, tracks: I) -> usize {
        let mut added = 0;
        for track in tracks {
            if self.add(track) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, track: &Track) -> bool {
        self.tracks.contains_key(&track.fingerprint())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks.into_values().collect()
    }

    /// Union of a previously persisted set and this run's fetch
    ///
    /// Merging the same inputs again yields the same set, which is what makes
    /// re-processing a show safe.
    pub fn merge<E, N>(existing: E, fresh: N) -> Vec<Track>
    where
        E: IntoIterator<Item = Track>,
        N: IntoIterator<Item = Track>,
    {
        let mut store = Self::new();
        store.extend(existing);
        store.extend(fresh);
        store.into_tracks()
    }
}

impl FromIterator<Track> for DedupStore {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
