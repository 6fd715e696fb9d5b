use serde::{Deserialize, Serialize};
use std::fmt;

/// The unit of output: one played track
///
/// Deserializing from an upstream tracklist entry keeps only `artist` and
/// `title`; any other fields are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Returns the deduplication key for this track
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            artist: self.artist.clone(),
            title: self.title.clone(),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Structural deduplication key of a [`Track`]
///
/// Equality and ordering compare `artist` then `title`, independent of how
/// either record was serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    artist: String,
    title: String,
}
