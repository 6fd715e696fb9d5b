//! Input catalog of mixtapes and their show credits
//!
//! The catalog is the only input the crawl cannot do without: a missing or
//! malformed file is fatal.

use crate::CatalogError;
use serde::Deserialize;
use std::path::Path;

/// Top-level catalog document: `{"results": [mixtape, ...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub results: Vec<Mixtape>,
}

/// A catalog grouping of show credits
#[derive(Debug, Clone, Deserialize)]
pub struct Mixtape {
    pub mixtape_alias: String,
    #[serde(default)]
    pub credits: Vec<Show>,
}

/// One crawlable show. `name` is the checkpoint key and the basis of the
/// output filename; `path` is the API path segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Show {
    pub name: String,
    pub path: String,
}

impl Show {
    /// Guest shows have no episode list; their tracklist hangs off the show itself
    pub fn is_guest(&self, guest_path_prefix: &str) -> bool {
        self.path.starts_with(guest_path_prefix)
    }
}

impl Catalog {
    /// Number of show credits across all mixtapes
    pub fn show_count(&self) -> usize {
        self.results.iter().map(|m| m.credits.len()).sum()
    }

    /// Iterates `(mixtape, show)` pairs in input order
    pub fn shows(&self) -> impl Iterator<Item = (&Mixtape, &Show)> {
        self.results
            .iter()
            .flat_map(|mixtape| mixtape.credits.iter().map(move |show| (mixtape, show)))
    }
}

/// Loads the catalog file
///
/// # Returns
///
/// * `Ok(Catalog)` - The parsed catalog
/// * `Err(CatalogError)` - The file could not be read or is not a valid catalog
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}
