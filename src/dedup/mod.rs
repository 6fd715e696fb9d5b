//! Track identity and deduplication
//!
//! Two tracks are the same track iff their artist and title match exactly.
//! No trimming or case folding is applied.

mod store;
mod track;

pub use store::DedupStore;
pub use track::{Fingerprint, Track};
