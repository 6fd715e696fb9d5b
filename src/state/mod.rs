//! State module for tracking crawl progress
//!
//! - `ShowState`: the lifecycle of one show within a run (pending, fetching,
//!   merging, persisted, checkpointed, skipped, failed)

mod show_state;

pub use show_state::ShowState;
