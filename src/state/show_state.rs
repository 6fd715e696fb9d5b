/// Show state definitions for tracking per-show crawl progress
///
/// A show moves `Pending -> Skipped` when an earlier run already finished it,
/// or `Pending -> Fetching -> Merging -> Persisted -> Checkpointed` when it is
/// processed. `Failed` is absorbing and reachable from `Fetching`, `Merging`
/// and `Persisted`.
use std::fmt;

/// Represents the current state of a show in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowState {
    // ===== Active States =====
    /// Show has not been looked at yet
    Pending,

    /// Episodes and tracklists are being fetched
    Fetching,

    /// Fresh tracks are being merged with the persisted output
    Merging,

    /// Merged output written; checkpoint not yet updated
    Persisted,

    // ===== Terminal States =====
    /// Checkpoint already marked the show done
    Skipped,

    /// Output written and checkpoint updated
    Checkpointed,

    /// Abandoned for this run; the checkpoint is left unset
    Failed,
}

impl ShowState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Skipped | Self::Checkpointed | Self::Failed)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: ShowState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Skipped)
                | (Self::Pending, Self::Fetching)
                | (Self::Fetching, Self::Merging)
                | (Self::Merging, Self::Persisted)
                | (Self::Persisted, Self::Checkpointed)
                | (Self::Fetching, Self::Failed)
                | (Self::Merging, Self::Failed)
                | (Self::Persisted, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Merging => "merging",
            Self::Persisted => "persisted",
            Self::Skipped => "skipped",
            Self::Checkpointed => "checkpointed",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible show states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Merging,
            Self::Persisted,
            Self::Skipped,
            Self::Checkpointed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for ShowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
