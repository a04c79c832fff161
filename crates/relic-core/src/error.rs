//! Error types for the relic-core crate.
//!
//! Every engine operation returns `Result<_, ProgressionError>`. Validation
//! and precondition failures leave the state untouched and are always
//! recoverable; persistence failures mean the computed mutation was not
//! committed. Display strings are the player-facing messages.

use relic_store::StoreError;
use relic_types::RelicId;

use crate::calendar::CalendarError;

/// Broad class of a [`ProgressionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed (wrong ids, count, or level mix).
    Validation,
    /// The request is well formed but not allowed yet.
    Precondition,
    /// The save slot could not be written; nothing was committed.
    Persistence,
}

/// Errors returned by [`ProgressionEngine`](crate::engine::ProgressionEngine)
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// The claim cooldown has not elapsed.
    #[error("Too early to claim.")]
    ClaimTooEarly {
        /// Milliseconds left until the next claim is allowed.
        remaining_ms: i64,
    },

    /// The puzzle was submitted before it was solved.
    #[error("Puzzle not solved yet.")]
    PuzzleUnsolved,

    /// Fewer than two relics were selected for fusion.
    #[error("Select relics to upgrade.")]
    InsufficientInputs {
        /// Number of identifiers supplied.
        count: usize,
    },

    /// A selected identifier is not in the inventory, or was selected twice.
    #[error("Invalid relic selection.")]
    InvalidSelection {
        /// The offending identifier.
        id: RelicId,
    },

    /// The selected relics are not all the same level.
    #[error("Relics must be the same level.")]
    LevelMismatch,

    /// The selected relics are already at the maximum level.
    #[error("Max level reached.")]
    MaxLevelReached,

    /// The supplied timestamp cannot be mapped to a calendar day.
    #[error("invalid timestamp: {0}")]
    Calendar(#[from] CalendarError),

    /// Loading or saving the save slot failed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl ProgressionError {
    /// Classify the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ClaimTooEarly { .. } | Self::PuzzleUnsolved => ErrorKind::Precondition,
            Self::InsufficientInputs { .. }
            | Self::InvalidSelection { .. }
            | Self::LevelMismatch
            | Self::MaxLevelReached
            | Self::Calendar(_) => ErrorKind::Validation,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Whether the caller can simply retry or correct the request. Only
    /// persistence failures are not recoverable.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_player_facing() {
        let err = ProgressionError::ClaimTooEarly { remaining_ms: 5 };
        assert_eq!(err.to_string(), "Too early to claim.");
        assert_eq!(
            ProgressionError::LevelMismatch.to_string(),
            "Relics must be the same level."
        );
        assert_eq!(
            ProgressionError::MaxLevelReached.to_string(),
            "Max level reached."
        );
        assert_eq!(
            ProgressionError::InsufficientInputs { count: 1 }.to_string(),
            "Select relics to upgrade."
        );
        assert_eq!(
            ProgressionError::InvalidSelection { id: RelicId::new() }.to_string(),
            "Invalid relic selection."
        );
    }

    #[test]
    fn classification() {
        assert_eq!(
            ProgressionError::ClaimTooEarly { remaining_ms: 1 }.kind(),
            ErrorKind::Precondition
        );
        assert_eq!(ProgressionError::PuzzleUnsolved.kind(), ErrorKind::Precondition);
        assert_eq!(ProgressionError::LevelMismatch.kind(), ErrorKind::Validation);
        let persistence = ProgressionError::from(StoreError::Unavailable("offline".to_owned()));
        assert_eq!(persistence.kind(), ErrorKind::Persistence);
        assert!(!persistence.is_recoverable());
        assert!(ProgressionError::MaxLevelReached.is_recoverable());
    }
}
