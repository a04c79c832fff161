//! Relic fusion: selection validation and the success-chance table.
//!
//! Fusion burns two or more relics of one level for a chance at a single
//! relic one level higher. The chance depends only on the shared level,
//! never on how many relics were burned. Inputs are consumed on success
//! and on failure alike.
//!
//! | Level | Chance |
//! |-------|--------|
//! | 0 | 1.00 |
//! | 1 | 0.50 |
//! | 2 | 0.30 |
//! | 3 | blocked |

use std::collections::BTreeSet;

use relic_types::{GameState, RelicId, RelicLevel};

use crate::error::ProgressionError;

/// Minimum number of relics a fusion consumes.
pub const MIN_FUSION_INPUTS: usize = 2;

/// Errors that can occur when building a [`FusionTable`].
#[derive(Debug, thiserror::Error)]
pub enum FusionTableError {
    /// Not exactly one chance per fusible level.
    #[error("expected {expected} success chances, got {actual}")]
    WrongLength {
        /// Required number of entries.
        expected: usize,
        /// Number of entries supplied.
        actual: usize,
    },

    /// A chance is NaN or outside `[0, 1]`.
    #[error("success chance for level {level} must be within [0, 1], got {chance}")]
    OutOfRange {
        /// Level the chance applies to.
        level: u8,
        /// The rejected value.
        chance: f64,
    },
}

/// Success chance per fusible level (0, 1 and 2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionTable {
    chances: [f64; 3],
}

impl Default for FusionTable {
    fn default() -> Self {
        Self {
            chances: [1.0, 0.5, 0.3],
        }
    }
}

impl FusionTable {
    /// Build a table from chances for levels 0, 1 and 2, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`FusionTableError`] unless exactly three chances within
    /// `[0, 1]` are supplied.
    pub fn new(chances: &[f64]) -> Result<Self, FusionTableError> {
        let table = <[f64; 3]>::try_from(chances).map_err(|_err| FusionTableError::WrongLength {
            expected: 3,
            actual: chances.len(),
        })?;
        for (level, &chance) in RelicLevel::ALL.iter().zip(table.iter()) {
            if !(0.0..=1.0).contains(&chance) {
                return Err(FusionTableError::OutOfRange {
                    level: level.as_u8(),
                    chance,
                });
            }
        }
        Ok(Self { chances: table })
    }

    /// Success chance for fusing relics at `level`, or `None` at the
    /// maximum level.
    pub const fn chance(&self, level: RelicLevel) -> Option<f64> {
        let [common, rare, epic] = self.chances;
        match level {
            RelicLevel::Common => Some(common),
            RelicLevel::Rare => Some(rare),
            RelicLevel::Epic => Some(epic),
            RelicLevel::Mythic => None,
        }
    }

    /// Whether `sample` (drawn from `[0, 1)`) succeeds at `level`.
    pub fn succeeds(&self, level: RelicLevel, sample: f64) -> bool {
        self.chance(level).is_some_and(|chance| sample < chance)
    }
}

/// Check a fusion request against the inventory.
///
/// Checks run in a fixed order and the first failure wins: input count,
/// membership (duplicates included), level agreement, maximum level.
/// Returns the shared level on success.
///
/// # Errors
///
/// - [`ProgressionError::InsufficientInputs`] for fewer than two ids.
/// - [`ProgressionError::InvalidSelection`] for an unknown or repeated id.
/// - [`ProgressionError::LevelMismatch`] when levels differ.
/// - [`ProgressionError::MaxLevelReached`] when the shared level is 3.
pub fn validate_selection(
    state: &GameState,
    ids: &[RelicId],
) -> Result<RelicLevel, ProgressionError> {
    if ids.len() < MIN_FUSION_INPUTS {
        return Err(ProgressionError::InsufficientInputs { count: ids.len() });
    }

    let mut seen = BTreeSet::new();
    let mut levels = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            return Err(ProgressionError::InvalidSelection { id });
        }
        let relic = state
            .find_relic(id)
            .ok_or(ProgressionError::InvalidSelection { id })?;
        levels.push(relic.level);
    }

    let mut iter = levels.into_iter();
    let level = iter
        .next()
        .ok_or(ProgressionError::InsufficientInputs { count: 0 })?;
    if iter.any(|other| other != level) {
        return Err(ProgressionError::LevelMismatch);
    }
    if level.is_max() {
        return Err(ProgressionError::MaxLevelReached);
    }
    Ok(level)
}
