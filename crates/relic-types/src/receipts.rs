//! Success results returned by progression operations.
//!
//! Failures are carried by the engine's error type; these receipts only
//! describe what a successful call changed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::RelicId;
use crate::relic::Relic;

/// Message shown when a fusion produces a higher-tier relic.
pub const FUSION_SUCCESS_MESSAGE: &str = "Upgrade Successful!";

/// Message shown when a fusion roll fails and the inputs are lost.
pub const FUSION_FAILURE_MESSAGE: &str = "Not this time.";

/// Result of a successful timed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ClaimReceipt {
    /// Streak value after the claim.
    pub streak: u32,
    /// Every relic minted by this claim: the base relic first, then any
    /// milestone bonus relics.
    pub minted: Vec<Relic>,
    /// Human-readable summary.
    pub message: String,
}

impl ClaimReceipt {
    /// Build a receipt with the standard summary message.
    pub fn new(streak: u32, minted: Vec<Relic>) -> Self {
        Self {
            streak,
            minted,
            message: format!("Claimed! Streak: {streak}"),
        }
    }

    /// Number of relics minted, base relic included.
    pub fn minted_count(&self) -> usize {
        self.minted.len()
    }

    /// Number of relics granted on top of the base relic.
    pub fn bonus_count(&self) -> usize {
        self.minted.len().saturating_sub(1)
    }
}

/// Result of a one-shot bonus (daily puzzle, social bonus).
///
/// Repeating a bonus inside its eligibility window is not an error: it
/// reports [`BonusOutcome::AlreadyClaimed`] and changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum BonusOutcome {
    /// The bonus was granted and these relics were added.
    Granted {
        /// Newly minted relics.
        relics: Vec<Relic>,
    },
    /// The bonus was already taken; nothing changed.
    AlreadyClaimed,
}

impl BonusOutcome {
    /// Whether this call granted anything.
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    /// Relics added by this call (empty when already claimed).
    pub fn relics(&self) -> &[Relic] {
        match self {
            Self::Granted { relics } => relics,
            Self::AlreadyClaimed => &[],
        }
    }
}

/// Result of a fusion attempt that passed validation.
///
/// Inputs are consumed whether or not the roll succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FusionOutcome {
    /// Whether the roll produced a higher-tier relic.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Identifiers of the relics removed from the inventory.
    pub consumed: Vec<RelicId>,
    /// The minted relic, present only on success.
    pub new_relic: Option<Relic>,
}

impl FusionOutcome {
    /// A successful fusion that minted `relic`.
    pub fn succeeded(consumed: Vec<RelicId>, relic: Relic) -> Self {
        Self {
            success: true,
            message: FUSION_SUCCESS_MESSAGE.to_owned(),
            consumed,
            new_relic: Some(relic),
        }
    }

    /// A failed fusion; the inputs are gone and nothing was minted.
    pub fn failed(consumed: Vec<RelicId>) -> Self {
        Self {
            success: false,
            message: FUSION_FAILURE_MESSAGE.to_owned(),
            consumed,
            new_relic: None,
        }
    }
}
