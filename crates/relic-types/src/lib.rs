//! Shared data model for the relic reward loop.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: the engine mutates them, the store persists them, and the
//! presentation layer reads them through `ts-rs` generated bindings.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for relic identifiers
//! - [`relic`] -- Relics, rarity tiers, and the timestamp unit
//! - [`state`] -- The [`GameState`] aggregate root (the persisted blob)
//! - [`receipts`] -- Success results of progression operations

pub mod ids;
pub mod receipts;
pub mod relic;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use ids::RelicId;
pub use receipts::{
    BonusOutcome, ClaimReceipt, FUSION_FAILURE_MESSAGE, FUSION_SUCCESS_MESSAGE, FusionOutcome,
};
pub use relic::{InvalidRelicLevel, Relic, RelicLevel, Timestamp};
pub use state::{GameState, REFERRAL_CODE_BASE};
