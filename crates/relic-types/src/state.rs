//! The [`GameState`] aggregate root.
//!
//! One `GameState` exists per save slot. Its serialized shape (camelCase
//! keys, `YYYY-MM-DD` dates, numeric levels) is the persisted blob format,
//! so field names here are part of the storage contract.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::RelicId;
use crate::relic::{Relic, RelicLevel, Timestamp};

/// Offset added to the referral count to form the player's invite code.
pub const REFERRAL_CODE_BASE: u64 = 1000;

/// Complete progression state for one player.
///
/// Missing fields decode to their defaults so older blobs keep loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Inventory in acquisition order.
    pub relics: Vec<Relic>,
    /// Epoch ms of the last successful timed claim. `0` means never.
    #[ts(type = "number")]
    pub last_claim_time: Timestamp,
    /// Consecutive calendar days with at least one timed claim.
    pub streak: u32,
    /// Calendar day of the last claim that counted toward the streak.
    pub last_streak_date: Option<NaiveDate>,
    /// Whether the daily puzzle was completed on `last_puzzle_date`.
    pub puzzle_completed_today: bool,
    /// Calendar day of the last puzzle completion.
    pub last_puzzle_date: Option<NaiveDate>,
    /// Number of players referred. Not mutated by the progression engine.
    pub referral_count: u32,
    /// Whether the one-time social bonus has been granted.
    pub social_bonus_claimed: bool,
    /// Whether the player holds the genesis pass. Display only.
    pub genesis_pass: bool,
    /// Streak milestones already paid out, for the `once` milestone policy.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub claimed_milestones: BTreeSet<u32>,
}

impl GameState {
    /// Number of relics currently held.
    pub fn relic_count(&self) -> usize {
        self.relics.len()
    }

    /// Whether a timed claim has ever succeeded.
    pub const fn has_claimed(&self) -> bool {
        self.last_claim_time != 0
    }

    /// Look up a relic by identifier.
    pub fn find_relic(&self, id: RelicId) -> Option<&Relic> {
        self.relics.iter().find(|relic| relic.id == id)
    }

    /// Number of relics held at each tier. Every tier is present, possibly
    /// with a count of zero.
    pub fn level_counts(&self) -> BTreeMap<RelicLevel, usize> {
        let mut counts: BTreeMap<RelicLevel, usize> =
            RelicLevel::ALL.iter().map(|&level| (level, 0)).collect();
        for relic in &self.relics {
            let entry = counts.entry(relic.level).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        counts
    }

    /// Whether every relic in the inventory has a distinct identifier.
    pub fn has_unique_ids(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.relics.iter().all(|relic| seen.insert(relic.id))
    }

    /// Invite code shown next to the referral link.
    pub fn referral_code(&self) -> u64 {
        REFERRAL_CODE_BASE.saturating_add(u64::from(self.referral_count))
    }

    /// Whether the puzzle counts as completed on `today`.
    pub fn puzzle_done_on(&self, today: NaiveDate) -> bool {
        self.puzzle_completed_today && self.last_puzzle_date == Some(today)
    }

    /// Clear a stale puzzle-completed flag left over from an earlier day.
    ///
    /// Returns `true` if the flag was cleared.
    pub fn refresh_daily(&mut self, today: NaiveDate) -> bool {
        if self.puzzle_completed_today && self.last_puzzle_date != Some(today) {
            self.puzzle_completed_today = false;
            return true;
        }
        false
    }
}
