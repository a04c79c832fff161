//! The progression engine.
//!
//! [`ProgressionEngine`] owns the canonical [`GameState`] for one save slot
//! and exposes every operation that changes it. Each operation follows the
//! same shape:
//!
//! 1. Read `now` once (the caller passes it in) and derive today's date.
//! 2. Validate against the committed state. Rejections change nothing.
//! 3. Compute the next state on a copy.
//! 4. Save the copy. Only if the save succeeds does it replace the
//!    in-memory state, so memory and storage never diverge.
//!
//! The engine is an explicit value: build one per session with
//! [`ProgressionEngine::open`] and hand it to whoever needs it.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use relic_store::StateStore;
use relic_types::{
    BonusOutcome, ClaimReceipt, FusionOutcome, GameState, Relic, RelicId, RelicLevel, Timestamp,
};
use tracing::{debug, error, info, warn};

use crate::calendar::Calendar;
use crate::config::{ConfigError, ProgressionConfig};
use crate::error::ProgressionError;
use crate::fusion::{FusionTable, validate_selection};
use crate::milestones::MilestoneTable;
use crate::puzzle::SequencePuzzle;
use crate::roll::FusionRoll;
use crate::streak::{self, StreakStatus};

/// Tunable rules the engine runs with, resolved from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Save-slot key.
    pub key: String,
    /// Minimum milliseconds between timed claims.
    pub cooldown_ms: i64,
    /// Calendar used for streak and puzzle days.
    pub calendar: Calendar,
    /// Streak milestone schedule.
    pub milestones: MilestoneTable,
    /// Fusion odds.
    pub fusion: FusionTable,
    /// Relics granted by the daily puzzle.
    pub puzzle_relics: u32,
    /// Relics granted by the social bonus.
    pub social_relics: u32,
    /// Target order of the daily puzzle.
    pub puzzle_sequence: Vec<u8>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let config = ProgressionConfig::default();
        Self {
            key: config.storage.key,
            cooldown_ms: config.claim.cooldown_ms,
            calendar: Calendar::utc(),
            milestones: MilestoneTable::default(),
            fusion: FusionTable::default(),
            puzzle_relics: config.rewards.puzzle_relics,
            social_relics: config.rewards.social_relics,
            puzzle_sequence: config.puzzle.sequence,
        }
    }
}

impl EngineSettings {
    /// Resolve settings from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration does not
    /// validate.
    pub fn from_config(config: &ProgressionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            key: config.storage.key.clone(),
            cooldown_ms: config.claim.cooldown_ms,
            calendar: config.calendar()?,
            milestones: config.milestone_table(),
            fusion: config.fusion_table()?,
            puzzle_relics: config.rewards.puzzle_relics,
            social_relics: config.rewards.social_relics,
            puzzle_sequence: config.puzzle.sequence.clone(),
        })
    }
}

/// Owner of the game state for one save slot.
///
/// `S` persists the state; `R` supplies fusion rolls.
#[derive(Debug)]
pub struct ProgressionEngine<S, R> {
    state: GameState,
    store: S,
    roll: R,
    settings: EngineSettings,
}

impl<S: StateStore, R: FusionRoll> ProgressionEngine<S, R> {
    /// Load the save slot and build an engine around it.
    ///
    /// An empty slot starts a fresh game. A slot holding an undecodable
    /// blob also starts a fresh game (logged at `warn`) so a damaged save
    /// never locks the player out; the bad blob is overwritten by the next
    /// successful operation.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Persistence`] if the store cannot be
    /// read at all.
    pub fn open(store: S, roll: R, settings: EngineSettings) -> Result<Self, ProgressionError> {
        let state = match store.load(&settings.key) {
            Ok(state) => state,
            Err(err) if err.is_corrupt() => {
                warn!(key = %settings.key, error = %err, "Discarding corrupt save data");
                GameState::default()
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            key = %settings.key,
            relics = state.relic_count(),
            streak = state.streak,
            "Progression state loaded"
        );

        Ok(Self {
            state,
            store,
            roll,
            settings,
        })
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// The committed state exactly as last saved.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The state as it should be displayed at `now`: a puzzle flag left
    /// over from an earlier day reads as cleared. The cleared flag is
    /// written back with the next mutating operation.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Calendar`] if `now` is out of range.
    pub fn snapshot(&self, now: Timestamp) -> Result<GameState, ProgressionError> {
        let today = self.today(now)?;
        let mut view = self.state.clone();
        view.refresh_daily(today);
        Ok(view)
    }

    /// The resolved rules this engine runs with.
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Milliseconds until the next timed claim is allowed (0 when it is
    /// allowed now). A player who has never claimed can always claim.
    pub fn time_until_claim(&self, now: Timestamp) -> i64 {
        if !self.state.has_claimed() {
            return 0;
        }
        let elapsed = now.saturating_sub(self.state.last_claim_time);
        self.settings.cooldown_ms.saturating_sub(elapsed).max(0)
    }

    /// Whether a timed claim is allowed at `now`.
    pub fn can_claim(&self, now: Timestamp) -> bool {
        self.time_until_claim(now) == 0
    }

    /// Where the streak stands at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Calendar`] if `now` is out of range.
    pub fn streak_status(&self, now: Timestamp) -> Result<StreakStatus, ProgressionError> {
        Ok(streak::status(self.state.last_streak_date, self.today(now)?))
    }

    /// A fresh attempt at today's puzzle.
    pub fn new_puzzle(&self) -> SequencePuzzle {
        SequencePuzzle::new(self.settings.puzzle_sequence.clone())
    }

    // =========================================================================
    // Mutating operations
    // =========================================================================

    /// Claim the timed relic.
    ///
    /// Mints one base relic, advances the daily streak, and pays any
    /// milestone bonus reached by the new streak value.
    ///
    /// # Errors
    ///
    /// - [`ProgressionError::ClaimTooEarly`] while the cooldown runs.
    /// - [`ProgressionError::Calendar`] if `now` is out of range.
    /// - [`ProgressionError::Persistence`] if the save fails.
    pub fn claim_relic(&mut self, now: Timestamp) -> Result<ClaimReceipt, ProgressionError> {
        let remaining_ms = self.time_until_claim(now);
        if remaining_ms > 0 {
            debug!(remaining_ms, "Claim rejected: cooldown running");
            return Err(ProgressionError::ClaimTooEarly { remaining_ms });
        }

        let today = self.today(now)?;
        let mut next = self.state.clone();
        next.refresh_daily(today);

        let update = streak::advance(next.streak, next.last_streak_date, today);
        let bonus = self
            .settings
            .milestones
            .award(update.streak, &mut next.claimed_milestones);

        let mut minted = vec![Relic::mint(RelicLevel::Common, now)];
        minted.extend(Relic::mint_common(bonus, now));

        next.relics.extend(minted.iter().cloned());
        next.last_claim_time = now;
        next.streak = update.streak;
        next.last_streak_date = Some(update.last_date);

        self.commit(next)?;

        info!(
            streak = update.streak,
            change = ?update.change,
            minted = minted.len(),
            bonus,
            "Relic claimed"
        );
        Ok(ClaimReceipt::new(update.streak, minted))
    }

    /// Complete today's puzzle.
    ///
    /// Grants the puzzle reward once per calendar day. Repeating on the
    /// same day returns [`BonusOutcome::AlreadyClaimed`] and writes nothing.
    ///
    /// # Errors
    ///
    /// - [`ProgressionError::Calendar`] if `now` is out of range.
    /// - [`ProgressionError::Persistence`] if the save fails.
    pub fn complete_puzzle(&mut self, now: Timestamp) -> Result<BonusOutcome, ProgressionError> {
        let today = self.today(now)?;
        if self.state.puzzle_done_on(today) {
            debug!(%today, "Puzzle already completed today");
            return Ok(BonusOutcome::AlreadyClaimed);
        }

        let mut next = self.state.clone();
        next.refresh_daily(today);
        let relics = Relic::mint_common(self.settings.puzzle_relics, now);
        next.relics.extend(relics.iter().cloned());
        next.puzzle_completed_today = true;
        next.last_puzzle_date = Some(today);

        self.commit(next)?;

        info!(%today, minted = relics.len(), "Daily puzzle completed");
        Ok(BonusOutcome::Granted { relics })
    }

    /// Submit a puzzle attempt; pays out via [`Self::complete_puzzle`] if
    /// the attempt is solved.
    ///
    /// # Errors
    ///
    /// - [`ProgressionError::PuzzleUnsolved`] if the attempt is incomplete.
    /// - Any error of [`Self::complete_puzzle`].
    pub fn solve_puzzle(
        &mut self,
        puzzle: &SequencePuzzle,
        now: Timestamp,
    ) -> Result<BonusOutcome, ProgressionError> {
        if !puzzle.is_solved() {
            debug!(progress = puzzle.progress(), "Puzzle submission rejected: unsolved");
            return Err(ProgressionError::PuzzleUnsolved);
        }
        self.complete_puzzle(now)
    }

    /// Claim the one-time social bonus.
    ///
    /// The flag never resets; every call after the first returns
    /// [`BonusOutcome::AlreadyClaimed`] and writes nothing.
    ///
    /// # Errors
    ///
    /// - [`ProgressionError::Calendar`] if `now` is out of range.
    /// - [`ProgressionError::Persistence`] if the save fails.
    pub fn claim_social_bonus(
        &mut self,
        now: Timestamp,
    ) -> Result<BonusOutcome, ProgressionError> {
        if self.state.social_bonus_claimed {
            debug!("Social bonus already claimed");
            return Ok(BonusOutcome::AlreadyClaimed);
        }

        let today = self.today(now)?;
        let mut next = self.state.clone();
        next.refresh_daily(today);
        let relics = Relic::mint_common(self.settings.social_relics, now);
        next.relics.extend(relics.iter().cloned());
        next.social_bonus_claimed = true;

        self.commit(next)?;

        info!(minted = relics.len(), "Social bonus claimed");
        Ok(BonusOutcome::Granted { relics })
    }

    /// Fuse two or more same-level relics.
    ///
    /// One roll decides the outcome. The selected relics are removed
    /// either way; on success a single relic one level higher is added.
    ///
    /// # Errors
    ///
    /// - Validation errors from [`validate_selection`], in its check order.
    /// - [`ProgressionError::Calendar`] if `now` is out of range.
    /// - [`ProgressionError::Persistence`] if the save fails.
    pub fn upgrade_relics(
        &mut self,
        relic_ids: &[RelicId],
        now: Timestamp,
    ) -> Result<FusionOutcome, ProgressionError> {
        let level = validate_selection(&self.state, relic_ids).inspect_err(|err| {
            debug!(inputs = relic_ids.len(), error = %err, "Fusion rejected");
        })?;
        let target = level.next().ok_or(ProgressionError::MaxLevelReached)?;
        let today = self.today(now)?;

        let sample = self.roll.roll();
        let success = self.settings.fusion.succeeds(level, sample);

        let selected: BTreeSet<RelicId> = relic_ids.iter().copied().collect();
        let mut next = self.state.clone();
        next.refresh_daily(today);
        next.relics.retain(|relic| !selected.contains(&relic.id));

        let consumed = relic_ids.to_vec();
        let outcome = if success {
            let relic = Relic::mint(target, now);
            next.relics.push(relic.clone());
            FusionOutcome::succeeded(consumed, relic)
        } else {
            FusionOutcome::failed(consumed)
        };

        self.commit(next)?;

        info!(
            %level,
            inputs = relic_ids.len(),
            sample,
            success,
            "Fusion resolved"
        );
        Ok(outcome)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn today(&self, now: Timestamp) -> Result<NaiveDate, ProgressionError> {
        Ok(self.settings.calendar.day_of(now)?)
    }

    /// Persist `next`, then adopt it. On failure the in-memory state is
    /// left as it was.
    fn commit(&mut self, next: GameState) -> Result<(), ProgressionError> {
        if let Err(err) = self.store.save(&self.settings.key, &next) {
            error!(key = %self.settings.key, error = %err, "Failed to save progression state");
            return Err(err.into());
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use relic_store::{MemoryStore, SAVE_SLOT_KEY};

    use super::*;
    use crate::calendar::MS_PER_HOUR;
    use crate::roll::ScriptedRoll;

    /// 2026-10-16T08:00:00Z.
    const T0: Timestamp = 1_792_108_800_000 + 8 * MS_PER_HOUR;
    const DAY: i64 = 24 * MS_PER_HOUR;

    fn engine() -> ProgressionEngine<MemoryStore, ScriptedRoll> {
        ProgressionEngine::open(
            MemoryStore::new(),
            ScriptedRoll::always(0.0),
            EngineSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn first_claim_always_succeeds() {
        let mut engine = engine();
        assert!(engine.can_claim(0));
        let receipt = engine.claim_relic(T0).unwrap();
        assert_eq!(receipt.streak, 1);
        assert_eq!(receipt.minted_count(), 1);
        assert_eq!(engine.state().relic_count(), 1);
        assert_eq!(
            engine.state().last_streak_date,
            NaiveDate::from_ymd_opt(2026, 10, 16)
        );
        assert_eq!(engine.state().last_claim_time, T0);
    }

    #[test]
    fn cooldown_blocks_until_exactly_elapsed() {
        let mut engine = engine();
        engine.claim_relic(T0).unwrap();

        let cooldown = engine.settings().cooldown_ms;
        let err = engine.claim_relic(T0 + cooldown - 1).unwrap_err();
        assert!(matches!(err, ProgressionError::ClaimTooEarly { remaining_ms: 1 }));
        assert_eq!(engine.time_until_claim(T0 + cooldown - 1), 1);
        assert_eq!(engine.state().relic_count(), 1);

        assert!(engine.can_claim(T0 + cooldown));
        engine.claim_relic(T0 + cooldown).unwrap();
    }

    #[test]
    fn same_day_reclaim_keeps_streak() {
        let mut engine = engine();
        // 00:30 and 12:30 on the same day, 12 hours apart.
        let early = T0 - 7 * MS_PER_HOUR - 30 * 60_000;
        engine.claim_relic(early).unwrap();
        let receipt = engine.claim_relic(early + 12 * MS_PER_HOUR).unwrap();
        assert_eq!(receipt.streak, 1);
        assert_eq!(receipt.minted_count(), 1);
        assert_eq!(engine.state().relic_count(), 2);
    }

    #[test]
    fn same_day_reclaim_on_milestone_pays_again() {
        let mut engine = engine();
        let midnight = T0 - 8 * MS_PER_HOUR;
        engine.claim_relic(midnight + 12 * MS_PER_HOUR).unwrap();
        engine.claim_relic(midnight + DAY + 12 * MS_PER_HOUR).unwrap();

        let reached = engine.claim_relic(midnight + 2 * DAY + 10 * 60_000).unwrap();
        assert_eq!(reached.streak, 3);
        assert_eq!(reached.minted_count(), 2);

        let again = engine
            .claim_relic(midnight + 2 * DAY + 12 * MS_PER_HOUR + 10 * 60_000)
            .unwrap();
        assert_eq!(again.streak, 3);
        assert_eq!(again.minted_count(), 2);
        assert_eq!(engine.state().relic_count(), 6);
    }

    #[test]
    fn consecutive_days_build_streak_and_pay_milestones() {
        let mut engine = engine();
        let mut minted = Vec::new();
        for day in 0..8 {
            let receipt = engine.claim_relic(T0 + day * DAY).unwrap();
            minted.push(receipt.minted_count());
        }
        assert_eq!(engine.state().streak, 8);
        assert_eq!(minted, vec![1, 1, 2, 1, 1, 1, 3, 1]);
    }

    #[test]
    fn missed_day_resets_streak() {
        let mut engine = engine();
        engine.claim_relic(T0).unwrap();
        engine.claim_relic(T0 + DAY).unwrap();
        let receipt = engine.claim_relic(T0 + 3 * DAY).unwrap();
        assert_eq!(receipt.streak, 1);
        assert_eq!(
            engine.streak_status(T0 + 3 * DAY).unwrap(),
            StreakStatus::Active
        );
        assert_eq!(
            engine.streak_status(T0 + 4 * DAY).unwrap(),
            StreakStatus::AtRisk
        );
        assert_eq!(
            engine.streak_status(T0 + 6 * DAY).unwrap(),
            StreakStatus::Broken
        );
    }

    #[test]
    fn puzzle_pays_once_per_day() {
        let mut engine = engine();
        let first = engine.complete_puzzle(T0).unwrap();
        assert_eq!(first.relics().len(), 2);
        assert_eq!(engine.complete_puzzle(T0 + 1_000).unwrap(), BonusOutcome::AlreadyClaimed);
        assert_eq!(engine.state().relic_count(), 2);
        assert_eq!(engine.store().save_count(), 1);

        let next_day = engine.complete_puzzle(T0 + DAY).unwrap();
        assert!(next_day.is_granted());
        assert_eq!(engine.state().relic_count(), 4);
    }

    #[test]
    fn snapshot_applies_lazy_daily_reset() {
        let mut engine = engine();
        engine.complete_puzzle(T0).unwrap();
        assert!(engine.snapshot(T0).unwrap().puzzle_completed_today);
        assert!(!engine.snapshot(T0 + DAY).unwrap().puzzle_completed_today);
        // Committed state is untouched until the next write.
        assert!(engine.state().puzzle_completed_today);

        engine.claim_relic(T0 + DAY).unwrap();
        assert!(!engine.state().puzzle_completed_today);
    }

    #[test]
    fn unsolved_puzzle_is_rejected() {
        let mut engine = engine();
        let mut puzzle = engine.new_puzzle();
        puzzle.tap_all([1, 2]);
        let err = engine.solve_puzzle(&puzzle, T0).unwrap_err();
        assert!(matches!(err, ProgressionError::PuzzleUnsolved));

        puzzle.tap_all([3, 4]);
        assert!(engine.solve_puzzle(&puzzle, T0).unwrap().is_granted());
    }

    #[test]
    fn social_bonus_is_one_time() {
        let mut engine = engine();
        assert!(engine.claim_social_bonus(T0).unwrap().is_granted());
        assert_eq!(
            engine.claim_social_bonus(T0 + 30 * DAY).unwrap(),
            BonusOutcome::AlreadyClaimed
        );
        assert_eq!(engine.state().relic_count(), 1);
        assert!(engine.state().social_bonus_claimed);
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let mut engine = engine();
        engine.claim_relic(T0).unwrap();
        engine.store_mut().set_fail_writes(true);

        let before = engine.state().clone();
        let err = engine.claim_relic(T0 + DAY).unwrap_err();
        assert!(matches!(err, ProgressionError::Persistence(_)));
        assert!(!err.is_recoverable());
        assert_eq!(engine.state(), &before);

        engine.store_mut().set_fail_writes(false);
        assert_eq!(engine.claim_relic(T0 + DAY).unwrap().streak, 2);
    }

    #[test]
    fn corrupt_save_starts_fresh() {
        let mut store = MemoryStore::new();
        store.insert_raw(SAVE_SLOT_KEY, "{\"relics\": \"oops\"");
        let engine = ProgressionEngine::open(
            store,
            ScriptedRoll::default(),
            EngineSettings::default(),
        )
        .unwrap();
        assert_eq!(engine.state(), &GameState::default());
    }

    #[test]
    fn fusion_success_replaces_inputs_with_one_higher_relic() {
        let mut state = GameState::default();
        state.relics.push(Relic::mint(RelicLevel::Rare, 0));
        state.relics.push(Relic::mint(RelicLevel::Rare, 0));
        let ids: Vec<RelicId> = state.relics.iter().map(|r| r.id).collect();

        let store = MemoryStore::with_state(SAVE_SLOT_KEY, &state).unwrap();
        let mut engine = ProgressionEngine::open(
            store,
            ScriptedRoll::always(0.2),
            EngineSettings::default(),
        )
        .unwrap();

        let outcome = engine.upgrade_relics(&ids, T0).unwrap();
        assert!(outcome.success);
        let counts = engine.state().level_counts();
        assert_eq!(counts[&RelicLevel::Rare], 0);
        assert_eq!(counts[&RelicLevel::Epic], 1);
        assert_eq!(outcome.new_relic.unwrap().level, RelicLevel::Epic);
    }

    #[test]
    fn fusion_failure_destroys_inputs() {
        let mut state = GameState::default();
        state.relics.extend((0..3).map(|_| Relic::mint(RelicLevel::Epic, 0)));
        state.relics.push(Relic::mint(RelicLevel::Common, 0));
        let ids: Vec<RelicId> = state.relics[..3].iter().map(|r| r.id).collect();

        let store = MemoryStore::with_state(SAVE_SLOT_KEY, &state).unwrap();
        let mut engine = ProgressionEngine::open(
            store,
            ScriptedRoll::always(0.3),
            EngineSettings::default(),
        )
        .unwrap();

        let outcome = engine.upgrade_relics(&ids, T0).unwrap();
        assert!(!outcome.success);
        assert!(outcome.new_relic.is_none());
        assert_eq!(outcome.consumed, ids);
        assert_eq!(engine.state().relic_count(), 1);
        assert_eq!(engine.state().relics[0].level, RelicLevel::Common);
    }

    #[test]
    fn rejected_fusion_does_not_roll_or_write() {
        let mut engine = ProgressionEngine::open(
            MemoryStore::new(),
            ScriptedRoll::new([0.9, 0.1]),
            EngineSettings::default(),
        )
        .unwrap();
        engine.claim_relic(T0).unwrap();
        let id = engine.state().relics[0].id;

        let err = engine.upgrade_relics(&[id], T0).unwrap_err();
        assert!(matches!(err, ProgressionError::InsufficientInputs { count: 1 }));
        assert_eq!(engine.store().save_count(), 1);
        assert_eq!(engine.state().relic_count(), 1);
    }
}
