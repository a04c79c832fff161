//! End-to-end tests for [`ProgressionEngine`] driven through a
//! [`MemoryStore`].
//!
//! These cover whole player journeys: multi-day streaks, milestone
//! payouts under both policies, the daily puzzle window, fusion outcomes
//! and what ends up in the save slot.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use relic_core::{
    EngineSettings, ErrorKind, MilestonePolicy, MilestoneReward, MilestoneTable,
    ProgressionEngine, ProgressionError, ScriptedRoll, StreakStatus,
};
use relic_store::{MemoryStore, SAVE_SLOT_KEY, StateStore};
use relic_types::{BonusOutcome, GameState, Relic, RelicId, RelicLevel, Timestamp};

const HOUR: i64 = 3_600_000;
const DAY: i64 = 24 * HOUR;

/// 2026-10-16T09:00:00Z.
const MORNING: Timestamp = 1_792_108_800_000 + 9 * HOUR;

type TestEngine = ProgressionEngine<MemoryStore, ScriptedRoll>;

fn open(store: MemoryStore, roll: ScriptedRoll, settings: EngineSettings) -> TestEngine {
    ProgressionEngine::open(store, roll, settings).expect("engine opens")
}

fn fresh() -> TestEngine {
    open(
        MemoryStore::new(),
        ScriptedRoll::default(),
        EngineSettings::default(),
    )
}

fn with_relics(levels: &[RelicLevel], roll: ScriptedRoll) -> (TestEngine, Vec<RelicId>) {
    let state = GameState {
        relics: levels.iter().map(|&level| Relic::mint(level, 0)).collect(),
        ..GameState::default()
    };
    let ids = state.relics.iter().map(|relic| relic.id).collect();
    let store = MemoryStore::with_state(SAVE_SLOT_KEY, &state).unwrap();
    (open(store, roll, EngineSettings::default()), ids)
}

fn persisted(engine: &TestEngine) -> GameState {
    engine.store().load(SAVE_SLOT_KEY).unwrap()
}

// =============================================================================
// Timed claim
// =============================================================================

#[test]
fn very_first_claim_at_epoch_zero_succeeds() {
    let mut engine = fresh();
    let receipt = engine.claim_relic(0).unwrap();

    assert_eq!(receipt.streak, 1);
    assert_eq!(receipt.minted_count(), 1);
    assert_eq!(receipt.message, "Claimed! Streak: 1");
    assert_eq!(
        engine.state().last_streak_date,
        chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
    );
}

#[test]
fn claim_is_persisted_immediately() {
    let mut engine = fresh();
    engine.claim_relic(MORNING).unwrap();

    assert_eq!(&persisted(&engine), engine.state());
    assert_eq!(persisted(&engine).last_claim_time, MORNING);
}

#[test]
fn early_claim_reports_remaining_time_and_changes_nothing() {
    let mut engine = fresh();
    engine.claim_relic(MORNING).unwrap();
    let before = engine.state().clone();

    let err = engine.claim_relic(MORNING + 2 * HOUR).unwrap_err();
    assert_eq!(err.to_string(), "Too early to claim.");
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert!(err.is_recoverable());
    match err {
        ProgressionError::ClaimTooEarly { remaining_ms } => {
            assert_eq!(remaining_ms, 10 * HOUR);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(engine.state(), &before);
    assert_eq!(engine.store().save_count(), 1);
}

#[test]
fn clock_moving_backwards_only_lengthens_the_wait() {
    let mut engine = fresh();
    engine.claim_relic(MORNING).unwrap();

    assert_eq!(engine.time_until_claim(MORNING - HOUR), 13 * HOUR);
    assert!(!engine.can_claim(MORNING - HOUR));
}

#[test]
fn streak_survives_a_late_night_then_early_morning_pair() {
    let mut engine = fresh();
    // 23:00 on day D, then 11:00 on day D+1 (exactly one cooldown later).
    let late = MORNING + 14 * HOUR;
    engine.claim_relic(late).unwrap();
    let receipt = engine.claim_relic(late + 12 * HOUR).unwrap();
    assert_eq!(receipt.streak, 2);
}

#[test]
fn streak_resets_after_a_gap() {
    let mut engine = fresh();
    engine.claim_relic(MORNING).unwrap();
    engine.claim_relic(MORNING + DAY).unwrap();
    assert_eq!(engine.state().streak, 2);
    assert_eq!(
        engine.streak_status(MORNING + 3 * DAY).unwrap(),
        StreakStatus::Broken
    );

    let receipt = engine.claim_relic(MORNING + 3 * DAY).unwrap();
    assert_eq!(receipt.streak, 1);
    assert_eq!(receipt.minted_count(), 1);
}

// =============================================================================
// Milestones
// =============================================================================

#[test]
fn milestones_pay_exactly_at_three_and_seven() {
    let mut engine = fresh();
    let counts: Vec<usize> = (0..7)
        .map(|day| engine.claim_relic(MORNING + day * DAY).unwrap().minted_count())
        .collect();

    assert_eq!(counts, vec![1, 1, 2, 1, 1, 1, 3]);
    assert_eq!(engine.state().relic_count(), 10);
    assert_eq!(engine.state().level_counts()[&RelicLevel::Common], 10);
}

#[test]
fn milestone_refires_after_reset_by_default() {
    let mut engine = fresh();
    for day in 0..3 {
        engine.claim_relic(MORNING + day * DAY).unwrap();
    }
    // Miss a day, then climb back to 3.
    let restart = MORNING + 4 * DAY;
    let counts: Vec<usize> = (0..3)
        .map(|day| engine.claim_relic(restart + day * DAY).unwrap().minted_count())
        .collect();
    assert_eq!(counts, vec![1, 1, 2]);
    assert!(engine.state().claimed_milestones.is_empty());
}

#[test]
fn once_policy_pays_each_milestone_a_single_time() {
    let settings = EngineSettings {
        milestones: MilestoneTable::new(
            vec![MilestoneReward {
                streak: 3,
                bonus_relics: 1,
            }],
            MilestonePolicy::Once,
        ),
        ..EngineSettings::default()
    };
    let mut engine = open(MemoryStore::new(), ScriptedRoll::default(), settings);

    for day in 0..3 {
        engine.claim_relic(MORNING + day * DAY).unwrap();
    }
    assert!(engine.state().claimed_milestones.contains(&3));

    let restart = MORNING + 4 * DAY;
    let counts: Vec<usize> = (0..3)
        .map(|day| engine.claim_relic(restart + day * DAY).unwrap().minted_count())
        .collect();
    assert_eq!(counts, vec![1, 1, 1]);
    assert!(persisted(&engine).claimed_milestones.contains(&3));
}

#[test]
fn evening_reclaim_on_a_milestone_day_follows_the_policy() {
    let once = EngineSettings {
        milestones: MilestoneTable::new(
            vec![MilestoneReward {
                streak: 3,
                bonus_relics: 1,
            }],
            MilestonePolicy::Once,
        ),
        ..EngineSettings::default()
    };
    for (settings, expected) in [(EngineSettings::default(), 2), (once, 1)] {
        let mut engine = open(MemoryStore::new(), ScriptedRoll::default(), settings);
        for day in 0..3 {
            engine.claim_relic(MORNING + day * DAY).unwrap();
        }
        // 21:00 on the third day, exactly one cooldown after the morning claim.
        let receipt = engine.claim_relic(MORNING + 2 * DAY + 12 * HOUR).unwrap();
        assert_eq!(receipt.streak, 3);
        assert_eq!(receipt.minted_count(), expected);
    }
}

// =============================================================================
// One-shot bonuses
// =============================================================================

#[test]
fn puzzle_window_reopens_on_the_next_calendar_day() {
    let mut engine = fresh();
    // 23:30 then 00:30 the next day: different calendar days.
    let late = MORNING + 14 * HOUR + 30 * 60_000;
    assert!(engine.complete_puzzle(late).unwrap().is_granted());
    assert!(engine.complete_puzzle(late + HOUR).unwrap().is_granted());
    assert_eq!(engine.state().relic_count(), 4);
}

#[test]
fn solving_the_puzzle_grants_two_relics_once() {
    let mut engine = fresh();
    let mut puzzle = engine.new_puzzle();
    puzzle.tap_all([1, 3]);
    assert!(matches!(
        engine.solve_puzzle(&puzzle, MORNING),
        Err(ProgressionError::PuzzleUnsolved)
    ));
    puzzle.tap_all([1, 2, 3, 4]);

    let first = engine.solve_puzzle(&puzzle, MORNING).unwrap();
    assert_eq!(first.relics().len(), 2);
    let second = engine.solve_puzzle(&puzzle, MORNING + HOUR).unwrap();
    assert_eq!(second, BonusOutcome::AlreadyClaimed);
    assert_eq!(engine.state().relic_count(), 2);
}

#[test]
fn social_bonus_survives_reload() {
    let mut engine = fresh();
    engine.claim_social_bonus(MORNING).unwrap();
    let store = engine.store().clone();

    let mut reopened = open(store, ScriptedRoll::default(), EngineSettings::default());
    assert!(reopened.state().social_bonus_claimed);
    assert_eq!(
        reopened.claim_social_bonus(MORNING + DAY).unwrap(),
        BonusOutcome::AlreadyClaimed
    );
    assert_eq!(reopened.state().relic_count(), 1);
}

// =============================================================================
// Fusion
// =============================================================================

#[test]
fn two_rare_relics_with_low_draw_become_one_epic() {
    let (mut engine, ids) =
        with_relics(&[RelicLevel::Rare, RelicLevel::Rare], ScriptedRoll::always(0.2));

    let outcome = engine.upgrade_relics(&ids, MORNING).unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.message, "Upgrade Successful!");

    let counts = engine.state().level_counts();
    assert_eq!(counts[&RelicLevel::Rare], 0);
    assert_eq!(counts[&RelicLevel::Epic], 1);
    assert_eq!(engine.state().relics[0].obtained_at, MORNING);
}

#[test]
fn burning_more_inputs_still_yields_one_relic() {
    let (mut engine, ids) = with_relics(&[RelicLevel::Common; 6], ScriptedRoll::always(0.99));

    let outcome = engine.upgrade_relics(&ids, MORNING).unwrap();
    assert!(outcome.success);
    assert_eq!(engine.state().relic_count(), 1);
    assert_eq!(engine.state().relics[0].level, RelicLevel::Rare);
}

#[test]
fn failed_fusion_is_persisted_as_a_loss() {
    let (mut engine, ids) = with_relics(
        &[RelicLevel::Epic, RelicLevel::Epic, RelicLevel::Rare],
        ScriptedRoll::always(0.3),
    );

    let outcome = engine.upgrade_relics(&ids[..2], MORNING).unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Not this time.");

    let saved = persisted(&engine);
    assert_eq!(saved.relic_count(), 1);
    assert_eq!(saved.relics[0].level, RelicLevel::Rare);
}

#[test]
fn fusion_rejections_leave_inventory_alone() {
    let (mut engine, ids) = with_relics(
        &[
            RelicLevel::Common,
            RelicLevel::Rare,
            RelicLevel::Mythic,
            RelicLevel::Mythic,
        ],
        ScriptedRoll::default(),
    );
    let before = engine.state().clone();

    let cases: Vec<(Vec<RelicId>, &str)> = vec![
        (vec![ids[0]], "Select relics to upgrade."),
        (vec![ids[0], RelicId::new()], "Invalid relic selection."),
        (vec![ids[0], ids[0]], "Invalid relic selection."),
        (vec![ids[0], ids[1]], "Relics must be the same level."),
        (vec![ids[2], ids[3]], "Max level reached."),
    ];
    for (selection, message) in cases {
        let err = engine.upgrade_relics(&selection, MORNING).unwrap_err();
        assert_eq!(err.to_string(), message);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(engine.state(), &before);
    }
    assert_eq!(engine.store().save_count(), 0);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn failed_save_rolls_back_every_operation() {
    let (mut engine, ids) =
        with_relics(&[RelicLevel::Common, RelicLevel::Common], ScriptedRoll::default());
    engine.store_mut().set_fail_writes(true);
    let before = engine.state().clone();

    assert!(matches!(
        engine.claim_relic(MORNING),
        Err(ProgressionError::Persistence(_))
    ));
    assert!(matches!(
        engine.complete_puzzle(MORNING),
        Err(ProgressionError::Persistence(_))
    ));
    assert!(matches!(
        engine.claim_social_bonus(MORNING),
        Err(ProgressionError::Persistence(_))
    ));
    let err = engine.upgrade_relics(&ids, MORNING).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);

    assert_eq!(engine.state(), &before);
    assert_eq!(&persisted(&engine), &before);
}

#[test]
fn stale_puzzle_flag_is_cleared_on_next_write() {
    let mut engine = fresh();
    engine.complete_puzzle(MORNING).unwrap();
    assert!(persisted(&engine).puzzle_completed_today);

    engine.claim_social_bonus(MORNING + DAY).unwrap();
    let saved = persisted(&engine);
    assert!(!saved.puzzle_completed_today);
    assert!(saved.last_puzzle_date.is_some());
}

#[test]
fn blob_written_by_the_engine_uses_camel_case_keys() {
    let mut engine = fresh();
    engine.claim_relic(MORNING).unwrap();
    let raw = engine.store().raw(SAVE_SLOT_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();

    assert_eq!(value["lastClaimTime"], MORNING);
    assert_eq!(value["streak"], 1);
    assert_eq!(value["lastStreakDate"], "2026-10-16");
    assert_eq!(value["relics"][0]["level"], 0);
    assert!(value["relics"][0]["obtainedAt"].is_i64());
}
