//! Plain-text rendering of state and operation results.

use relic_core::{StreakStatus, format_countdown};
use relic_types::{BonusOutcome, ClaimReceipt, FusionOutcome, GameState, Relic};

use crate::platform::PlatformStatus;

/// Inputs to the status screen that are not part of the saved state.
#[derive(Debug, Clone, Copy)]
pub struct StatusContext {
    /// Milliseconds until the next claim.
    pub until_claim_ms: i64,
    /// Streak standing at the time of rendering.
    pub streak_status: StreakStatus,
    /// Host readiness.
    pub platform: PlatformStatus,
}

/// The dashboard: streak, timers, bonuses, inventory.
pub fn status(state: &GameState, ctx: StatusContext) -> String {
    let puzzle = if state.puzzle_completed_today { "done" } else { "open" };
    let social = if state.social_bonus_claimed { "claimed" } else { "open" };

    let mut lines = vec![
        format!("platform: {}", ctx.platform.label()),
        format!("streak: {} ({})", state.streak, ctx.streak_status),
        format!("next claim: {}", countdown(ctx.until_claim_ms)),
        format!("daily puzzle: {puzzle}"),
        format!("social bonus: {social}"),
        format!(
            "referrals: {} (code {})",
            state.referral_count,
            state.referral_code()
        ),
    ];
    if state.genesis_pass {
        lines.push("genesis pass: held".to_owned());
    }

    lines.push(format!("relics: {}", state.relic_count()));
    lines.extend(
        state
            .level_counts()
            .into_iter()
            .map(|(level, count)| format!("  {level}: {count}")),
    );
    lines.extend(state.relics.iter().map(|relic| format!("  {}", relic_line(relic))));
    lines.join("\n")
}

/// Countdown text, or `ready` when a claim is allowed now.
pub fn countdown(until_claim_ms: i64) -> String {
    if until_claim_ms > 0 {
        format_countdown(until_claim_ms)
    } else {
        "ready".to_owned()
    }
}

/// Summary of a timed claim.
pub fn claim(receipt: &ClaimReceipt) -> String {
    match receipt.bonus_count() {
        0 => receipt.message.clone(),
        bonus => format!("{} (+{bonus} milestone bonus)", receipt.message),
    }
}

/// Summary of a one-shot bonus.
pub fn bonus(what: &str, outcome: &BonusOutcome) -> String {
    match outcome {
        BonusOutcome::Granted { relics } => {
            format!("{what} complete: +{} relics", relics.len())
        }
        BonusOutcome::AlreadyClaimed => format!("{what} already claimed"),
    }
}

/// Summary of a fusion attempt.
pub fn fusion(outcome: &FusionOutcome) -> String {
    match &outcome.new_relic {
        Some(relic) => format!("{} {}", outcome.message, relic_line(relic)),
        None => format!(
            "{} ({} relics consumed)",
            outcome.message,
            outcome.consumed.len()
        ),
    }
}

fn relic_line(relic: &Relic) -> String {
    format!("{} {}", relic.level, relic.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use relic_types::{RelicId, RelicLevel};

    use super::*;

    #[test]
    fn status_lists_every_tier_and_relic() {
        let relic = Relic::mint(RelicLevel::Rare, 0);
        let state = GameState {
            relics: vec![relic.clone()],
            streak: 4,
            referral_count: 2,
            ..GameState::default()
        };
        let text = status(
            &state,
            StatusContext {
                until_claim_ms: 3_723_000,
                streak_status: StreakStatus::Active,
                platform: PlatformStatus { ready: true },
            },
        );
        assert!(text.contains("platform: ready"));
        assert!(text.contains("streak: 4 (active)"));
        assert!(text.contains("next claim: 1:02:03"));
        assert!(text.contains("referrals: 2 (code 1002)"));
        assert!(text.contains("L0: 0"));
        assert!(text.contains("L1: 1"));
        assert!(text.contains(&relic.id.to_string()));
    }

    #[test]
    fn status_puts_one_fact_per_line() {
        let state = GameState {
            genesis_pass: true,
            puzzle_completed_today: true,
            ..GameState::default()
        };
        let text = status(
            &state,
            StatusContext {
                until_claim_ms: 0,
                streak_status: StreakStatus::Active,
                platform: PlatformStatus::default(),
            },
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"platform: waiting"));
        assert!(lines.contains(&"next claim: ready"));
        assert!(lines.contains(&"daily puzzle: done"));
        assert!(lines.contains(&"social bonus: open"));
        assert!(lines.contains(&"genesis pass: held"));
        assert!(lines.contains(&"relics: 0"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn countdown_reads_ready_at_zero() {
        assert_eq!(countdown(0), "ready");
        assert_eq!(countdown(1_000), "0:00:01");
    }

    #[test]
    fn claim_mentions_milestone_bonus() {
        let receipt = ClaimReceipt::new(3, Relic::mint_common(2, 0));
        assert_eq!(claim(&receipt), "Claimed! Streak: 3 (+1 milestone bonus)");
        let plain = ClaimReceipt::new(1, Relic::mint_common(1, 0));
        assert_eq!(claim(&plain), "Claimed! Streak: 1");
    }

    #[test]
    fn fusion_failure_counts_losses() {
        let outcome = FusionOutcome::failed(vec![RelicId::new(), RelicId::new()]);
        assert_eq!(fusion(&outcome), "Not this time. (2 relics consumed)");
    }

    #[test]
    fn bonus_lines() {
        assert_eq!(
            bonus("puzzle", &BonusOutcome::AlreadyClaimed),
            "puzzle already claimed"
        );
        let granted = BonusOutcome::Granted {
            relics: Relic::mint_common(2, 0),
        };
        assert_eq!(bonus("puzzle", &granted), "puzzle complete: +2 relics");
    }
}
