//! Streak milestone bonuses.
//!
//! A milestone is an exact streak value that grants extra base relics on
//! the claim that reaches it. Under [`MilestonePolicy::EveryTime`] the bonus
//! fires whenever the streak counter lands on the value, including after a
//! reset and rebuild. [`MilestonePolicy::Once`] records paid thresholds in
//! the game state and never pays them twice.

use std::collections::BTreeSet;

use serde::Deserialize;

/// How often a milestone may pay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestonePolicy {
    /// Pay every time the streak reaches the exact value.
    #[default]
    EveryTime,
    /// Pay the first time only; remembered in `claimed_milestones`.
    Once,
}

/// A single milestone: reaching `streak` grants `bonus_relics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MilestoneReward {
    /// Exact streak value that triggers the bonus.
    pub streak: u32,
    /// Number of extra base relics granted.
    pub bonus_relics: u32,
}

/// Default milestones: 3 days grants 1 relic, 7 days grants 2.
pub fn default_milestones() -> Vec<MilestoneReward> {
    vec![
        MilestoneReward {
            streak: 3,
            bonus_relics: 1,
        },
        MilestoneReward {
            streak: 7,
            bonus_relics: 2,
        },
    ]
}

/// The milestone schedule plus its payout policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneTable {
    rewards: Vec<MilestoneReward>,
    policy: MilestonePolicy,
}

impl Default for MilestoneTable {
    fn default() -> Self {
        Self::new(default_milestones(), MilestonePolicy::default())
    }
}

impl MilestoneTable {
    /// Build a table from a reward list and policy.
    pub const fn new(rewards: Vec<MilestoneReward>, policy: MilestonePolicy) -> Self {
        Self { rewards, policy }
    }

    /// The configured payout policy.
    pub const fn policy(&self) -> MilestonePolicy {
        self.policy
    }

    /// The configured rewards.
    pub fn rewards(&self) -> &[MilestoneReward] {
        &self.rewards
    }

    /// Bonus relics owed for reaching `streak`, without recording anything.
    pub fn bonus_at(&self, streak: u32, claimed: &BTreeSet<u32>) -> u32 {
        self.rewards
            .iter()
            .filter(|reward| reward.streak == streak)
            .filter(|reward| {
                self.policy == MilestonePolicy::EveryTime || !claimed.contains(&reward.streak)
            })
            .fold(0_u32, |acc, reward| acc.saturating_add(reward.bonus_relics))
    }

    /// Bonus relics owed for a claim that leaves the streak at `streak`,
    /// recording the milestone as paid when the policy is
    /// [`MilestonePolicy::Once`].
    ///
    /// The check runs on the post-claim value only, so a second claim on
    /// the same calendar day that leaves the streak on a milestone pays it
    /// again under [`MilestonePolicy::EveryTime`].
    pub fn award(&self, streak: u32, claimed: &mut BTreeSet<u32>) -> u32 {
        let bonus = self.bonus_at(streak, claimed);
        if bonus > 0 && self.policy == MilestonePolicy::Once {
            claimed.insert(streak);
        }
        bonus
    }
}
