//! Progression engine for the relic reward loop.
//!
//! The engine owns one player's [`GameState`](relic_types::GameState) and
//! applies the reward rules to it: a cooldown-gated timed claim, a daily
//! streak with milestone bonuses, a once-per-day puzzle, a one-time social
//! bonus, and probabilistic fusion of same-level relics.
//!
//! # Modules
//!
//! - [`engine`] -- [`ProgressionEngine`], the owner of the state
//! - [`config`] -- YAML configuration with `RELIC_*` env overrides
//! - [`calendar`] -- Timestamp to calendar-day mapping, countdown format
//! - [`streak`] -- Day-over-day streak transitions
//! - [`milestones`] -- Streak milestone bonuses
//! - [`fusion`] -- Fusion selection checks and odds
//! - [`puzzle`] -- The tap-in-order daily puzzle
//! - [`roll`] -- The [`FusionRoll`] randomness seam
//! - [`error`] -- [`ProgressionError`]

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod milestones;
pub mod puzzle;
pub mod roll;
pub mod streak;

pub use calendar::{Calendar, CalendarError, format_countdown};
pub use config::{ConfigError, ProgressionConfig};
pub use engine::{EngineSettings, ProgressionEngine};
pub use error::{ErrorKind, ProgressionError};
pub use fusion::{FusionTable, FusionTableError, MIN_FUSION_INPUTS};
pub use milestones::{MilestonePolicy, MilestoneReward, MilestoneTable};
pub use puzzle::{SequencePuzzle, TapResult};
pub use roll::{FusionRoll, RngRoll, ScriptedRoll};
pub use streak::{StreakChange, StreakStatus, StreakUpdate};
