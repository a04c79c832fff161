//! Configuration loading and typed config structures for the reward loop.
//!
//! The canonical configuration lives in `relic-config.yaml` at the project
//! root. Every field has a default matching the shipped game balance, so
//! an empty file (or no file at all) yields a working configuration.

use std::path::Path;

use serde::Deserialize;

use crate::calendar::{Calendar, CalendarError, MS_PER_HOUR};
use crate::fusion::{FusionTable, FusionTableError};
use crate::milestones::{MilestonePolicy, MilestoneReward, MilestoneTable, default_milestones};
use crate::puzzle::DEFAULT_SEQUENCE;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but are not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<CalendarError> for ConfigError {
    fn from(err: CalendarError) -> Self {
        Self::Invalid {
            reason: err.to_string(),
        }
    }
}

impl From<FusionTableError> for ConfigError {
    fn from(err: FusionTableError) -> Self {
        Self::Invalid {
            reason: err.to_string(),
        }
    }
}

/// Top-level progression configuration.
///
/// Mirrors the structure of `relic-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressionConfig {
    /// Timed claim settings.
    #[serde(default)]
    pub claim: ClaimConfig,

    /// Calendar-day boundary settings.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Streak milestone schedule.
    #[serde(default)]
    pub milestones: MilestoneConfig,

    /// Fusion odds.
    #[serde(default)]
    pub fusion: FusionConfig,

    /// Fixed bonus rewards.
    #[serde(default)]
    pub rewards: RewardConfig,

    /// Daily puzzle settings.
    #[serde(default)]
    pub puzzle: PuzzleConfig,

    /// Save-slot settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProgressionConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `RELIC_STORAGE_DIR` overrides `storage.dir`
    /// - `RELIC_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string. Environment
    /// overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply `RELIC_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("RELIC_STORAGE_DIR") {
            self.storage.dir = dir;
        }
        if let Ok(level) = std::env::var("RELIC_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Check every value that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.claim.cooldown_ms <= 0 {
            return Err(ConfigError::Invalid {
                reason: "claim.cooldown_ms must be positive".to_owned(),
            });
        }
        self.calendar()?;
        self.fusion_table()?;

        let mut seen = std::collections::BTreeSet::new();
        for reward in &self.milestones.rewards {
            if reward.streak == 0 {
                return Err(ConfigError::Invalid {
                    reason: "milestone streak must be at least 1".to_owned(),
                });
            }
            if !seen.insert(reward.streak) {
                return Err(ConfigError::Invalid {
                    reason: format!("duplicate milestone for streak {}", reward.streak),
                });
            }
        }

        if self.puzzle.sequence.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "puzzle.sequence must not be empty".to_owned(),
            });
        }
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "storage.key must not be empty".to_owned(),
            });
        }
        Ok(())
    }

    /// Build the calendar described by `calendar.utc_offset_minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an out-of-range offset.
    pub fn calendar(&self) -> Result<Calendar, ConfigError> {
        Ok(Calendar::with_offset_minutes(
            self.calendar.utc_offset_minutes,
        )?)
    }

    /// Build the fusion odds table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] unless three chances in `[0, 1]`
    /// are configured.
    pub fn fusion_table(&self) -> Result<FusionTable, ConfigError> {
        Ok(FusionTable::new(&self.fusion.success_chance)?)
    }

    /// Build the milestone table.
    pub fn milestone_table(&self) -> MilestoneTable {
        MilestoneTable::new(self.milestones.rewards.clone(), self.milestones.policy)
    }
}

/// Timed claim configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClaimConfig {
    /// Minimum milliseconds between successful claims.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: i64,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

/// Calendar configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CalendarConfig {
    /// Minutes east of UTC at which a new calendar day starts.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Milestone configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MilestoneConfig {
    /// Whether a milestone can pay more than once.
    #[serde(default)]
    pub policy: MilestonePolicy,

    /// Streak values and their bonus relic counts.
    #[serde(default = "default_milestones")]
    pub rewards: Vec<MilestoneReward>,
}

impl Default for MilestoneConfig {
    fn default() -> Self {
        Self {
            policy: MilestonePolicy::default(),
            rewards: default_milestones(),
        }
    }
}

/// Fusion configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FusionConfig {
    /// Success chance for levels 0, 1 and 2.
    #[serde(default = "default_success_chance")]
    pub success_chance: Vec<f64>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            success_chance: default_success_chance(),
        }
    }
}

/// Fixed bonus reward configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardConfig {
    /// Base relics granted for the daily puzzle.
    #[serde(default = "default_puzzle_relics")]
    pub puzzle_relics: u32,

    /// Base relics granted for the one-time social bonus.
    #[serde(default = "default_social_relics")]
    pub social_relics: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            puzzle_relics: default_puzzle_relics(),
            social_relics: default_social_relics(),
        }
    }
}

/// Daily puzzle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PuzzleConfig {
    /// Node order the player must tap.
    #[serde(default = "default_sequence")]
    pub sequence: Vec<u8>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            sequence: default_sequence(),
        }
    }
}

/// Save-slot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// The single save-slot key.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Directory holding save files.
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            dir: default_storage_dir(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_cooldown_ms() -> i64 {
    12 * MS_PER_HOUR
}

fn default_success_chance() -> Vec<f64> {
    vec![1.0, 0.5, 0.3]
}

const fn default_puzzle_relics() -> u32 {
    2
}

const fn default_social_relics() -> u32 {
    1
}

fn default_sequence() -> Vec<u8> {
    DEFAULT_SEQUENCE.to_vec()
}

fn default_storage_key() -> String {
    relic_store::SAVE_SLOT_KEY.to_owned()
}

fn default_storage_dir() -> String {
    ".relic-data".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
