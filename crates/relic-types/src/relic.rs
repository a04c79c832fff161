//! Relics and their rarity tiers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::RelicId;

/// Epoch milliseconds, the unit every timestamp in the model uses.
pub type Timestamp = i64;

/// Ordinal rarity tier of a relic.
///
/// Serialized as the bare integer `0..=3`. Any other integer fails to
/// decode, so a loaded inventory can never hold an out-of-range level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RelicLevel {
    /// Level 0, the tier every claim and bonus mints.
    Common,
    /// Level 1.
    Rare,
    /// Level 2.
    Epic,
    /// Level 3, the maximum. Cannot be fused further.
    Mythic,
}

impl RelicLevel {
    /// The highest tier.
    pub const MAX: Self = Self::Mythic;

    /// All tiers in ascending order.
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Mythic];

    /// Numeric value of the tier (0 to 3).
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Common => 0,
            Self::Rare => 1,
            Self::Epic => 2,
            Self::Mythic => 3,
        }
    }

    /// The tier one step up, or `None` at [`RelicLevel::MAX`].
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Common => Some(Self::Rare),
            Self::Rare => Some(Self::Epic),
            Self::Epic => Some(Self::Mythic),
            Self::Mythic => None,
        }
    }

    /// Whether this is the highest tier.
    pub const fn is_max(self) -> bool {
        matches!(self, Self::Mythic)
    }
}

/// Error returned when an integer does not name a relic tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRelicLevel(pub u8);

impl core::fmt::Display for InvalidRelicLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "relic level must be between 0 and 3, got {}", self.0)
    }
}

impl std::error::Error for InvalidRelicLevel {}

impl TryFrom<u8> for RelicLevel {
    type Error = InvalidRelicLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Common),
            1 => Ok(Self::Rare),
            2 => Ok(Self::Epic),
            3 => Ok(Self::Mythic),
            other => Err(InvalidRelicLevel(other)),
        }
    }
}

impl From<RelicLevel> for u8 {
    fn from(level: RelicLevel) -> Self {
        level.as_u8()
    }
}

impl core::fmt::Display for RelicLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "L{}", self.as_u8())
    }
}

/// A collectible unit in the player's inventory.
///
/// Relics are immutable once minted. The only transition is removal,
/// when a fusion consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Relic {
    /// Unique identity within the inventory.
    pub id: RelicId,
    /// Rarity tier.
    #[ts(type = "0 | 1 | 2 | 3")]
    pub level: RelicLevel,
    /// When the relic was minted (epoch milliseconds).
    #[ts(type = "number")]
    pub obtained_at: Timestamp,
}

impl Relic {
    /// Mint a fresh relic with a new identifier.
    pub fn mint(level: RelicLevel, obtained_at: Timestamp) -> Self {
        Self {
            id: RelicId::new(),
            level,
            obtained_at,
        }
    }

    /// Mint `count` fresh base-tier relics sharing one timestamp.
    pub fn mint_common(count: u32, obtained_at: Timestamp) -> Vec<Self> {
        (0..count)
            .map(|_| Self::mint(RelicLevel::Common, obtained_at))
            .collect()
    }
}
