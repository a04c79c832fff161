//! Relic identity.
//!
//! Relics are the only thing a player owns that needs a handle: the
//! upgrade command names the two relics to fuse by id. Ids are minted
//! from the clock, so an inventory sorted by id lists older relics first.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Handle for one relic in a player's inventory, printed and parsed in
/// the hyphenated UUID form the upgrade command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct RelicId(pub Uuid);

impl RelicId {
    /// Mint the id for a freshly awarded relic.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Unwrap to the raw UUID.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RelicId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RelicId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelicId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for RelicId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<RelicId> for Uuid {
    fn from(id: RelicId) -> Self {
        id.0
    }
}
