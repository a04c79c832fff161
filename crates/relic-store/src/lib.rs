//! Save-slot persistence for the relic reward loop.
//!
//! The progression engine reads one [`GameState`] blob at construction and
//! writes it back after every mutating operation. This crate defines the
//! [`StateStore`] seam the engine depends on, plus two implementations:
//!
//! - [`memory`] -- [`MemoryStore`], an in-process map used by tests and
//!   embedders that persist elsewhere.
//! - [`file`] -- [`JsonFileStore`], one JSON file per key with atomic
//!   replace-on-write.
//!
//! # Blob format
//!
//! Every store holds the same JSON encoding of [`GameState`] (camelCase
//! keys). A blob that exists but fails to decode is reported as
//! [`StoreError::Corrupt`]; a missing blob loads as the default state.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use relic_types::GameState;

/// The single, namespaced save slot used by the whole application.
pub const SAVE_SLOT_KEY: &str = "base-mini-app-state";

/// Key-value persistence for game state blobs.
///
/// Implementations must make `save` all-or-nothing: after an `Err`, a
/// subsequent `load` returns the previously saved state.
pub trait StateStore {
    /// Load the state stored at `key`.
    ///
    /// Returns [`GameState::default`] when nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if a blob exists but cannot be
    /// decoded, or another [`StoreError`] if the medium cannot be read.
    fn load(&self, key: &str) -> Result<GameState, StoreError>;

    /// Replace the state stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write does not complete.
    fn save(&mut self, key: &str, state: &GameState) -> Result<(), StoreError>;
}

/// Encode a state into its stored JSON form.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if serialization fails.
pub fn encode(state: &GameState) -> Result<String, StoreError> {
    serde_json::to_string(state).map_err(StoreError::Encode)
}

/// Decode a stored blob read from `key`.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if the blob is not a valid state.
pub fn decode(key: &str, blob: &str) -> Result<GameState, StoreError> {
    serde_json::from_str(blob).map_err(|source| StoreError::Corrupt {
        key: key.to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use relic_types::{Relic, RelicLevel};

    use super::*;

    #[test]
    fn encode_then_decode_preserves_inventory() {
        let mut state = GameState {
            streak: 5,
            ..GameState::default()
        };
        state.relics.push(Relic::mint(RelicLevel::Epic, 99));
        let blob = encode(&state).unwrap();
        assert_eq!(decode(SAVE_SLOT_KEY, &blob).unwrap(), state);
    }

    #[test]
    fn garbage_is_corrupt_not_io() {
        let err = decode(SAVE_SLOT_KEY, "{not json").unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains(SAVE_SLOT_KEY));
    }
}
