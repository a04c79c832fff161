//! In-memory [`StateStore`].

use std::collections::BTreeMap;

use relic_types::GameState;

use crate::{StateStore, StoreError, decode, encode};

/// A [`StateStore`] backed by a map of encoded blobs.
///
/// Blobs are stored encoded, so the same decode path (and the same
/// corruption handling) applies as for durable stores. Writes can be made
/// to fail on demand to exercise the engine's all-or-nothing commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: BTreeMap<String, String>,
    fail_writes: bool,
    saves: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose slot `key` already holds `state`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] if the state cannot be encoded.
    pub fn with_state(key: &str, state: &GameState) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.blobs.insert(key.to_owned(), encode(state)?);
        Ok(store)
    }

    /// Place a raw blob at `key`, bypassing encoding.
    pub fn insert_raw(&mut self, key: &str, blob: impl Into<String>) {
        self.blobs.insert(key.to_owned(), blob.into());
    }

    /// The raw blob stored at `key`, if any.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub const fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful saves so far.
    pub const fn save_count(&self) -> u64 {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<GameState, StoreError> {
        self.blobs
            .get(key)
            .map_or_else(|| Ok(GameState::default()), |blob| decode(key, blob))
    }

    fn save(&mut self, key: &str, state: &GameState) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable(format!(
                "writes disabled for key {key}"
            )));
        }
        let blob = encode(state)?;
        self.blobs.insert(key.to_owned(), blob);
        self.saves = self.saves.saturating_add(1);
        tracing::trace!(key, saves = self.saves, "State saved to memory");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::SAVE_SLOT_KEY;

    #[test]
    fn empty_slot_loads_default() {
        let store = MemoryStore::new();
        assert_eq!(store.load(SAVE_SLOT_KEY).unwrap(), GameState::default());
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let state = GameState {
            streak: 3,
            ..GameState::default()
        };
        store.save(SAVE_SLOT_KEY, &state).unwrap();
        assert_eq!(store.load(SAVE_SLOT_KEY).unwrap().streak, 3);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn failed_write_keeps_previous_blob() {
        let mut store = MemoryStore::new();
        let first = GameState {
            streak: 1,
            ..GameState::default()
        };
        store.save(SAVE_SLOT_KEY, &first).unwrap();
        store.set_fail_writes(true);

        let second = GameState {
            streak: 2,
            ..GameState::default()
        };
        let err = store.save(SAVE_SLOT_KEY, &second).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.load(SAVE_SLOT_KEY).unwrap().streak, 1);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn raw_garbage_loads_as_corrupt() {
        let mut store = MemoryStore::new();
        store.insert_raw(SAVE_SLOT_KEY, "[1, 2");
        assert!(store.load(SAVE_SLOT_KEY).unwrap_err().is_corrupt());
    }

    #[test]
    fn slots_are_independent() {
        let mut store = MemoryStore::new();
        let state = GameState {
            streak: 9,
            ..GameState::default()
        };
        store.save("other-slot", &state).unwrap();
        assert_eq!(store.load(SAVE_SLOT_KEY).unwrap().streak, 0);
        assert!(store.raw("other-slot").is_some());
    }
}
