//! Error types for the persistence layer.
//!
//! All errors are propagated via [`StoreError`], which wraps the underlying
//! I/O and JSON errors with the save-slot key they concern.

/// Errors that can occur while loading or saving a save slot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored blob exists but does not decode into a game state.
    #[error("corrupt save data at key {key}: {source}")]
    Corrupt {
        /// The save-slot key holding the bad blob.
        key: String,
        /// The underlying decode error.
        source: serde_json::Error,
    },

    /// A game state could not be encoded for storage.
    #[error("failed to encode game state: {0}")]
    Encode(#[source] serde_json::Error),

    /// The store refused the operation (e.g. it is read-only or offline).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this error means "a blob exists but is unreadable", which
    /// callers may choose to treat as an empty slot.
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}
