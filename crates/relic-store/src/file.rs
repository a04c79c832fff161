//! JSON file [`StateStore`].
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a sibling temporary
//! file that is then renamed over the target, so a crash mid-write leaves
//! the previous save intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use relic_types::GameState;

use crate::{StateStore, StoreError, decode, encode};

/// A [`StateStore`] that keeps one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the save files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so a key
    /// can never escape the store directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let safe = safe.trim_start_matches('.');
        let name = if safe.is_empty() { "_" } else { safe };
        self.dir.join(format!("{name}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<GameState, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => decode(key, &blob),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No save file, starting fresh");
                Ok(GameState::default())
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save(&mut self, key: &str, state: &GameState) -> Result<(), StoreError> {
        let blob = encode(state)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob.as_bytes())?;
        if let Err(e) = fs::rename(&tmp, &path) {
            // Best effort: the temporary file is garbage either way.
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io(e));
        }

        tracing::debug!(path = %path.display(), bytes = blob.len(), "State saved to disk");
        Ok(())
    }
}
