//! The daily sequence puzzle.
//!
//! The player is shown a set of numbered nodes and must tap them in the
//! target order. A wrong tap clears progress and the player starts over.
//! The puzzle itself holds no reward logic; the engine pays out when a
//! solved puzzle is submitted.

/// Default target order.
pub const DEFAULT_SEQUENCE: [u8; 4] = [1, 2, 3, 4];

/// What a single tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapResult {
    /// Correct node; `progress` nodes are now lit.
    Advanced {
        /// Number of correct taps so far.
        progress: usize,
    },
    /// Wrong node; progress cleared.
    Reset,
    /// The whole sequence has been entered.
    Solved,
}

/// Tap-in-order puzzle state for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePuzzle {
    target: Vec<u8>,
    progress: usize,
}

impl Default for SequencePuzzle {
    fn default() -> Self {
        Self::new(DEFAULT_SEQUENCE.to_vec())
    }
}

impl SequencePuzzle {
    /// Start a puzzle with the given target order.
    pub const fn new(target: Vec<u8>) -> Self {
        Self {
            target,
            progress: 0,
        }
    }

    /// The target order.
    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// Number of correct taps so far.
    pub const fn progress(&self) -> usize {
        self.progress
    }

    /// Whether every node has been tapped in order.
    pub fn is_solved(&self) -> bool {
        self.progress >= self.target.len()
    }

    /// Register a tap on `node`.
    pub fn tap(&mut self, node: u8) -> TapResult {
        if self.is_solved() {
            return TapResult::Solved;
        }
        if self.target.get(self.progress) == Some(&node) {
            self.progress = self.progress.saturating_add(1);
            if self.is_solved() {
                TapResult::Solved
            } else {
                TapResult::Advanced {
                    progress: self.progress,
                }
            }
        } else {
            self.progress = 0;
            TapResult::Reset
        }
    }

    /// Replay a sequence of taps, returning the result of the last one.
    /// An empty sequence leaves the puzzle unchanged.
    pub fn tap_all(&mut self, nodes: impl IntoIterator<Item = u8>) -> Option<TapResult> {
        nodes.into_iter().map(|node| self.tap(node)).last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_taps_solve() {
        let mut puzzle = SequencePuzzle::default();
        assert_eq!(puzzle.tap(1), TapResult::Advanced { progress: 1 });
        assert_eq!(puzzle.tap(2), TapResult::Advanced { progress: 2 });
        assert_eq!(puzzle.tap(3), TapResult::Advanced { progress: 3 });
        assert_eq!(puzzle.tap(4), TapResult::Solved);
        assert!(puzzle.is_solved());
    }

    #[test]
    fn wrong_tap_resets_progress() {
        let mut puzzle = SequencePuzzle::default();
        puzzle.tap(1);
        puzzle.tap(2);
        assert_eq!(puzzle.tap(4), TapResult::Reset);
        assert_eq!(puzzle.progress(), 0);
        assert_eq!(puzzle.tap_all([1, 2, 3, 4]), Some(TapResult::Solved));
    }

    #[test]
    fn taps_after_solving_change_nothing() {
        let mut puzzle = SequencePuzzle::default();
        puzzle.tap_all([1, 2, 3, 4]);
        assert_eq!(puzzle.tap(9), TapResult::Solved);
        assert_eq!(puzzle.progress(), 4);
    }

    #[test]
    fn empty_tap_list_is_none() {
        let mut puzzle = SequencePuzzle::default();
        assert_eq!(puzzle.tap_all([]), None);
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn custom_target() {
        let mut puzzle = SequencePuzzle::new(vec![3, 1]);
        assert_eq!(puzzle.tap(1), TapResult::Reset);
        assert_eq!(puzzle.tap_all([3, 1]), Some(TapResult::Solved));
        assert_eq!(puzzle.target(), &[3, 1]);
    }
}
