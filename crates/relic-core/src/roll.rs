//! Random source for fusion rolls.
//!
//! The engine draws exactly one uniform sample per fusion attempt. The
//! [`FusionRoll`] trait abstracts where that sample comes from, so the
//! engine can run on a thread-local generator in production, a seeded one
//! in simulations, or a fixed script in tests.

use std::collections::VecDeque;

use rand::rngs::{SmallRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Upper clamp for scripted samples, just below 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// A source of uniform samples in `[0, 1)`.
pub trait FusionRoll {
    /// Draw one sample in `[0, 1)`.
    fn roll(&mut self) -> f64;
}

impl<T: FusionRoll + ?Sized> FusionRoll for &mut T {
    fn roll(&mut self) -> f64 {
        (**self).roll()
    }
}

/// Adapts any [`rand::Rng`] into a [`FusionRoll`].
#[derive(Debug, Clone)]
pub struct RngRoll<R> {
    rng: R,
}

impl<R: Rng> RngRoll<R> {
    /// Wrap an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngRoll<ThreadRng> {
    /// Use the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl RngRoll<SmallRng> {
    /// A reproducible generator seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FusionRoll for RngRoll<R> {
    fn roll(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of samples.
///
/// Once the script is exhausted the last sample repeats; an empty script
/// yields `0.0`. Samples outside `[0, 1)` are clamped into range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoll {
    samples: VecDeque<f64>,
    last: f64,
}

impl ScriptedRoll {
    /// Create a script that yields `samples` in order.
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            last: 0.0,
        }
    }

    /// A script that always yields `sample`.
    pub fn always(sample: f64) -> Self {
        Self::new([sample])
    }

    /// Number of scripted samples not yet drawn.
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl FusionRoll for ScriptedRoll {
    fn roll(&mut self) -> f64 {
        if let Some(next) = self.samples.pop_front() {
            self.last = clamp_unit(next);
        }
        self.last
    }
}

fn clamp_unit(sample: f64) -> f64 {
    if sample.is_nan() || sample < 0.0 {
        0.0
    } else {
        sample.min(BELOW_ONE)
    }
}
