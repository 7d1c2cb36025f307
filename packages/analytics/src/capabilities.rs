//! Injected time and randomness.
//!
//! The climate simulator and resource allocator never read the wall clock
//! or a global RNG. They receive these capabilities from the caller, which
//! lets tests pin the hour and seed the random stream.

use chrono::Timelike as _;
use rand::SeedableRng as _;
use rand::distributions::{Distribution as _, Standard};
use rand_chacha::ChaCha8Rng;

/// Source of the current hour of day.
pub trait Clock: Send + Sync {
    /// Hour of day, `0..=23`.
    fn current_hour(&self) -> u32;
}

/// Reads the local wall-clock hour.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(u32);

impl FixedClock {
    /// Creates a clock stuck at `hour` (taken modulo 24).
    #[must_use]
    pub const fn new(hour: u32) -> Self {
        Self(hour % 24)
    }
}

impl Clock for FixedClock {
    fn current_hour(&self) -> u32 {
        self.0
    }
}

/// Source of uniformly distributed floats.
pub trait RandomSource {
    /// A uniform draw from `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// A uniform draw from `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (high - low).mul_add(self.unit(), low)
    }
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: rand::RngCore> RngSource<R> {
    /// Wraps an existing generator.
    pub const fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<ChaCha8Rng> {
    /// Deterministic source for reproducible reports.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Source seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

impl<R: rand::RngCore> RandomSource for RngSource<R> {
    fn unit(&mut self) -> f64 {
        Standard.sample(&mut self.0)
    }
}

/// Replays a fixed list of unit draws, for tests that need to steer
/// specific branches.
#[cfg(test)]
pub(crate) struct ScriptedRandom(std::collections::VecDeque<f64>);

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(draws: &[f64]) -> Self {
        Self(draws.iter().copied().collect())
    }

    pub(crate) fn remaining(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f64 {
        self.0.pop_front().expect("scripted random source exhausted")
    }
}
