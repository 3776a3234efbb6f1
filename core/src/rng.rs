//! Random number generation for forecast runs.
//!
//! RULE: Nothing in the engine may call a platform RNG inside a trial.
//! All randomness flows through TrialRng instances derived from the
//! single master seed of the run.
//!
//! Each trial gets its own RNG stream, seeded from
//! (master_seed XOR trial_index * golden ratio). This means:
//!   - Results do not depend on which worker thread runs which trial.
//!   - Any single trial can be replayed in isolation.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Source of uniform draws in [0.0, 1.0).
///
/// The match simulator only ever sees this trait, so tests can feed
/// it scripted sequences.
pub trait UniformSource {
    fn next_f64(&mut self) -> f64;
}

/// A deterministic RNG for a single trial.
pub struct TrialRng {
    pub trial: u64,
    inner:     Pcg64Mcg,
}

impl TrialRng {
    pub fn new(master_seed: u64, trial: u64) -> Self {
        let derived_seed = master_seed ^ (trial.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            trial,
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }
}

impl UniformSource for TrialRng {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// All trial RNGs for a single run.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Pinned seed if given, otherwise a fresh one from the OS-seeded
    /// thread RNG (drawn once per run, never per trial).
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random::<u64>))
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_trial(&self, trial: u64) -> TrialRng {
        TrialRng::new(self.master_seed, trial)
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
/// Test helper for the match simulator and the stage advancers.
#[cfg(test)]
pub(crate) struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted rng needs at least one value");
        Self { values, cursor: 0 }
    }
}

#[cfg(test)]
impl UniformSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
