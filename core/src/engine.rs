//! The forecast engine: Monte Carlo over whole-tournament trials.
//!
//! PIPELINE (per trial, fixed order):
//!   1. Copy current standings into a trial-local table
//!   2. First phase  : remaining fixtures, top two per group
//!   3. Seeding      : qualifiers routed into pools X and Y
//!   4. Second phase : round robin in each pool
//!   5. Knockout     : semifinals and final
//!
//! RULES:
//!   - A trial never shares mutable state with another trial.
//!   - All randomness flows through the RngBank, one stream per trial.
//!   - Counters are folded per worker and merged at the end.
//!   - The engine performs no I/O.

use crate::{
    config::ForecastConfig,
    error::SimResult,
    field::Field,
    prediction::{to_predictions, PredictionRow, TrialCounters},
    rng::RngBank,
    snapshot::TournamentSnapshot,
    trial::{run_trial, TrialOutcome},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub predictions:      Vec<PredictionRow>,
    pub master_seed:      u64,
    pub trials_requested: u64,
    /// Trials that ran; percentages are relative to this.
    pub trials_completed: u64,
    /// Completed trials that failed the pool-count check.
    pub trials_discarded: u64,
}

pub struct ForecastEngine {
    field:    Field,
    config:   ForecastConfig,
    rng_bank: RngBank,
}

impl ForecastEngine {
    /// Resolve the snapshot against the config. The master seed is fixed
    /// here, so repeated runs of one engine are identical.
    pub fn build(snapshot: &TournamentSnapshot, config: ForecastConfig) -> SimResult<Self> {
        config.validate()?;
        let field = Field::resolve(snapshot, &config.seeding);
        let rng_bank = RngBank::from_optional_seed(config.seed);
        log::debug!(
            "engine: {} of {} roster teams in field, {} groups, {} fixtures to play",
            field.len(),
            field.roster().len(),
            field.groups().len(),
            field.fixtures().len()
        );
        Ok(Self { field, config, rng_bank })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn master_seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Run one trial in isolation. Trial `i` always replays identically
    /// for a given master seed.
    pub fn run_trial(&self, trial: u64) -> TrialOutcome {
        let mut rng = self.rng_bank.for_trial(trial);
        run_trial(&self.field, &self.config, &mut rng)
    }

    pub fn run(&self) -> Forecast {
        self.run_with_cancel(&AtomicBool::new(false))
    }

    /// Run the configured number of trials, stopping early once `cancel`
    /// is set. Trials already finished still count.
    pub fn run_with_cancel(&self, cancel: &AtomicBool) -> Forecast {
        self.run_until(|_| cancel.load(Ordering::Relaxed))
    }

    /// Core loop. `stop` is checked before each trial, with its index;
    /// a trial it rejects is not run and not counted.
    fn run_until(&self, stop: impl Fn(u64) -> bool + Sync) -> Forecast {
        let trials = self.config.simulation.trials;
        let teams = self.field.len();
        log::info!(
            "forecast: running {trials} trials (seed={:#x}, teams={teams})",
            self.master_seed()
        );

        let counters = (0..trials)
            .into_par_iter()
            .fold(
                || TrialCounters::new(teams),
                |mut counters, trial| {
                    if !stop(trial) {
                        counters.record(&self.run_trial(trial));
                    }
                    counters
                },
            )
            .reduce(|| TrialCounters::new(teams), TrialCounters::merge);

        if counters.completed() < trials {
            log::warn!(
                "forecast: cancelled after {} of {trials} trials",
                counters.completed()
            );
        }
        if counters.discarded() > 0 {
            log::warn!(
                "forecast: {} trials discarded before the knockout phase",
                counters.discarded()
            );
        }
        log::info!("forecast: {} trials completed", counters.completed());

        Forecast {
            predictions:      to_predictions(&self.field, &counters, self.config.simulation.confidence),
            master_seed:      self.master_seed(),
            trials_requested: trials,
            trials_completed: counters.completed(),
            trials_discarded: counters.discarded(),
        }
    }
}

/// Build and run in one step.
pub fn run_forecast(snapshot: &TournamentSnapshot, config: ForecastConfig) -> SimResult<Forecast> {
    Ok(ForecastEngine::build(snapshot, config)?.run())
}
