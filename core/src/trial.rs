//! One trial: the whole tournament from the current snapshot to a champion.
//!
//! A trial owns its standings outright (a fresh copy of the snapshot
//! table) and borrows nothing mutable from anyone else, so any number
//! of trials can run side by side.

use crate::{
    config::ForecastConfig,
    field::Field,
    first_phase::advance_first_phase,
    knockout::{advance_knockout, KnockoutOutcome},
    rng::UniformSource,
    second_phase::{advance_second_phase, SecondPhaseOutcome},
    seeding::{assign_pools, Pools},
    types::TeamIdx,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Top finishers of every first-phase group.
    pub second_phase:  Vec<TeamIdx>,
    /// None when the pool-count check failed; nothing further was played.
    pub pools:         Option<Pools>,
    pub pool_finish:   Option<SecondPhaseOutcome>,
    /// None when no valid bracket could be formed.
    pub knockout:      Option<KnockoutOutcome>,
}

impl TrialOutcome {
    /// Whether the trial produced a champion.
    pub fn is_complete(&self) -> bool {
        self.knockout.is_some()
    }

    pub fn champion(&self) -> Option<TeamIdx> {
        self.knockout.as_ref().map(|k| k.champion)
    }
}

pub fn run_trial(
    field:  &Field,
    config: &ForecastConfig,
    rng:    &mut impl UniformSource,
) -> TrialOutcome {
    let mut table = field.standings().clone();

    let first = advance_first_phase(field, &mut table, rng, config);
    let second_phase: Vec<TeamIdx> = first.qualified().collect();

    let Some(pools) = assign_pools(&first) else {
        return TrialOutcome { second_phase, pools: None, pool_finish: None, knockout: None };
    };

    let finish = advance_second_phase(&pools, &table, rng, config);
    let knockout = advance_knockout(&finish, &table, rng, &config.model);

    TrialOutcome {
        second_phase,
        pools: Some(pools),
        pool_finish: Some(finish),
        knockout,
    }
}
