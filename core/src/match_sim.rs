//! Stochastic resolution of a single fixture.
//!
//! Simulated matches always have a winner (2 points) and a loser
//! (0 points). Only recorded historical rows may carry ties.

use crate::{
    config::ModelParams,
    rng::UniformSource,
    types::StandingRow,
    win_probability::win_probability,
};

pub const POINTS_PER_WIN: u32 = 2;

/// Which side of a pairing won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

/// One draw against `p`, the first side's win probability.
pub fn draw_winner(p: f64, rng: &mut impl UniformSource) -> Side {
    if rng.next_f64() < p {
        Side::First
    } else {
        Side::Second
    }
}

/// Apply a result to both rows. The net-rate swing is two independent
/// uniform draws in [0, jitter): one added to the winner, one taken from
/// the loser.
pub fn record_result(
    winner: &mut StandingRow,
    loser:  &mut StandingRow,
    rng:    &mut impl UniformSource,
    jitter: f64,
) {
    winner.played += 1;
    winner.won += 1;
    winner.points += POINTS_PER_WIN;
    winner.net_rate += rng.next_f64() * jitter;

    loser.played += 1;
    loser.lost += 1;
    loser.net_rate -= rng.next_f64() * jitter;
}

/// Decide a match from `form_*` and book it into `row_*`.
///
/// Form and record are separate because the second phase draws its
/// probabilities from first-phase form while accumulating fresh rows.
pub fn play_fixture(
    form_a: &StandingRow,
    form_b: &StandingRow,
    row_a:  &mut StandingRow,
    row_b:  &mut StandingRow,
    rng:    &mut impl UniformSource,
    model:  &ModelParams,
    jitter: f64,
) -> Side {
    let side = draw_winner(win_probability(form_a, form_b, model), rng);
    match side {
        Side::First  => record_result(row_a, row_b, rng, jitter),
        Side::Second => record_result(row_b, row_a, rng, jitter),
    }
    side
}

/// Simulate a match whose probability comes from the same rows it updates.
pub fn simulate_match(
    a:      &mut StandingRow,
    b:      &mut StandingRow,
    rng:    &mut impl UniformSource,
    model:  &ModelParams,
    jitter: f64,
) -> Side {
    let (form_a, form_b) = (*a, *b);
    play_fixture(&form_a, &form_b, a, b, rng, model, jitter)
}
