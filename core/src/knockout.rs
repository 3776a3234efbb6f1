//! Knockout bracket: two cross-pool semifinals and a final.
//!
//!   SF1: pool X 1st vs pool Y 2nd
//!   SF2: pool Y 1st vs pool X 2nd
//!   Final: SF1 winner vs SF2 winner
//!
//! Every knockout match is decided from first-phase form.

use crate::{
    config::ModelParams,
    match_sim::{draw_winner, Side},
    rng::UniformSource,
    second_phase::SecondPhaseOutcome,
    standings::StandingsTable,
    types::TeamIdx,
    win_probability::win_probability,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnockoutOutcome {
    /// [SF1 first, SF1 second, SF2 first, SF2 second]
    pub semifinalists: [TeamIdx; 4],
    pub finalists:     [TeamIdx; 2],
    pub champion:      TeamIdx,
}

/// Semifinal pairings, or None if four distinct teams are not available.
pub fn semifinal_pairings(finish: &SecondPhaseOutcome) -> Option<[(TeamIdx, TeamIdx); 2]> {
    let (x1, x2) = (*finish.x.first()?, *finish.x.get(1)?);
    let (y1, y2) = (*finish.y.first()?, *finish.y.get(1)?);

    let all = [x1, y2, y1, x2];
    let distinct = all.iter().enumerate().all(|(i, t)| !all[..i].contains(t));
    if !distinct {
        return None;
    }
    Some([(x1, y2), (y1, x2)])
}

fn decide(
    a: TeamIdx,
    b: TeamIdx,
    form:  &StandingsTable,
    rng:   &mut impl UniformSource,
    model: &ModelParams,
) -> TeamIdx {
    let (Some(form_a), Some(form_b)) = (form.get(a), form.get(b)) else {
        return a;
    };
    match draw_winner(win_probability(form_a, form_b, model), rng) {
        Side::First  => a,
        Side::Second => b,
    }
}

pub fn advance_knockout(
    finish: &SecondPhaseOutcome,
    form:   &StandingsTable,
    rng:    &mut impl UniformSource,
    model:  &ModelParams,
) -> Option<KnockoutOutcome> {
    let [(a1, b1), (a2, b2)] = semifinal_pairings(finish)?;

    let finalist_1 = decide(a1, b1, form, rng, model);
    let finalist_2 = decide(a2, b2, form, rng, model);
    let champion = decide(finalist_1, finalist_2, form, rng, model);

    Some(KnockoutOutcome {
        semifinalists: [a1, b1, a2, b2],
        finalists:     [finalist_1, finalist_2],
        champion,
    })
}
