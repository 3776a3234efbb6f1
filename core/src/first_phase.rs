//! First phase: play out the remaining group fixtures, then take the
//! top finishers of every group.

use crate::{
    config::ForecastConfig,
    field::{Field, FieldGroup},
    match_sim::simulate_match,
    ranking::assign_positions,
    rng::UniformSource,
    standings::StandingsTable,
    types::TeamIdx,
};

pub const QUALIFIERS_PER_GROUP: usize = 2;

#[derive(Debug, Clone)]
pub struct GroupQualifiers<'f> {
    pub group:      &'f FieldGroup,
    /// Ordered finishers, at most QUALIFIERS_PER_GROUP long.
    pub qualifiers: Vec<TeamIdx>,
}

#[derive(Debug, Clone)]
pub struct FirstPhaseOutcome<'f> {
    /// One entry per first-phase group, in label order.
    pub groups: Vec<GroupQualifiers<'f>>,
}

impl FirstPhaseOutcome<'_> {
    /// Every team that reached the second phase this trial.
    pub fn qualified(&self) -> impl Iterator<Item = TeamIdx> + '_ {
        self.groups.iter().flat_map(|g| g.qualifiers.iter().copied())
    }
}

/// Resolve every remaining fixture in order against `table`, then rank
/// each group. Later fixtures see the effect of earlier ones.
pub fn advance_first_phase<'f>(
    field:  &'f Field,
    table:  &mut StandingsTable,
    rng:    &mut impl UniformSource,
    config: &ForecastConfig,
) -> FirstPhaseOutcome<'f> {
    for fixture in field.fixtures() {
        // Fixtures are resolved at build time; a miss here means a
        // table that does not belong to this field.
        let Some((home, away)) = table.pair_mut(fixture.home, fixture.away) else {
            continue;
        };
        simulate_match(home, away, rng, &config.model, config.simulation.net_rate_jitter);
    }

    let groups = field
        .groups()
        .iter()
        .map(|group| {
            let mut qualifiers = assign_positions(table, &group.members);
            qualifiers.truncate(QUALIFIERS_PER_GROUP);
            GroupQualifiers { group, qualifiers }
        })
        .collect();

    FirstPhaseOutcome { groups }
}
