//! Resolution of a raw snapshot into the engine's typed view.
//!
//! Every string lookup (team ids in standings and fixtures, seeded team
//! names) happens here, once per run. Trials only ever see TeamIdx.
//! Anything that does not resolve is dropped with a warning.

use crate::{
    config::GroupSeeding,
    snapshot::TournamentSnapshot,
    standings::StandingsTable,
    types::{FixtureStatus, GroupLabel, Stage, TeamId, TeamIdx, TeamRef},
};
use std::collections::{BTreeMap, HashMap};

/// Seeded teams of one first-phase group, resolved against the field.
/// A seed whose team is not in the field resolves to None.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedSeeding {
    pub x: Option<TeamIdx>,
    pub y: Option<TeamIdx>,
}

#[derive(Debug, Clone)]
pub struct FieldGroup {
    pub label:   GroupLabel,
    /// Members in the order their standing rows were supplied.
    pub members: Vec<TeamIdx>,
    /// None when the seeding table has no entry for this group.
    pub seeding: Option<ResolvedSeeding>,
}

/// A remaining first-phase fixture with both teams resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFixture {
    pub home: TeamIdx,
    pub away: TeamIdx,
}

#[derive(Debug, Clone)]
pub struct Field {
    roster:        Vec<TeamRef>,
    entrants:      Vec<TeamRef>,
    entrant_group: Vec<GroupLabel>,
    by_id:         HashMap<TeamId, TeamIdx>,
    groups:        Vec<FieldGroup>,
    fixtures:      Vec<ResolvedFixture>,
    standings:     StandingsTable,
}

impl Field {
    pub fn resolve(snapshot: &TournamentSnapshot, seeding: &[GroupSeeding]) -> Self {
        let mut roster: Vec<TeamRef> = Vec::with_capacity(snapshot.teams.len());
        let mut roster_by_id: HashMap<&str, &TeamRef> = HashMap::new();
        for team in &snapshot.teams {
            if roster_by_id.contains_key(team.id.as_str()) {
                log::warn!("roster: duplicate team id '{}' ignored", team.id);
                continue;
            }
            roster_by_id.insert(team.id.as_str(), team);
            roster.push(team.clone());
        }

        // Entrants: roster teams that also have a first-phase standing row.
        let mut entrants = Vec::new();
        let mut entrant_group = Vec::new();
        let mut rows = Vec::new();
        let mut by_id: HashMap<TeamId, TeamIdx> = HashMap::new();
        let mut members: BTreeMap<GroupLabel, Vec<TeamIdx>> = BTreeMap::new();

        for standing in &snapshot.standings {
            if standing.stage != Stage::FirstPhase {
                log::debug!(
                    "standings: skipping {} row for '{}'",
                    standing.stage.as_str(), standing.team_id
                );
                continue;
            }
            let Some(team) = roster_by_id.get(standing.team_id.as_str()) else {
                log::warn!("standings: team '{}' not in roster, row dropped", standing.team_id);
                continue;
            };
            if by_id.contains_key(&standing.team_id) {
                log::warn!("standings: duplicate row for '{}' ignored", standing.team_id);
                continue;
            }
            let idx = TeamIdx(entrants.len());
            entrants.push((*team).clone());
            entrant_group.push(standing.group.clone());
            rows.push(standing.row);
            by_id.insert(standing.team_id.clone(), idx);
            members.entry(standing.group.clone()).or_default().push(idx);
        }

        for team in &roster {
            if !by_id.contains_key(&team.id) {
                log::warn!("roster: team '{}' has no standing row and cannot qualify", team.id);
            }
        }

        let mut skipped_played = 0usize;
        let mut fixtures = Vec::new();
        for fixture in &snapshot.fixtures {
            if fixture.stage != Stage::FirstPhase || fixture.status != FixtureStatus::Upcoming {
                skipped_played += 1;
                continue;
            }
            let home = by_id.get(&fixture.home_team_id).copied();
            let away = by_id.get(&fixture.away_team_id).copied();
            match (home, away) {
                (Some(home), Some(away)) if home != away => {
                    fixtures.push(ResolvedFixture { home, away });
                }
                _ => log::warn!(
                    "fixtures: {} vs {} does not resolve to two known teams, skipped",
                    fixture.home_team_id, fixture.away_team_id
                ),
            }
        }
        if skipped_played > 0 {
            log::debug!("fixtures: {skipped_played} non-upcoming or non-first-phase fixtures ignored");
        }

        let groups = members
            .into_iter()
            .map(|(label, members)| {
                let seeding = match seeding.iter().find(|s| s.group == label) {
                    Some(entry) => Some(ResolvedSeeding {
                        x: resolve_seed(&entrants, &entrant_group, &label, &entry.x_seed),
                        y: resolve_seed(&entrants, &entrant_group, &label, &entry.y_seed),
                    }),
                    None => {
                        log::warn!("seeding: no entry for group '{label}', trials cannot form pools");
                        None
                    }
                };
                FieldGroup { label, members, seeding }
            })
            .collect();

        Self {
            roster,
            entrants,
            entrant_group,
            by_id,
            groups,
            fixtures,
            standings: StandingsTable::new(rows),
        }
    }

    /// Full roster in input order, including teams that cannot qualify.
    pub fn roster(&self) -> &[TeamRef] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn team(&self, idx: TeamIdx) -> &TeamRef {
        &self.entrants[idx.0]
    }

    /// First-phase group the team's standing row belongs to.
    pub fn group_of(&self, idx: TeamIdx) -> &str {
        &self.entrant_group[idx.0]
    }

    pub fn index_of(&self, team_id: &str) -> Option<TeamIdx> {
        self.by_id.get(team_id).copied()
    }

    /// First-phase groups sorted by label.
    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn fixtures(&self) -> &[ResolvedFixture] {
        &self.fixtures
    }

    /// Current standings as supplied. Trials clone this, never borrow it mutably.
    pub fn standings(&self) -> &StandingsTable {
        &self.standings
    }
}

/// Find the seeded team by name among the members of `group`.
/// A seed can only ever qualify from its own group.
fn resolve_seed(
    entrants: &[TeamRef],
    entrant_group: &[GroupLabel],
    group: &str,
    name: &str,
) -> Option<TeamIdx> {
    let found = entrants
        .iter()
        .zip(entrant_group)
        .position(|(t, g)| t.name == name && g == group)
        .map(TeamIdx);
    if found.is_none() {
        log::warn!("seeding: group '{group}' seed '{name}' not in field");
    }
    found
}
