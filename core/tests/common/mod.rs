//! Shared snapshot builders for integration tests.
#![allow(dead_code)]

use tourney_core::{
    snapshot::TournamentSnapshot,
    types::{Fixture, FixtureStatus, Stage, StandingRow, TeamRef, TeamStanding},
};

pub const GROUPS: [&str; 4] = ["A", "B", "C", "D"];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn team(id: &str, name: &str, group: &str) -> TeamRef {
    TeamRef {
        id:         id.into(),
        name:       name.into(),
        short_code: id.into(),
        group:      group.into(),
    }
}

pub fn standing(id: &str, group: &str, played: u32, won: u32, net_rate: f64) -> TeamStanding {
    TeamStanding {
        team_id: id.into(),
        group:   group.into(),
        stage:   Stage::FirstPhase,
        row:     StandingRow {
            played,
            won,
            lost: played - won,
            points: won * 2,
            net_rate,
            ..StandingRow::default()
        },
    }
}

pub fn fixture(home: &str, away: &str, group: &str) -> Fixture {
    Fixture {
        home_team_id: home.into(),
        away_team_id: away.into(),
        stage:        Stage::FirstPhase,
        group:        Some(group.into()),
        status:       FixtureStatus::Upcoming,
    }
}

/// Four groups of five ("A1".."D5", name == id), two matches played each.
/// Within a group team 1 is strongest and team 5 weakest.
/// Every group still has its full round robin to play.
pub fn twenty_team_snapshot() -> TournamentSnapshot {
    let mut snapshot = TournamentSnapshot::default();
    for group in GROUPS {
        for k in 1..=5u32 {
            let id = format!("{group}{k}");
            let won = match k {
                1 => 2,
                2 | 3 => 1,
                _ => 0,
            };
            snapshot.teams.push(team(&id, &id, group));
            snapshot.standings.push(standing(&id, group, 2, won, (3.0 - k as f64) * 0.5));
        }
        for i in 1..=5 {
            for j in (i + 1)..=5 {
                snapshot.fixtures.push(fixture(&format!("{group}{i}"), &format!("{group}{j}"), group));
            }
        }
    }
    snapshot
}
