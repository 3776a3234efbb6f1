//! Shared primitive types used across the entire forecast engine.

use serde::{Deserialize, Serialize};

/// Stable external team identifier, as supplied by the roster.
pub type TeamId = String;

/// First-phase group label ("A", "B", ...).
pub type GroupLabel = String;

/// Dense index of a team inside one engine's resolved field.
/// Resolved once at build time; trials never look teams up by string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamIdx(pub usize);

/// Immutable team identity from the external roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRef {
    pub id:         TeamId,
    pub name:       String,
    pub short_code: String,
    pub group:      GroupLabel,
}

/// Tournament stage a fixture or standing belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    #[serde(alias = "group")]
    FirstPhase,
    #[serde(alias = "super8")]
    SecondPhase,
    #[serde(alias = "semi")]
    Semifinal,
    Final,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPhase  => "first_phase",
            Self::SecondPhase => "second_phase",
            Self::Semifinal   => "semifinal",
            Self::Final       => "final",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first_phase" | "group"   => Some(Self::FirstPhase),
            "second_phase" | "super8" => Some(Self::SecondPhase),
            "semifinal" | "semi"      => Some(Self::Semifinal),
            "final"                   => Some(Self::Final),
            _                         => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
}

impl FixtureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming  => "upcoming",
            Self::Live      => "live",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming"  => Some(Self::Upcoming),
            "live"      => Some(Self::Live),
            "completed" => Some(Self::Completed),
            _           => None,
        }
    }
}

/// A team's record within one stage context.
///
/// Plain `Copy` data: a trial always works on its own copy and never
/// shares a row with another trial or with the snapshot it came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct StandingRow {
    pub played:    u32,
    pub won:       u32,
    pub lost:      u32,
    #[serde(default)]
    pub tied:      u32,
    #[serde(default)]
    pub no_result: u32,
    pub points:    u32,
    /// Net-run-rate style tiebreak statistic.
    pub net_rate:  f64,
    #[serde(default)]
    pub position:  Option<u32>,
}

impl StandingRow {
    /// Wins per match played; 0.5 before a team has played.
    pub fn win_ratio(&self) -> f64 {
        if self.played > 0 {
            self.won as f64 / self.played as f64
        } else {
            0.5
        }
    }

    /// Points per match played; 1.0 (half of a win) before a team has played.
    pub fn points_per_match(&self) -> f64 {
        if self.played > 0 {
            self.points as f64 / self.played as f64
        } else {
            1.0
        }
    }

    /// Row for the start of a new stage: counts reset, net rate carried
    /// over scaled by `damping`.
    pub fn carried_into_next_stage(&self, damping: f64) -> Self {
        Self {
            net_rate: self.net_rate * damping,
            ..Self::default()
        }
    }
}

/// A standing row tagged with the team and first-phase group it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub group:   GroupLabel,
    #[serde(default)]
    pub stage:   Stage,
    #[serde(flatten)]
    pub row:     StandingRow,
}

/// An unplayed (or, in raw input, possibly already played) match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fixture {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    #[serde(default)]
    pub stage:        Stage,
    #[serde(default)]
    pub group:        Option<GroupLabel>,
    #[serde(default)]
    pub status:       FixtureStatus,
}

/// The two second-phase mini-leagues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Pool {
    X,
    Y,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unplayed_team_has_neutral_ratios() {
        let row = StandingRow::default();
        assert_eq!(row.win_ratio(), 0.5);
        assert_eq!(row.points_per_match(), 1.0);
    }

    #[test]
    fn carried_row_resets_counts_and_damps_net_rate() {
        let row = StandingRow {
            played: 4, won: 3, lost: 1, points: 6, net_rate: 2.0, position: Some(1),
            ..StandingRow::default()
        };
        let next = row.carried_into_next_stage(0.3);
        assert_eq!(next.played, 0);
        assert_eq!(next.points, 0);
        assert_eq!(next.position, None);
        assert!((next.net_rate - 0.6).abs() < 1e-12);
    }

    #[test]
    fn legacy_stage_names_deserialize() {
        let f: Fixture = serde_json::from_str(
            r#"{"home_team_id":"IND","away_team_id":"PAK","stage":"group","group":"A"}"#,
        ).unwrap();
        assert_eq!(f.stage, Stage::FirstPhase);
        assert_eq!(f.status, FixtureStatus::Upcoming);
    }
}
