//! Snapshot of the tournament as supplied by the data source.
//!
//! A snapshot is everything a forecast run reads: roster, current
//! first-phase standings and the remaining fixtures. It is never
//! mutated by the engine.

use crate::{
    error::SimResult,
    types::{Fixture, TeamRef, TeamStanding},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TournamentSnapshot {
    pub teams:     Vec<TeamRef>,
    pub standings: Vec<TeamStanding>,
    #[serde(default)]
    pub fixtures:  Vec<Fixture>,
}

impl TournamentSnapshot {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
