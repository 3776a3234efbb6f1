//! Stage tallies across trials and their conversion to percentages.

use crate::{field::Field, trial::TrialOutcome, types::TeamId};
use serde::{Deserialize, Serialize};

/// How many trials a team reached each stage in. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTally {
    pub second_phase: u64,
    pub semifinal:    u64,
    pub final_:       u64,
    pub champion:     u64,
}

impl StageTally {
    fn add(&mut self, other: &StageTally) {
        self.second_phase += other.second_phase;
        self.semifinal += other.semifinal;
        self.final_ += other.final_;
        self.champion += other.champion;
    }
}

/// Counters for a set of trials, indexed by TeamIdx.
/// Each worker keeps its own; they are merged once at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialCounters {
    tallies:   Vec<StageTally>,
    completed: u64,
    discarded: u64,
}

impl TrialCounters {
    pub fn new(teams: usize) -> Self {
        Self {
            tallies:   vec![StageTally::default(); teams],
            completed: 0,
            discarded: 0,
        }
    }

    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.completed += 1;
        for idx in &outcome.second_phase {
            self.tallies[idx.0].second_phase += 1;
        }
        let Some(ko) = &outcome.knockout else {
            self.discarded += 1;
            return;
        };
        for idx in &ko.semifinalists {
            self.tallies[idx.0].semifinal += 1;
        }
        for idx in &ko.finalists {
            self.tallies[idx.0].final_ += 1;
        }
        self.tallies[ko.champion.0].champion += 1;
    }

    pub fn merge(mut self, other: TrialCounters) -> TrialCounters {
        for (mine, theirs) in self.tallies.iter_mut().zip(&other.tallies) {
            mine.add(theirs);
        }
        self.completed += other.completed;
        self.discarded += other.discarded;
        self
    }

    pub fn tally(&self, idx: usize) -> StageTally {
        self.tallies.get(idx).copied().unwrap_or_default()
    }

    /// Trials run to the end (with or without a champion).
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Completed trials that stopped before the knockout phase.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

/// Per-team stage probabilities, in percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRow {
    pub team_id:          TeamId,
    pub team_name:        String,
    pub short_code:       String,
    pub group:            String,
    pub second_phase_pct: f64,
    pub semifinal_pct:    f64,
    pub final_pct:        f64,
    pub champion_pct:     f64,
    pub confidence:       f64,
}

/// `100 * count / trials`, rounded to one decimal place. 0 when no trials ran.
pub fn percentage(count: u64, trials: u64) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / trials as f64).round() / 10.0
}

/// One row per roster team, sorted by championship percentage (desc).
/// Teams that never entered the field get all-zero rows.
pub fn to_predictions(field: &Field, counters: &TrialCounters, confidence: f64) -> Vec<PredictionRow> {
    let trials = counters.completed();
    let mut rows: Vec<PredictionRow> = field
        .roster()
        .iter()
        .map(|team| {
            let tally = field
                .index_of(&team.id)
                .map(|idx| counters.tally(idx.0))
                .unwrap_or_default();
            PredictionRow {
                team_id:          team.id.clone(),
                team_name:        team.name.clone(),
                short_code:       team.short_code.clone(),
                group:            team.group.clone(),
                second_phase_pct: percentage(tally.second_phase, trials),
                semifinal_pct:    percentage(tally.semifinal, trials),
                final_pct:        percentage(tally.final_, trials),
                champion_pct:     percentage(tally.champion, trials),
                confidence,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.champion_pct.total_cmp(&a.champion_pct));
    rows
}
