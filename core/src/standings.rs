//! Trial-local standings storage.
//!
//! A StandingsTable is owned by exactly one trial. It is built by
//! copying the snapshot table, so nothing a trial does can leak into
//! another trial or back into the input.

use crate::types::{StandingRow, TeamIdx};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandingsTable {
    rows: Vec<StandingRow>,
}

impl StandingsTable {
    pub fn new(rows: Vec<StandingRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, idx: TeamIdx) -> Option<&StandingRow> {
        self.rows.get(idx.0)
    }

    pub fn get_mut(&mut self, idx: TeamIdx) -> Option<&mut StandingRow> {
        self.rows.get_mut(idx.0)
    }

    /// Mutable access to two distinct rows at once.
    /// Returns None if the indices coincide or either is out of range.
    pub fn pair_mut(
        &mut self,
        a: TeamIdx,
        b: TeamIdx,
    ) -> Option<(&mut StandingRow, &mut StandingRow)> {
        if a == b || a.0 >= self.rows.len() || b.0 >= self.rows.len() {
            return None;
        }
        if a.0 < b.0 {
            let (lo, hi) = self.rows.split_at_mut(b.0);
            Some((&mut lo[a.0], &mut hi[0]))
        } else {
            let (lo, hi) = self.rows.split_at_mut(a.0);
            Some((&mut hi[0], &mut lo[b.0]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamIdx, &StandingRow)> {
        self.rows.iter().enumerate().map(|(i, r)| (TeamIdx(i), r))
    }
}
