//! Stage ranking. One routine for every stage so tie-breaks never drift.

use crate::{standings::StandingsTable, types::TeamIdx};
use std::cmp::Ordering;

/// Order `members` by points (desc), then net rate (desc).
/// Full ties keep the order they were given in. Members without a
/// row in `table` are dropped.
pub fn rank(table: &StandingsTable, members: &[TeamIdx]) -> Vec<TeamIdx> {
    let mut rows: Vec<_> = members
        .iter()
        .filter_map(|&idx| table.get(idx).map(|row| (idx, row)))
        .collect();
    rows.sort_by(|(_, a), (_, b)| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.net_rate.partial_cmp(&a.net_rate).unwrap_or(Ordering::Equal))
    });
    rows.into_iter().map(|(idx, _)| idx).collect()
}

/// Rank `members` and write 1-based finishing positions into their rows.
pub fn assign_positions(table: &mut StandingsTable, members: &[TeamIdx]) -> Vec<TeamIdx> {
    let order = rank(table, members);
    for (pos, &idx) in order.iter().enumerate() {
        if let Some(row) = table.get_mut(idx) {
            row.position = Some(pos as u32 + 1);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StandingRow;

    fn table(rows: &[(u32, f64)]) -> StandingsTable {
        StandingsTable::new(
            rows.iter()
                .map(|&(points, net_rate)| StandingRow { points, net_rate, ..StandingRow::default() })
                .collect(),
        )
    }

    fn idx(v: &[usize]) -> Vec<TeamIdx> {
        v.iter().map(|&i| TeamIdx(i)).collect()
    }

    #[test]
    fn points_then_net_rate() {
        let t = table(&[(2, 0.5), (4, -1.0), (2, 1.5), (0, 3.0)]);
        assert_eq!(rank(&t, &idx(&[0, 1, 2, 3])), idx(&[1, 2, 0, 3]));
    }

    #[test]
    fn full_tie_keeps_input_order() {
        let t = table(&[(2, 0.5), (2, 0.5)]);
        assert_eq!(rank(&t, &idx(&[1, 0])), idx(&[1, 0]));
        assert_eq!(rank(&t, &idx(&[0, 1])), idx(&[0, 1]));
    }

    #[test]
    fn only_members_are_ranked() {
        let t = table(&[(6, 0.0), (4, 0.0), (2, 0.0)]);
        assert_eq!(rank(&t, &idx(&[2, 1, 7])), idx(&[1, 2]));
    }

    #[test]
    fn positions_are_one_based() {
        let mut t = table(&[(0, 0.0), (4, 0.0), (2, 0.0)]);
        assign_positions(&mut t, &idx(&[0, 1, 2]));
        assert_eq!(t.get(TeamIdx(1)).unwrap().position, Some(1));
        assert_eq!(t.get(TeamIdx(2)).unwrap().position, Some(2));
        assert_eq!(t.get(TeamIdx(0)).unwrap().position, Some(3));
    }
}
