//! Second phase: a single round robin inside each pool.
//!
//! Pool rows start fresh (no points, damped net rate), but every match
//! draws its win probability from the teams' first-phase form, which
//! this phase never modifies.

use crate::{
    config::ForecastConfig,
    match_sim::play_fixture,
    ranking::assign_positions,
    rng::UniformSource,
    seeding::Pools,
    standings::StandingsTable,
    types::{Pool, TeamIdx},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondPhaseOutcome {
    /// Final order of pool X.
    pub x: Vec<TeamIdx>,
    /// Final order of pool Y.
    pub y: Vec<TeamIdx>,
}

impl SecondPhaseOutcome {
    pub fn finish(&self, pool: Pool) -> &[TeamIdx] {
        match pool {
            Pool::X => &self.x,
            Pool::Y => &self.y,
        }
    }
}

/// Every unordered pair of `members`, in (i, j > i) order.
pub fn round_robin_pairs(members: &[TeamIdx]) -> Vec<(TeamIdx, TeamIdx)> {
    let mut pairs = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs
}

/// Play both pools. `form` is the post-first-phase table of this trial.
pub fn advance_second_phase(
    pools:  &Pools,
    form:   &StandingsTable,
    rng:    &mut impl UniformSource,
    config: &ForecastConfig,
) -> SecondPhaseOutcome {
    let damping = config.simulation.second_phase_damping;
    let jitter = config.simulation.net_rate_jitter;

    // Fresh rows live in a table shaped like `form`; only pool members
    // are ever touched or ranked.
    let mut pool_table = StandingsTable::new(
        form.iter().map(|(_, row)| row.carried_into_next_stage(damping)).collect(),
    );

    let mut play_pool = |members: &[TeamIdx]| -> Vec<TeamIdx> {
        for (a, b) in round_robin_pairs(members) {
            let (Some(form_a), Some(form_b)) = (form.get(a), form.get(b)) else {
                continue;
            };
            let Some((row_a, row_b)) = pool_table.pair_mut(a, b) else {
                continue;
            };
            play_fixture(form_a, form_b, row_a, row_b, rng, &config.model, jitter);
        }
        assign_positions(&mut pool_table, members)
    };

    let x = play_pool(&pools.x);
    let y = play_pool(&pools.y);
    SecondPhaseOutcome { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rng::ScriptedRng, types::StandingRow};

    #[test]
    fn four_teams_make_six_pairs() {
        let members: Vec<_> = (0..4).map(TeamIdx).collect();
        let pairs = round_robin_pairs(&members);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (TeamIdx(0), TeamIdx(1)));
        assert_eq!(pairs[5], (TeamIdx(2), TeamIdx(3)));
    }

    #[test]
    fn pools_rank_on_fresh_points_only() {
        let config = ForecastConfig::default_test();
        // Team 0 dominated the first phase, the rest are identical.
        let mut rows = vec![StandingRow::default(); 8];
        rows[0] = StandingRow { played: 4, won: 4, points: 8, net_rate: 2.0, ..StandingRow::default() };
        let form = StandingsTable::new(rows);
        let pools = Pools {
            x: (0..4).map(TeamIdx).collect(),
            y: (4..8).map(TeamIdx).collect(),
        };
        // Every draw of 0.0 makes the first-listed team win its match.
        let mut rng = ScriptedRng::new(vec![0.0]);

        let outcome = advance_second_phase(&pools, &form, &mut rng, &config);

        // First-listed wins every pairing: 0 > 1 > 2 > 3 on 6/4/2/0 points.
        assert_eq!(outcome.x, pools.x);
        assert_eq!(outcome.y, pools.y);
        assert_eq!(form.get(TeamIdx(0)).unwrap().points, 8, "form table is untouched");
    }

    fn pools_of_eight() -> Pools {
        Pools {
            x: (0..4).map(TeamIdx).collect(),
            y: (4..8).map(TeamIdx).collect(),
        }
    }

    #[test]
    fn win_probability_comes_from_first_phase_form() {
        let config = ForecastConfig::default_test();
        // Team 0 unbeaten, team 1 winless. From form, 0 beats 1 with p = 0.95.
        // From fresh damped rows (no games played) the same pairing is ~0.53.
        let mut rows = vec![StandingRow::default(); 8];
        rows[0] = StandingRow { played: 4, won: 4, points: 8, net_rate: 2.0, ..StandingRow::default() };
        rows[1] = StandingRow { played: 4, lost: 4, net_rate: -2.0, ..StandingRow::default() };
        let form = StandingsTable::new(rows);

        // 0.65 falls between the two probabilities.
        let mut rng = ScriptedRng::new(vec![0.65]);
        let outcome = advance_second_phase(&pools_of_eight(), &form, &mut rng, &config);

        // 0 beats 1, 2 and 3 (p ~0.71 against an unplayed side); 1 loses all;
        // 3 beats 2 on a coin flip drawn high.
        assert_eq!(outcome.finish(Pool::X), [TeamIdx(0), TeamIdx(3), TeamIdx(2), TeamIdx(1)]);
        assert_eq!(outcome.finish(Pool::Y), [TeamIdx(7), TeamIdx(6), TeamIdx(5), TeamIdx(4)]);
    }

    #[test]
    fn damped_net_rate_breaks_a_points_tie() {
        // Team 0 carries a first-phase net rate of 1.0; everyone else 0.
        let mut rows = vec![StandingRow::default(); 8];
        rows[0].net_rate = 1.0;
        let form = StandingsTable::new(rows);

        // Per match: [decision, winner swing, loser swing]. Draws below 0.5
        // go to the first-listed side. 0, 1 and 2 beat each other in a
        // cycle and all beat 3, so they finish level on 4 points. Team 1
        // picks up 0.9 * 0.4 = 0.36 net rate in its win over 3.
        let script = vec![
            0.0, 0.0, 0.0, // 0 v 1: 0 wins
            0.9, 0.0, 0.0, // 0 v 2: 2 wins
            0.0, 0.0, 0.0, // 0 v 3: 0 wins
            0.0, 0.0, 0.0, // 1 v 2: 1 wins
            0.0, 0.9, 0.0, // 1 v 3: 1 wins
            0.0, 0.0, 0.0, // 2 v 3: 2 wins
        ];

        // Damped to 0.3, team 0 falls behind team 1's 0.36.
        let config = ForecastConfig::default_test();
        let mut rng = ScriptedRng::new(script.clone());
        let outcome = advance_second_phase(&pools_of_eight(), &form, &mut rng, &config);
        assert_eq!(outcome.x, [TeamIdx(1), TeamIdx(0), TeamIdx(2), TeamIdx(3)]);

        // Carried in full, team 0's 1.0 keeps it on top.
        let mut undamped = ForecastConfig::default_test();
        undamped.simulation.second_phase_damping = 1.0;
        let mut rng = ScriptedRng::new(script);
        let outcome = advance_second_phase(&pools_of_eight(), &form, &mut rng, &undamped);
        assert_eq!(outcome.x, [TeamIdx(0), TeamIdx(1), TeamIdx(2), TeamIdx(3)]);
    }
}
