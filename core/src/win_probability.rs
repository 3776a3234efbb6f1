//! Single-match win-probability model.
//!
//! Pure and deterministic: two teams' current form in, probability that
//! the first one wins out. Randomness is applied by the caller.

use crate::{config::ModelParams, types::StandingRow};

/// Probability that `a` beats `b`, always within the configured bounds.
pub fn win_probability(a: &StandingRow, b: &StandingRow, model: &ModelParams) -> f64 {
    // Win-ratio share
    let wr_a = a.win_ratio();
    let wr_b = b.win_ratio();
    let total_wr = wr_a + wr_b;
    let mut prob = if total_wr > 0.0 { wr_a / total_wr } else { 0.5 };

    // Net-rate tilt, saturating at ±net_rate_weight
    let net_rate_diff = a.net_rate - b.net_rate;
    prob += (net_rate_diff / model.net_rate_scale).tanh() * model.net_rate_weight;

    // Points-per-match blend
    let ppm_a = a.points_per_match();
    let ppm_b = b.points_per_match();
    let total_ppm = ppm_a + ppm_b;
    if total_ppm > 0.0 {
        let ppm_share = ppm_a / total_ppm;
        prob += (ppm_share - prob) * model.points_weight;
    }

    prob.clamp(model.min_probability, model.max_probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(played: u32, won: u32, points: u32, net_rate: f64) -> StandingRow {
        StandingRow {
            played,
            won,
            lost: played - won,
            points,
            net_rate,
            ..StandingRow::default()
        }
    }

    #[test]
    fn identical_form_is_a_coin_flip() {
        let model = ModelParams::default();
        let a = row(3, 2, 4, 0.75);
        let b = row(3, 2, 4, 0.75);
        assert_eq!(win_probability(&a, &b, &model), 0.5);
        assert_eq!(win_probability(&StandingRow::default(), &StandingRow::default(), &model), 0.5);
    }

    #[test]
    fn unplayed_team_against_unbeaten_side_stays_in_bounds() {
        let model = ModelParams::default();
        let fresh = StandingRow::default();
        let unbeaten = row(40, 40, 80, 5.0);
        let p = win_probability(&fresh, &unbeaten, &model);
        assert!((0.05..=0.95).contains(&p), "p={p}");
        let q = win_probability(&unbeaten, &fresh, &model);
        assert!((0.05..=0.95).contains(&q), "q={q}");
        assert!(q > p);
    }

    #[test]
    fn winless_vs_unbeaten_hits_the_floor() {
        let model = ModelParams::default();
        let winless = row(4, 0, 0, -3.0);
        let unbeaten = row(4, 4, 8, 3.0);
        assert_eq!(win_probability(&winless, &unbeaten, &model), 0.05);
        assert_eq!(win_probability(&unbeaten, &winless, &model), 0.95);
    }

    #[test]
    fn net_rate_tilt_is_bounded() {
        let model = ModelParams::default();
        let a = row(2, 1, 2, 1_000.0);
        let b = row(2, 1, 2, -1_000.0);
        let p = win_probability(&a, &b, &model);
        // 0.5 + 0.08 before the blend; the blend pulls 30% back toward 0.5.
        assert!(p <= 0.5 + 0.08 + 1e-12, "p={p}");
        assert!(p > 0.5);
    }

    #[test]
    fn better_form_is_favoured() {
        let model = ModelParams::default();
        let strong = row(3, 3, 6, 1.2);
        let weak = row(3, 1, 2, -0.4);
        let p = win_probability(&strong, &weak, &model);
        assert!(p > 0.5 && p < 0.95, "p={p}");
        let q = win_probability(&weak, &strong, &model);
        assert!((p + q - 1.0).abs() < 1e-9, "model should be symmetric: p={p} q={q}");
    }
}
