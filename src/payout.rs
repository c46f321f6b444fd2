// src/payout.rs
// Prize-pot splitting with the house's round-up rule.

use serde::{Deserialize, Serialize};

/// Outcome of splitting a pot across the winners of one game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSummary {
    /// Exact per-winner share, no rounding.
    pub calculated_per_winner: f64,
    /// What each winner is actually handed: the share rounded UP to the
    /// next whole currency unit. Whole dollars, not cents; the house always
    /// rounds in the winner's favor and eats the difference.
    pub actual_per_winner: f64,
    pub total_actual_payout: f64,
    /// Excess paid out due to rounding, always >= 0.
    pub rounding_loss: f64,
}

impl PayoutSummary {
    pub fn zero() -> Self {
        PayoutSummary {
            calculated_per_winner: 0.0,
            actual_per_winner: 0.0,
            total_actual_payout: 0.0,
            rounding_loss: 0.0,
        }
    }
}

/// Split `pot` across `winner_count` winners. Degenerate input (empty pot
/// or no winners) yields an all-zero summary rather than an error, matching
/// the host flow where the form recomputes on every keystroke.
pub fn calculate(pot: f64, winner_count: u32) -> PayoutSummary {
    if pot <= 0.0 || winner_count == 0 {
        return PayoutSummary::zero();
    }

    let winners = f64::from(winner_count);
    let calculated_per_winner = pot / winners;
    let actual_per_winner = calculated_per_winner.ceil();
    let total_actual_payout = actual_per_winner * winners;

    PayoutSummary {
        calculated_per_winner,
        actual_per_winner,
        total_actual_payout,
        rounding_loss: total_actual_payout - pot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uneven_split_rounds_up_per_winner() {
        let summary = calculate(100.0, 3);
        assert!((summary.calculated_per_winner - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.actual_per_winner, 34.0);
        assert_eq!(summary.total_actual_payout, 102.0);
        assert_eq!(summary.rounding_loss, 2.0);
    }

    #[test]
    fn test_exact_split_has_no_loss() {
        let summary = calculate(100.0, 4);
        assert_eq!(summary.calculated_per_winner, 25.0);
        assert_eq!(summary.actual_per_winner, 25.0);
        assert_eq!(summary.total_actual_payout, 100.0);
        assert_eq!(summary.rounding_loss, 0.0);
    }

    #[test]
    fn test_fractional_pot_rounds_to_whole_unit() {
        // Whole-dollar ceiling, not cents: 50.50 for one winner pays 51.
        let summary = calculate(50.50, 1);
        assert_eq!(summary.actual_per_winner, 51.0);
        assert!((summary.rounding_loss - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_input_yields_zeros() {
        assert_eq!(calculate(0.0, 3), PayoutSummary::zero());
        assert_eq!(calculate(-10.0, 3), PayoutSummary::zero());
        assert_eq!(calculate(100.0, 0), PayoutSummary::zero());
    }

    #[test]
    fn test_loss_is_never_negative() {
        for winners in 1..20 {
            for pot in [1.0, 7.0, 99.99, 100.0, 123.45, 1000.0] {
                let summary = calculate(pot, winners);
                assert!(summary.rounding_loss >= 0.0, "pot {pot} winners {winners}");
            }
        }
    }
}
