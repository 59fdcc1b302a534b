use statrs::distribution::{Binomial, DiscreteCDF};

use crate::constants::NEUTRAL_WIN_PROB;
use crate::error::{Result, StandingsError};
use crate::team::Standing;

/// A team's strength as its current win percentage, or .500 before it has
/// any decisions.
pub fn team_strength(team: &Standing) -> f64 {
    if team.wins() + team.losses() == 0 {
        NEUTRAL_WIN_PROB
    } else {
        team.win_pct().as_f64()
    }
}

/// Probability that a team with strength `p_a` beats one with strength `p_b`
/// (Bill James' log5).
///
/// Falls back to .500 when the formula is undefined, i.e. when both
/// strengths are 0 or both are 1.
pub fn log5(p_a: f64, p_b: f64) -> f64 {
    let denominator = p_a + p_b - 2.0 * p_a * p_b;
    if denominator.abs() < f64::EPSILON {
        return NEUTRAL_WIN_PROB;
    }
    // A perfect or winless side decides the game outright
    if p_a >= 1.0 || p_b <= 0.0 {
        return 1.0;
    }
    if p_a <= 0.0 || p_b >= 1.0 {
        return 0.0;
    }
    ((p_a - p_a * p_b) / denominator).clamp(0.0, 1.0)
}

/// Probability that `team` reaches `baseline` wins if it wins each remaining
/// game independently at its [`team_strength`].
///
/// `P(X >= baseline - wins)` for `X ~ Binomial(remaining games, strength)`.
pub fn baseline_reach_probability(team: &Standing, baseline: u32) -> Result<f64> {
    let needed = baseline.saturating_sub(team.wins());
    if needed == 0 {
        return Ok(1.0);
    }
    if needed > team.remaining_games() {
        return Ok(0.0);
    }

    let binomial = Binomial::new(team_strength(team), team.remaining_games() as u64)
        .map_err(|e| StandingsError::malformed(team.id(), format!("win distribution: {}", e)))?;
    // sf(k) is P(X > k)
    Ok(binomial.sf(needed as u64 - 1))
}
