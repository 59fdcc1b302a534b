use crate::constants::{CLINCHED, IMPOSSIBLE};
use crate::error::Result;
use crate::magic::{comparison_team, wins_to_stay_ahead};
use crate::snapshot::StandingsSnapshot;
use crate::team::{Standing, WinPct};

/// Unfavorable results that guarantee `team` falls to or below `guard_rank`.
///
/// Mirror of [`rank_magic`](crate::magic::rank_magic): when the team at
/// `guard_rank` can no longer catch `team`, the result is [`IMPOSSIBLE`]
/// (the team is safe).
pub fn drop_below_rank_magic(
    team: &Standing,
    snapshot: &StandingsSnapshot,
    guard_rank: u32,
) -> Result<u32> {
    let Some(guard) = comparison_team(snapshot, team, guard_rank)? else {
        return Ok(IMPOSSIBLE);
    };
    Ok(wins_to_stay_ahead(team, guard).unwrap_or(IMPOSSIBLE))
}

/// Additional leader wins after which `challenger` can no longer pass the
/// leader on win percentage.
///
/// The leader is assumed to win `k` of its remaining games and lose the rest,
/// and `k` walks upward from zero until the leader's final percentage is
/// strictly above the best the challenger can reach. The walk is bounded by the
/// leader's remaining games.
pub fn first_place_tragic_number(challenger: &Standing, leader: &Standing) -> u32 {
    let challenger_best = challenger.win_out_pct();

    if leader.lose_out_pct() >= challenger_best {
        return CLINCHED;
    }
    // Cannot happen when the leader really leads; kept so odd inputs still terminate cleanly
    if leader.win_out_pct() < challenger_best {
        return IMPOSSIBLE;
    }

    let remaining = leader.remaining_games();
    for additional_wins in 0..=remaining {
        let pct = WinPct::new(
            leader.wins() + additional_wins,
            leader.losses() + (remaining - additional_wins),
        );
        if pct > challenger_best {
            return additional_wins;
        }
    }
    // Winning out only ties the challenger's best
    IMPOSSIBLE
}

/// Tragic number of `challenger` against the snapshot's current leader.
pub fn leader_tragic_number(challenger: &Standing, snapshot: &StandingsSnapshot) -> Result<u32> {
    let leader = snapshot.leader()?;
    Ok(first_place_tragic_number(challenger, leader))
}
