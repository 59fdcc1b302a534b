use serde::Serialize;

use crate::error::Result;
use crate::snapshot::StandingsSnapshot;
use crate::team::Standing;

/// Best and worst final rank still reachable by a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRange {
    pub best: u32,
    pub worst: u32,
}

/// Rank if `team` wins out and every rival loses out.
pub fn best_possible_rank(team: &Standing, snapshot: &StandingsSnapshot) -> u32 {
    let team_pct = team.win_out_pct();
    let above = snapshot
        .rivals(team)
        .filter(|rival| rival.lose_out_pct() > team_pct)
        .count();
    clamp_rank(above, snapshot.len())
}

/// Rank if `team` loses out and every rival wins out.
pub fn worst_possible_rank(team: &Standing, snapshot: &StandingsSnapshot) -> u32 {
    let team_pct = team.lose_out_pct();
    let above = snapshot
        .rivals(team)
        .filter(|rival| rival.win_out_pct() > team_pct)
        .count();
    clamp_rank(above, snapshot.len())
}

pub fn rank_range(team: &Standing, snapshot: &StandingsSnapshot) -> RankRange {
    RankRange {
        best: best_possible_rank(team, snapshot),
        worst: worst_possible_rank(team, snapshot),
    }
}

/// Rank range of the team with the given id.
pub fn rank_range_for(id: &str, snapshot: &StandingsSnapshot) -> Result<RankRange> {
    let team = snapshot.team(id)?;
    Ok(rank_range(team, snapshot))
}

fn clamp_rank(teams_above: usize, team_count: usize) -> u32 {
    (teams_above + 1).clamp(1, team_count.max(1)) as u32
}
