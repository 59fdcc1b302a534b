use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::QualificationMode;
use crate::constants::{CLINCHED, IMPOSSIBLE};
use crate::error::{Result, StandingsError};
use crate::snapshot::StandingsSnapshot;
use crate::team::Standing;

/// Wins `team` still needs before `rival` cannot reach its win total even by
/// winning out, capped at the games `team` has left.
///
/// `None` when the rival already cannot catch up. Magic and tragic numbers
/// are both built on this comparison so they can never disagree.
pub(crate) fn wins_to_stay_ahead(team: &Standing, rival: &Standing) -> Option<u32> {
    let rival_ceiling = rival.max_possible_wins();
    if team.wins() > rival_ceiling {
        return None;
    }
    Some((rival_ceiling - team.wins() + 1).min(team.remaining_games()))
}

/// The team `team` is measured against for a given rank.
///
/// Normally the team holding `rank`. If that is `team` itself, the team
/// directly below it; `None` when there is nobody below.
pub(crate) fn comparison_team<'a>(
    snapshot: &'a StandingsSnapshot,
    team: &Standing,
    rank: u32,
) -> Result<Option<&'a Standing>> {
    let holder = snapshot.at_rank(rank)?;
    if holder.id() != team.id() {
        return Ok(Some(holder));
    }
    Ok(snapshot.standings().get(rank as usize))
}

/// Wins the leader needs to clinch first place outright.
///
/// `0` once the runner-up cannot reach the leader's current win total.
pub fn championship_magic(leader: &Standing, runner_up: &Standing) -> u32 {
    championship_magic_for_wins(leader.wins(), runner_up.max_possible_wins())
}

/// [`championship_magic`] from bare win counts.
pub fn championship_magic_for_wins(leader_wins: u32, runner_up_max_wins: u32) -> u32 {
    runner_up_max_wins.saturating_add(1).saturating_sub(leader_wins)
}

/// Championship magic number for the snapshot's current leader.
pub fn leader_championship_magic(snapshot: &StandingsSnapshot) -> Result<u32> {
    let leader = snapshot.leader()?;
    Ok(match snapshot.runner_up() {
        Some(runner_up) => championship_magic(leader, runner_up),
        None => CLINCHED,
    })
}

/// Wins `team` needs to guarantee finishing ahead of the team at `target_rank`.
///
/// Returns [`CLINCHED`] when that team can no longer catch `team`, and
/// [`IMPOSSIBLE`] when `team` cannot even reach its current win total.
pub fn rank_magic(team: &Standing, snapshot: &StandingsSnapshot, target_rank: u32) -> Result<u32> {
    let Some(target) = comparison_team(snapshot, team, target_rank)? else {
        return Ok(CLINCHED);
    };
    match wins_to_stay_ahead(team, target) {
        None => Ok(CLINCHED),
        Some(_) if team.max_possible_wins() < target.wins() => Ok(IMPOSSIBLE),
        Some(needed) => Ok(needed),
    }
}

/// Wins `team` needs to reach a fixed win total.
pub fn baseline_magic(team: &Standing, baseline: u32) -> u32 {
    baseline_magic_for_wins(team.wins(), team.max_possible_wins(), baseline)
}

/// [`baseline_magic`] from bare win counts.
pub fn baseline_magic_for_wins(wins: u32, max_possible_wins: u32, baseline: u32) -> u32 {
    if max_possible_wins < baseline {
        return IMPOSSIBLE;
    }
    baseline.saturating_sub(wins)
}

/// Playoff magic number measured against the teams around the cutoff.
///
/// A team inside the playoff zone must stay ahead of the first team outside
/// it; a team outside must get past the team holding the last spot.
pub fn playoff_magic(team: &Standing, snapshot: &StandingsSnapshot) -> Result<u32> {
    let spots = snapshot.season().playoff_spots;
    snapshot.require_teams(spots as usize)?;
    if team.position() <= spots {
        if snapshot.len() <= spots as usize {
            return Ok(CLINCHED);
        }
        rank_magic(team, snapshot, spots + 1)
    } else {
        rank_magic(team, snapshot, spots)
    }
}

/// Playoff magic number in the snapshot's configured qualification mode.
pub fn qualification_magic(team: &Standing, snapshot: &StandingsSnapshot) -> Result<u32> {
    let season = snapshot.season();
    match season.qualification_mode {
        QualificationMode::Dynamic => playoff_magic(team, snapshot),
        QualificationMode::FixedBaseline => Ok(baseline_magic(team, season.baseline_wins())),
    }
}

/// Wins `team` needs so that, whatever happens elsewhere, at most
/// `target_rank - 1` rivals can finish with more wins.
pub fn guaranteed_rank_magic(
    team: &Standing,
    snapshot: &StandingsSnapshot,
    target_rank: u32,
) -> Result<u32> {
    if target_rank == 0 || target_rank as usize > snapshot.len() {
        return Err(StandingsError::InsufficientStandings {
            required: target_rank.max(1) as usize,
            available: snapshot.len(),
        });
    }

    let mut ceilings: Vec<u32> = snapshot
        .rivals(team)
        .map(|rival| rival.max_possible_wins())
        .collect();
    ceilings.sort_unstable_by(|a, b| b.cmp(a));

    let Some(&required) = ceilings.get(target_rank as usize - 1) else {
        // Fewer rivals than the target rank: nobody can push the team below it
        return Ok(CLINCHED);
    };
    if team.wins() > required {
        Ok(CLINCHED)
    } else if required + 1 > team.max_possible_wins() {
        Ok(IMPOSSIBLE)
    } else {
        Ok(required - team.wins() + 1)
    }
}

/// One team's guaranteed-rank magic numbers, keyed by target rank.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicMatrixRow {
    pub id: String,
    pub display_rank: u32,
    pub by_rank: BTreeMap<u32, u32>,
}

/// Guaranteed-rank magic numbers for every team and every rank except last.
pub fn magic_matrix(snapshot: &StandingsSnapshot) -> Result<Vec<MagicMatrixRow>> {
    let last_rank = snapshot.len() as u32;
    snapshot
        .standings()
        .iter()
        .map(|team| {
            let by_rank = (1..last_rank)
                .map(|rank| Ok((rank, guaranteed_rank_magic(team, snapshot, rank)?)))
                .collect::<Result<BTreeMap<_, _>>>()?;
            Ok(MagicMatrixRow {
                id: team.id().to_string(),
                display_rank: team.display_rank(),
                by_rank,
            })
        })
        .collect()
}

/// Share of the remaining games that must be won to cover `needed` wins.
///
/// `None` for the [`IMPOSSIBLE`] sentinel.
pub fn required_win_rate(needed: u32, remaining: u32) -> Option<f64> {
    if needed == IMPOSSIBLE {
        return None;
    }
    if remaining == 0 {
        return Some(0.0);
    }
    Some((needed as f64 / remaining as f64).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Baseline, SeasonConstants};
    use crate::fixtures;
    use proptest::prelude::*;

    #[test]
    fn test_championship_magic_example() {
        let snapshot = fixtures::snapshot(
            SeasonConstants::default(),
            &[("Leader", 85, 40, 0), ("RunnerUp", 80, 45, 0)],
        );
        let leader = snapshot.team("Leader").unwrap();
        let runner_up = snapshot.team("RunnerUp").unwrap();
        assert_eq!(runner_up.remaining_games(), 19);
        assert_eq!(runner_up.max_possible_wins(), 99);
        assert_eq!(championship_magic(leader, runner_up), 15);
        assert_eq!(leader_championship_magic(&snapshot).unwrap(), 15);
    }

    #[test]
    fn test_magic_from_bare_counts() {
        assert_eq!(championship_magic_for_wins(85, 99), 15);
        assert_eq!(championship_magic_for_wins(100, 84), CLINCHED);
        assert_eq!(championship_magic_for_wins(0, u32::MAX), u32::MAX);
        assert_eq!(baseline_magic_for_wins(50, 74, 72), 22);
        assert_eq!(baseline_magic_for_wins(50, 71, 72), IMPOSSIBLE);
    }

    #[test]
    fn test_championship_clinched() {
        let snapshot = fixtures::snapshot(
            SeasonConstants::default(),
            &[("Leader", 100, 30, 0), ("RunnerUp", 70, 60, 0)],
        );
        // Runner-up tops out at 84 wins
        assert_eq!(leader_championship_magic(&snapshot).unwrap(), CLINCHED);
    }

    #[test]
    fn test_championship_single_team() {
        let snapshot = fixtures::snapshot(SeasonConstants::default(), &[("Only", 10, 5, 0)]);
        assert_eq!(leader_championship_magic(&snapshot).unwrap(), CLINCHED);
    }

    #[test]
    fn test_rank_magic_kbo() {
        let snapshot = fixtures::kbo_snapshot();
        let ssg = snapshot.team("SSG").unwrap();
        // KT holds 5th: 64 wins, 17 left
        assert_eq!(rank_magic(ssg, &snapshot, 5).unwrap(), 16);

        let kiwoom = snapshot.team("Kiwoom").unwrap();
        assert_eq!(rank_magic(kiwoom, &snapshot, 1).unwrap(), IMPOSSIBLE);
    }

    #[test]
    fn test_rank_magic_own_rank_compares_below() {
        let snapshot = fixtures::kbo_snapshot();
        let hanwha = snapshot.team("Hanwha").unwrap();
        assert_eq!(
            rank_magic(hanwha, &snapshot, 1).unwrap(),
            leader_championship_magic(&snapshot).unwrap()
        );

        let kiwoom = snapshot.team("Kiwoom").unwrap();
        assert_eq!(rank_magic(kiwoom, &snapshot, 10).unwrap(), CLINCHED);
    }

    #[test]
    fn test_rank_magic_clinched() {
        let snapshot = fixtures::snapshot(
            SeasonConstants::default(),
            &[("X", 100, 20, 0), ("Y", 50, 70, 0)],
        );
        let x = snapshot.team("X").unwrap();
        assert_eq!(rank_magic(x, &snapshot, 2).unwrap(), CLINCHED);
    }

    #[test]
    fn test_rank_magic_out_of_range() {
        let snapshot = fixtures::kbo_snapshot();
        let lg = snapshot.team("LG").unwrap();
        assert!(matches!(
            rank_magic(lg, &snapshot, 11),
            Err(StandingsError::InsufficientStandings { .. })
        ));
    }

    #[test]
    fn test_baseline_magic_example() {
        let snapshot = fixtures::snapshot(SeasonConstants::default(), &[("T", 50, 70, 0)]);
        let team = snapshot.team("T").unwrap();
        assert_eq!(team.remaining_games(), 24);
        assert_eq!(team.max_possible_wins(), 74);
        assert_eq!(baseline_magic(team, 72), 22);
        assert_eq!(baseline_magic(team, 75), IMPOSSIBLE);
        assert_eq!(baseline_magic(team, 40), CLINCHED);
    }

    #[test]
    fn test_playoff_magic_around_cutoff() {
        let snapshot = fixtures::kbo_snapshot();
        // KT (5th) against NC (6th, 80 max wins)
        let kt = snapshot.team("KT").unwrap();
        assert_eq!(playoff_magic(kt, &snapshot).unwrap(), 17);
        // NC (6th) against KT (5th, 81 max wins), capped at 19 games left
        let nc = snapshot.team("NC").unwrap();
        assert_eq!(playoff_magic(nc, &snapshot).unwrap(), 19);
        let kiwoom = snapshot.team("Kiwoom").unwrap();
        assert_eq!(playoff_magic(kiwoom, &snapshot).unwrap(), IMPOSSIBLE);
    }

    #[test]
    fn test_playoff_magic_needs_enough_teams() {
        let snapshot = fixtures::snapshot(SeasonConstants::default(), &[("A", 1, 0, 0)]);
        let a = snapshot.team("A").unwrap();
        assert!(matches!(
            playoff_magic(a, &snapshot),
            Err(StandingsError::InsufficientStandings { required: 5, available: 1 })
        ));
    }

    #[test]
    fn test_qualification_mode_switch() {
        let dynamic = fixtures::kbo_snapshot();
        let kt = dynamic.team("KT").unwrap();
        assert_eq!(qualification_magic(kt, &dynamic).unwrap(), 17);

        let season = SeasonConstants {
            qualification_mode: QualificationMode::FixedBaseline,
            baseline: Baseline::HistoricalAverage,
            ..Default::default()
        };
        let fixed = fixtures::snapshot(season, &[("KT", 60, 40, 0)]);
        let kt = fixed.team("KT").unwrap();
        assert_eq!(qualification_magic(kt, &fixed).unwrap(), 87 - 60);
    }

    #[test]
    fn test_guaranteed_rank_magic() {
        let snapshot = fixtures::kbo_snapshot();
        let hanwha = snapshot.team("Hanwha").unwrap();
        // LG can reach 94
        assert_eq!(guaranteed_rank_magic(hanwha, &snapshot, 1).unwrap(), 15);
        // Second-best rival ceiling is SSG's 83
        assert_eq!(guaranteed_rank_magic(hanwha, &snapshot, 2).unwrap(), 4);

        let kiwoom = snapshot.team("Kiwoom").unwrap();
        assert_eq!(guaranteed_rank_magic(kiwoom, &snapshot, 9).unwrap(), IMPOSSIBLE);
        assert_eq!(guaranteed_rank_magic(kiwoom, &snapshot, 10).unwrap(), CLINCHED);
        assert!(guaranteed_rank_magic(kiwoom, &snapshot, 0).is_err());
    }

    #[test]
    fn test_magic_matrix_shape() {
        let snapshot = fixtures::kbo_snapshot();
        let matrix = magic_matrix(&snapshot).unwrap();
        assert_eq!(matrix.len(), 10);
        assert_eq!(matrix[0].id, "Hanwha");
        assert!(matrix.iter().all(|row| row.by_rank.len() == 9));
        assert_eq!(matrix[0].by_rank[&1], 15);
    }

    #[test]
    fn test_required_win_rate() {
        assert_eq!(required_win_rate(IMPOSSIBLE, 20), None);
        assert_eq!(required_win_rate(5, 0), Some(0.0));
        assert_eq!(required_win_rate(10, 20), Some(0.5));
        assert_eq!(required_win_rate(30, 20), Some(1.0));
    }

    proptest! {
        #[test]
        fn prop_championship_clinched_exactly_when_out_of_reach(
            rows in prop::collection::vec((0u32..=80, 0u32..=60, 0u32..=4), 2..10)
        ) {
            let snapshot = fixtures::numbered_snapshot(SeasonConstants::default(), &rows);
            let leader = snapshot.leader().unwrap();
            let runner_up = snapshot.runner_up().unwrap();
            let magic = championship_magic(leader, runner_up);
            prop_assert_eq!(magic == CLINCHED, runner_up.max_possible_wins() < leader.wins());
        }

        #[test]
        fn prop_rank_magic_impossible_exactly_when_target_out_of_reach(
            rows in prop::collection::vec((0u32..=80, 0u32..=60, 0u32..=4), 2..10)
        ) {
            let snapshot = fixtures::numbered_snapshot(SeasonConstants::default(), &rows);
            for team in snapshot.standings() {
                for rank in 1..=snapshot.len() as u32 {
                    let magic = rank_magic(team, &snapshot, rank).unwrap();
                    match comparison_team(&snapshot, team, rank).unwrap() {
                        Some(target) => prop_assert_eq!(
                            magic == IMPOSSIBLE,
                            team.max_possible_wins() < target.wins()
                        ),
                        None => prop_assert_eq!(magic, CLINCHED),
                    }
                }
            }
        }
    }
}
