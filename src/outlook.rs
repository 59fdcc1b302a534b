use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::SeasonConstants;
use crate::error::Result;
use crate::magic::{championship_magic, qualification_magic, rank_magic, required_win_rate};
use crate::probability::baseline_reach_probability;
use crate::rank_range::rank_range;
use crate::scenario::{scenarios, Scenario};
use crate::snapshot::StandingsSnapshot;
use crate::team::Standing;
use crate::tragic::{drop_below_rank_magic, first_place_tragic_number};

/// How a non-leader stands against the first-place team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaseMetrics {
    /// Leader losses needed before the challenger can pass its current wins
    pub leader_must_lose: u32,
    pub can_chase: bool,
    pub can_reach_historical_average: bool,
}

impl ChaseMetrics {
    pub fn new(challenger: &Standing, leader: &Standing, season: &SeasonConstants) -> Self {
        let ceiling = challenger.max_possible_wins();
        ChaseMetrics {
            leader_must_lose: ceiling.saturating_sub(leader.wins()),
            can_chase: ceiling > leader.wins(),
            can_reach_historical_average: ceiling >= season.historical_average_wins,
        }
    }
}

/// Everything the engine reports for one team.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOutlook {
    pub id: String,
    pub display_rank: u32,
    pub games_behind: f64,
    /// Only for the team in first place
    pub championship_magic: Option<u32>,
    pub rank_magic: BTreeMap<u32, u32>,
    pub drop_below_rank_magic: BTreeMap<u32, u32>,
    /// Only for teams behind the leader
    pub first_place_tragic_number: Option<u32>,
    pub qualification_magic: u32,
    pub required_win_rate: Option<f64>,
    pub best_possible_rank: u32,
    pub worst_possible_rank: u32,
    pub chase: Option<ChaseMetrics>,
    pub baseline_reach_probability: f64,
    pub scenario_rows: Vec<Scenario>,
}

fn team_outlook(team: &Standing, snapshot: &StandingsSnapshot) -> Result<TeamOutlook> {
    let leader = snapshot.leader()?;
    let is_leader = team.id() == leader.id();
    let season = snapshot.season();
    let ranks = 1..=snapshot.len() as u32;

    let championship = if is_leader {
        Some(match snapshot.runner_up() {
            Some(runner_up) => championship_magic(team, runner_up),
            None => 0,
        })
    } else {
        None
    };

    let rank_magic_by_rank = ranks
        .clone()
        .map(|rank| Ok((rank, rank_magic(team, snapshot, rank)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;
    let drop_below_by_rank = ranks
        .map(|rank| Ok((rank, drop_below_rank_magic(team, snapshot, rank)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    let qualification = qualification_magic(team, snapshot)?;
    let range = rank_range(team, snapshot);

    Ok(TeamOutlook {
        id: team.id().to_string(),
        display_rank: team.display_rank(),
        games_behind: team.games_behind(leader),
        championship_magic: championship,
        rank_magic: rank_magic_by_rank,
        drop_below_rank_magic: drop_below_by_rank,
        first_place_tragic_number: (!is_leader).then(|| first_place_tragic_number(team, leader)),
        qualification_magic: qualification,
        required_win_rate: required_win_rate(qualification, team.remaining_games()),
        best_possible_rank: range.best,
        worst_possible_rank: range.worst,
        chase: (!is_leader).then(|| ChaseMetrics::new(team, leader, season)),
        baseline_reach_probability: baseline_reach_probability(team, season.baseline_wins())?,
        scenario_rows: scenarios(team).collect(),
    })
}

/// Outlook for every team, in display order.
pub fn compute_outlooks(snapshot: &StandingsSnapshot) -> Result<Vec<TeamOutlook>> {
    snapshot.require_teams(snapshot.season().playoff_spots as usize)?;
    snapshot
        .standings()
        .par_iter()
        .map(|team| team_outlook(team, snapshot))
        .collect()
}

/// Parse the feed documents and configuration, and return the outlooks as JSON.
pub fn compute_outlooks_json(
    standings_json: &str,
    head_to_head_json: Option<&str>,
    config_json: Option<&str>,
) -> Result<String> {
    let season = match config_json {
        Some(raw) => SeasonConstants::from_json(raw)?,
        None => SeasonConstants::default(),
    };
    let snapshot = StandingsSnapshot::from_json(standings_json, head_to_head_json, season)?;
    let outlooks = compute_outlooks(&snapshot)?;
    Ok(serde_json::to_string(&outlooks)?)
}
