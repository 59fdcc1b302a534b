use std::collections::BTreeMap;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SeasonConstants;
use crate::constants::NEUTRAL_WIN_PROB;
use crate::error::{Result, StandingsError};
use crate::probability::{log5, team_strength};
use crate::snapshot::StandingsSnapshot;
use crate::team::WinPct;

/// A block of games between two teams, by snapshot index.
#[derive(Clone, Debug)]
struct Series {
    home: usize,
    away: usize,
    games: u32,
    home_win_prob: f64,
}

/// Games a team plays against an average opponent outside the pair schedule.
#[derive(Clone, Debug)]
struct NeutralGames {
    team: usize,
    games: u32,
    win_prob: f64,
}

/// Championship and playoff odds estimated from simulated seasons.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub runs: usize,
    pub championship: BTreeMap<String, f64>,
    pub playoff: BTreeMap<String, f64>,
}

impl SimulationSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Plays out the rest of a season many times from one snapshot.
///
/// Remaining head-to-head games come from the head-to-head table. Games a
/// team still owes beyond those are played against a neutral .500 opponent;
/// with no head-to-head data at all, every remaining game is.
#[derive(Clone, Debug)]
pub struct SeasonSimulator<'a> {
    snapshot: &'a StandingsSnapshot,
    series: Vec<Series>,
    neutral: Vec<NeutralGames>,
}

impl<'a> SeasonSimulator<'a> {
    pub fn new(snapshot: &'a StandingsSnapshot) -> Result<Self> {
        let standings = snapshot.standings();
        let strengths: Vec<f64> = standings.iter().map(team_strength).collect();
        let head_to_head = snapshot.head_to_head();
        let games_per_opponent = snapshot.season().games_per_opponent;

        let mut scheduled = vec![0u32; standings.len()];
        let mut series = Vec::new();
        if !head_to_head.is_empty() {
            for home in 0..standings.len() {
                for away in home + 1..standings.len() {
                    let games = head_to_head.remaining_between(
                        standings[home].id(),
                        standings[away].id(),
                        games_per_opponent,
                    );
                    if games == 0 {
                        continue;
                    }
                    scheduled[home] += games;
                    scheduled[away] += games;
                    series.push(Series {
                        home,
                        away,
                        games,
                        home_win_prob: log5(strengths[home], strengths[away]),
                    });
                }
            }
        }

        let mut neutral = Vec::new();
        for (index, team) in standings.iter().enumerate() {
            let remaining = team.remaining_games();
            if scheduled[index] > remaining {
                return Err(StandingsError::malformed(
                    team.id(),
                    format!(
                        "{} head-to-head games still scheduled but only {} games remain",
                        scheduled[index], remaining
                    ),
                ));
            }
            let extra = remaining - scheduled[index];
            if extra > 0 {
                neutral.push(NeutralGames {
                    team: index,
                    games: extra,
                    win_prob: log5(strengths[index], NEUTRAL_WIN_PROB),
                });
            }
        }

        Ok(SeasonSimulator {
            snapshot,
            series,
            neutral,
        })
    }

    /// Final `(wins, losses)` per team, in snapshot order, for one season.
    pub(crate) fn play_season<R: Rng>(&self, rng: &mut R) -> Vec<(u32, u32)> {
        let mut records: Vec<(u32, u32)> = self
            .snapshot
            .standings()
            .iter()
            .map(|s| (s.wins(), s.losses()))
            .collect();

        for series in &self.series {
            for _ in 0..series.games {
                let (winner, loser) = if rng.gen::<f64>() < series.home_win_prob {
                    (series.home, series.away)
                } else {
                    (series.away, series.home)
                };
                records[winner].0 += 1;
                records[loser].1 += 1;
            }
        }
        for block in &self.neutral {
            for _ in 0..block.games {
                if rng.gen::<f64>() < block.win_prob {
                    records[block.team].0 += 1;
                } else {
                    records[block.team].1 += 1;
                }
            }
        }
        records
    }

    /// Snapshot indices in final order for one seeded season.
    fn final_order(&self, seed: u64) -> Vec<usize> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let records = self.play_season(&mut rng);
        let mut order: Vec<usize> = (0..records.len()).collect();
        // Stable sort: equal final percentages keep the current order
        order.sort_by(|&a, &b| {
            let pa = WinPct::new(records[a].0, records[a].1);
            let pb = WinPct::new(records[b].0, records[b].1);
            pb.cmp(&pa)
        });
        order
    }

    /// Run `runs` seasons and tally how often each team finishes first and
    /// inside the playoff zone.
    ///
    /// Per-run seeds are drawn up front from one master generator, so a given
    /// `seed` gives the same summary however rayon schedules the work.
    pub fn simulate(&self, runs: usize, seed: Option<u64>) -> Result<SimulationSummary> {
        if runs == 0 {
            return Err(StandingsError::InvalidConfig {
                reason: "simulation needs at least one run".to_string(),
            });
        }

        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..runs).map(|_| rng.gen::<u64>()).collect();

        let team_count = self.snapshot.len();
        let playoff_spots = self.snapshot.season().playoff_spots as usize;
        debug!(
            "simulating {} seasons: {} series, {} neutral blocks",
            runs,
            self.series.len(),
            self.neutral.len()
        );

        let (firsts, playoffs) = seeds
            .par_iter()
            .map(|&run_seed| {
                let order = self.final_order(run_seed);
                let mut firsts = vec![0u64; team_count];
                let mut playoffs = vec![0u64; team_count];
                if let Some(&winner) = order.first() {
                    firsts[winner] += 1;
                }
                for &team in order.iter().take(playoff_spots) {
                    playoffs[team] += 1;
                }
                (firsts, playoffs)
            })
            .reduce(
                || (vec![0u64; team_count], vec![0u64; team_count]),
                |(mut fa, mut pa), (fb, pb)| {
                    for i in 0..team_count {
                        fa[i] += fb[i];
                        pa[i] += pb[i];
                    }
                    (fa, pa)
                },
            );

        let share = |counts: &[u64]| -> BTreeMap<String, f64> {
            self.snapshot
                .standings()
                .iter()
                .zip(counts)
                .map(|(team, &count)| (team.id().to_string(), count as f64 / runs as f64))
                .collect()
        };

        Ok(SimulationSummary {
            runs,
            championship: share(&firsts),
            playoff: share(&playoffs),
        })
    }
}

/// Parse the feed documents and configuration, simulate, and return the
/// summary as JSON.
pub fn simulate_json(
    standings_json: &str,
    head_to_head_json: Option<&str>,
    config_json: Option<&str>,
    runs: usize,
    seed: Option<u64>,
) -> Result<String> {
    let season = match config_json {
        Some(raw) => SeasonConstants::from_json(raw)?,
        None => SeasonConstants::default(),
    };
    let snapshot = StandingsSnapshot::from_json(standings_json, head_to_head_json, season)?;
    SeasonSimulator::new(&snapshot)?.simulate(runs, seed)?.to_json()
}
