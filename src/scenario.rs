use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::Serialize;

use crate::magic::baseline_magic;
use crate::rank_range::best_possible_rank;
use crate::snapshot::StandingsSnapshot;
use crate::team::{Standing, WinPct};

/// One way a team's remaining games can split.
#[cfg_attr(feature = "python", pyclass(get_all, frozen))]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub wins: u32,
    pub losses: u32,
    pub final_wins: u32,
    pub final_losses: u32,
    pub final_win_pct: f64,
}

#[cfg(feature = "python")]
#[pymethods]
impl Scenario {
    fn __repr__(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scenario({}-{} -> {}-{}, {:.3})",
            self.wins, self.losses, self.final_wins, self.final_losses, self.final_win_pct
        )
    }
}

/// Every remaining-game split of one team, most wins first.
///
/// Yields `remaining + 1` scenarios. The iterator keeps its own copy of the
/// counts, so calling [`scenarios`] again starts over.
#[derive(Clone, Debug)]
pub struct ScenarioIter {
    wins: u32,
    losses: u32,
    remaining: u32,
    next_wins: Option<u32>,
}

impl Iterator for ScenarioIter {
    type Item = Scenario;

    fn next(&mut self) -> Option<Scenario> {
        let w = self.next_wins?;
        self.next_wins = w.checked_sub(1);
        let l = self.remaining - w;
        let final_wins = self.wins + w;
        let final_losses = self.losses + l;
        Some(Scenario {
            wins: w,
            losses: l,
            final_wins,
            final_losses,
            final_win_pct: WinPct::new(final_wins, final_losses).as_f64(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.next_wins.map_or(0, |w| w as usize + 1);
        (left, Some(left))
    }
}

impl ExactSizeIterator for ScenarioIter {}

pub fn scenarios(team: &Standing) -> ScenarioIter {
    ScenarioIter {
        wins: team.wins(),
        losses: team.losses(),
        remaining: team.remaining_games(),
        next_wins: Some(team.remaining_games()),
    }
}

/// Decides whether a team belongs in the scenario matrix.
pub trait ContenderFilter: Sync {
    fn is_contender(&self, team: &Standing, snapshot: &StandingsSnapshot) -> bool;
}

impl<F> ContenderFilter for F
where
    F: Fn(&Standing, &StandingsSnapshot) -> bool + Sync,
{
    fn is_contender(&self, team: &Standing, snapshot: &StandingsSnapshot) -> bool {
        self(team, snapshot)
    }
}

/// Cheap pre-pass: the teams near the playoff line, plus anyone who can still
/// pass the configured baseline win total.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoarseFilter;

impl ContenderFilter for CoarseFilter {
    fn is_contender(&self, team: &Standing, snapshot: &StandingsSnapshot) -> bool {
        let season = snapshot.season();
        team.display_rank() <= season.playoff_spots + 1
            || team.max_possible_wins() > season.baseline_wins()
    }
}

/// Keeps a team only if winning out while every rival loses out puts it in
/// the playoff zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtremeScenarioFilter;

impl ContenderFilter for ExtremeScenarioFilter {
    fn is_contender(&self, team: &Standing, snapshot: &StandingsSnapshot) -> bool {
        best_possible_rank(team, snapshot) <= snapshot.season().playoff_spots
    }
}

/// Runs `fallback` only for teams that `first` rejects.
#[derive(Clone, Copy, Debug)]
pub struct TwoStageFilter<A, B> {
    pub first: A,
    pub fallback: B,
}

impl<A, B> TwoStageFilter<A, B> {
    pub fn new(first: A, fallback: B) -> Self {
        TwoStageFilter { first, fallback }
    }
}

impl Default for TwoStageFilter<CoarseFilter, ExtremeScenarioFilter> {
    fn default() -> Self {
        TwoStageFilter::new(CoarseFilter, ExtremeScenarioFilter)
    }
}

impl<A: ContenderFilter, B: ContenderFilter> ContenderFilter for TwoStageFilter<A, B> {
    fn is_contender(&self, team: &Standing, snapshot: &StandingsSnapshot) -> bool {
        self.first.is_contender(team, snapshot) || self.fallback.is_contender(team, snapshot)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCell {
    pub id: String,
    pub scenario: Scenario,
}

/// All cells whose final win percentage rounds to `win_pct`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRow {
    pub win_pct: f64,
    pub cells: Vec<ScenarioCell>,
}

/// Contenders' scenarios grouped by rounded final win percentage.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioMatrix {
    pub contenders: Vec<String>,
    pub rows: Vec<ScenarioRow>,
}

impl ScenarioMatrix {
    /// Build with the default two-stage contender filter.
    pub fn from_snapshot(snapshot: &StandingsSnapshot) -> Self {
        Self::build(snapshot, &TwoStageFilter::<CoarseFilter, ExtremeScenarioFilter>::default())
    }

    /// Teams rejected by `filter` are left out entirely. Rows run from the
    /// highest percentage down; cells within a row follow display order.
    pub fn build<F: ContenderFilter + ?Sized>(snapshot: &StandingsSnapshot, filter: &F) -> Self {
        let precision = snapshot.season().scenario_precision;
        let scale = 10f64.powi(precision as i32);

        let mut contenders = Vec::new();
        let mut grouped: BTreeMap<Reverse<u64>, Vec<ScenarioCell>> = BTreeMap::new();
        for team in snapshot.standings() {
            if !filter.is_contender(team, snapshot) {
                continue;
            }
            contenders.push(team.id().to_string());
            for scenario in scenarios(team) {
                let key = (scenario.final_win_pct * scale).round() as u64;
                grouped.entry(Reverse(key)).or_default().push(ScenarioCell {
                    id: team.id().to_string(),
                    scenario,
                });
            }
        }

        let rows = grouped
            .into_iter()
            .map(|(Reverse(key), cells)| ScenarioRow {
                win_pct: key as f64 / scale,
                cells,
            })
            .collect();
        ScenarioMatrix { contenders, rows }
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }
}

/// Scenario whose final record first reaches `baseline` wins, if any.
pub fn baseline_scenario(team: &Standing, baseline: u32) -> Option<Scenario> {
    let needed = baseline_magic(team, baseline);
    scenarios(team).find(|s| s.wins == needed)
}
