//! Standings Core - magic numbers, tragic numbers and rank ranges for a
//! league table.
//!
//! Every calculation reads an immutable [`StandingsSnapshot`] built from one
//! data refresh. Python bindings are available with the `python` feature.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod config;
pub mod constants;
pub mod error;
pub mod feed;
pub mod head_to_head;
pub mod magic;
pub mod outlook;
pub mod probability;
pub mod rank_range;
pub mod scenario;
pub mod simulation;
pub mod snapshot;
pub mod team;
pub mod tiebreak;
pub mod tragic;

#[cfg(test)]
mod fixtures;

pub use config::{Baseline, QualificationMode, SeasonConstants};
pub use constants::{CLINCHED, DEFAULT_SIMULATION_RUNS, IMPOSSIBLE};
pub use error::{Result, StandingsError};
pub use head_to_head::{HeadToHeadRecord, HeadToHeadTable};
pub use magic::{
    baseline_magic, championship_magic, guaranteed_rank_magic, magic_matrix, qualification_magic,
    rank_magic, required_win_rate, MagicMatrixRow,
};
pub use outlook::{compute_outlooks, compute_outlooks_json, ChaseMetrics, TeamOutlook};
pub use probability::baseline_reach_probability;
pub use rank_range::{best_possible_rank, rank_range, worst_possible_rank, RankRange};
pub use scenario::{
    scenarios, ContenderFilter, CoarseFilter, ExtremeScenarioFilter, Scenario, ScenarioMatrix,
    TwoStageFilter,
};
pub use simulation::{simulate_json, SeasonSimulator, SimulationSummary};
pub use snapshot::StandingsSnapshot;
pub use team::{Standing, TeamRecord, WinPct};
pub use tiebreak::sort_standings;
pub use tragic::{drop_below_rank_magic, first_place_tragic_number};

/// Outlook for every team as a JSON array.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "compute_outlooks_json", signature = (standings_json, head_to_head_json, config_json = None))]
fn py_compute_outlooks_json(
    standings_json: &str,
    head_to_head_json: &str,
    config_json: Option<&str>,
) -> PyResult<String> {
    Ok(compute_outlooks_json(
        standings_json,
        Some(head_to_head_json),
        config_json,
    )?)
}

/// Wins the leader needs to clinch first place.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "championship_magic")]
fn py_championship_magic(leader_wins: u32, runner_up_max_wins: u32) -> u32 {
    magic::championship_magic_for_wins(leader_wins, runner_up_max_wins)
}

/// Wins needed to reach a fixed win total.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "baseline_magic")]
fn py_baseline_magic(wins: u32, max_possible_wins: u32, baseline: u32) -> u32 {
    magic::baseline_magic_for_wins(wins, max_possible_wins, baseline)
}

/// Monte Carlo championship and playoff odds as JSON.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(
    name = "simulate_json",
    signature = (standings_json, head_to_head_json, config_json = None, runs = DEFAULT_SIMULATION_RUNS, seed = None)
)]
fn py_simulate_json(
    py: Python<'_>,
    standings_json: &str,
    head_to_head_json: &str,
    config_json: Option<&str>,
    runs: usize,
    seed: Option<u64>,
) -> PyResult<String> {
    let result = py.allow_threads(|| {
        simulate_json(
            standings_json,
            Some(head_to_head_json),
            config_json,
            runs,
            seed,
        )
    });
    Ok(result?)
}

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn standings_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Scenario>()?;

    m.add_function(wrap_pyfunction!(py_compute_outlooks_json, m)?)?;
    m.add_function(wrap_pyfunction!(py_championship_magic, m)?)?;
    m.add_function(wrap_pyfunction!(py_baseline_magic, m)?)?;
    m.add_function(wrap_pyfunction!(py_simulate_json, m)?)?;

    m.add("CLINCHED", CLINCHED)?;
    m.add("IMPOSSIBLE", IMPOSSIBLE)?;

    Ok(())
}
