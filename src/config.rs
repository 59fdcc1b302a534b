use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_GAMES_PER_OPPONENT, DEFAULT_HISTORICAL_AVERAGE_WINS, DEFAULT_LEGACY_PLAYOFF_BASELINE,
    DEFAULT_PLAYOFF_SPOTS, DEFAULT_SCENARIO_PRECISION, DEFAULT_TOTAL_GAMES,
    MAX_SCENARIO_PRECISION,
};
use crate::error::{Result, StandingsError};

/// How playoff qualification magic numbers are measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualificationMode {
    /// Compare against the best finish still reachable by the team at the cutoff rank.
    #[default]
    Dynamic,
    /// Compare against a constant win total.
    FixedBaseline,
}

/// Which constant win total fixed-baseline mode uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Baseline {
    #[default]
    Legacy,
    HistoricalAverage,
}

/// Season-wide constants for one league. Never mutated while a snapshot is alive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeasonConstants {
    pub total_games: u32,
    pub games_per_opponent: u32,
    pub playoff_spots: u32,
    pub historical_average_wins: u32,
    pub legacy_playoff_baseline: u32,
    pub qualification_mode: QualificationMode,
    pub baseline: Baseline,
    /// Decimal places used when grouping scenario win percentages
    pub scenario_precision: u32,
}

impl Default for SeasonConstants {
    fn default() -> Self {
        SeasonConstants {
            total_games: DEFAULT_TOTAL_GAMES,
            games_per_opponent: DEFAULT_GAMES_PER_OPPONENT,
            playoff_spots: DEFAULT_PLAYOFF_SPOTS,
            historical_average_wins: DEFAULT_HISTORICAL_AVERAGE_WINS,
            legacy_playoff_baseline: DEFAULT_LEGACY_PLAYOFF_BASELINE,
            qualification_mode: QualificationMode::Dynamic,
            baseline: Baseline::Legacy,
            scenario_precision: DEFAULT_SCENARIO_PRECISION,
        }
    }
}

impl SeasonConstants {
    /// Parse constants from JSON. Missing keys take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let season: SeasonConstants = serde_json::from_str(raw)?;
        season.validate()?;
        Ok(season)
    }

    pub fn validate(&self) -> Result<()> {
        let reason = if self.total_games == 0 {
            "totalGames must be positive"
        } else if self.games_per_opponent == 0 {
            "gamesPerOpponent must be positive"
        } else if self.playoff_spots == 0 {
            "playoffSpots must be positive"
        } else if self.scenario_precision > MAX_SCENARIO_PRECISION {
            "scenarioPrecision is limited to 6 decimal places"
        } else {
            return Ok(());
        };
        Err(StandingsError::InvalidConfig {
            reason: reason.to_string(),
        })
    }

    /// The win total fixed-baseline mode compares against
    pub fn baseline_wins(&self) -> u32 {
        match self.baseline {
            Baseline::Legacy => self.legacy_playoff_baseline,
            Baseline::HistoricalAverage => self.historical_average_wins,
        }
    }
}
