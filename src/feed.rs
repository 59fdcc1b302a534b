use log::warn;
use serde::Deserialize;

use crate::config::SeasonConstants;
use crate::error::{Result, StandingsError};
use crate::team::{Last10, SplitRecord, TeamRecord, WinPct};

/// Tolerance for comparing a feed-supplied win rate with the derived one
const WIN_RATE_TOLERANCE: f64 = 0.0005;

/// One team row of the standings feed.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    #[serde(alias = "team")]
    pub id: String,
    #[serde(alias = "games")]
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub home_record: Option<String>,
    #[serde(default)]
    pub away_record: Option<String>,
    #[serde(default)]
    pub last10: Option<Last10>,
    #[serde(default)]
    pub current_streak: Option<i32>,
    /// Server-computed value; the engine derives its own and only cross-checks this
    #[serde(default)]
    pub remaining_games: Option<u32>,
}

/// Standings feed: a bare list or an object wrapping it.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum StandingsFeed {
    List(Vec<TeamEntry>),
    Wrapped { standings: Vec<TeamEntry> },
}

impl StandingsFeed {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn into_entries(self) -> Vec<TeamEntry> {
        match self {
            StandingsFeed::List(entries) => entries,
            StandingsFeed::Wrapped { standings } => standings,
        }
    }
}

impl TeamEntry {
    /// Convert to a record, keeping derived values authoritative.
    pub fn into_record(self, season: &SeasonConstants) -> Result<TeamRecord> {
        let home_record = parse_split(&self.id, self.home_record.as_deref())?;
        let away_record = parse_split(&self.id, self.away_record.as_deref())?;

        if let Some(rate) = self.win_rate {
            let derived = WinPct::new(self.wins, self.losses).as_f64();
            if (rate - derived).abs() > WIN_RATE_TOLERANCE {
                warn!(
                    "team {}: feed winRate {:.3} differs from derived {:.3}",
                    self.id, rate, derived
                );
            }
        }
        if let Some(remaining) = self.remaining_games {
            let derived = season.total_games.saturating_sub(self.games_played);
            if remaining != derived {
                warn!(
                    "team {}: feed remainingGames {} differs from derived {}",
                    self.id, remaining, derived
                );
            }
        }

        Ok(TeamRecord {
            id: self.id,
            games_played: self.games_played,
            wins: self.wins,
            losses: self.losses,
            draws: self.draws,
            home_record,
            away_record,
            current_streak: self.current_streak.unwrap_or(0),
            last10: self.last10.unwrap_or_default(),
        })
    }
}

fn parse_split(team_id: &str, raw: Option<&str>) -> Result<SplitRecord> {
    match raw {
        None => Ok(SplitRecord::default()),
        Some(s) => s
            .parse()
            .map_err(|reason: String| StandingsError::malformed(team_id, reason)),
    }
}
