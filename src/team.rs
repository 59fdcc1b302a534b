use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SeasonConstants;
use crate::error::{Result, StandingsError};

/// Exact win percentage, `wins / (wins + losses)`. Draws never count.
///
/// Stored as a fraction and ordered by cross-multiplication so that equal
/// percentages compare equal regardless of floating-point rounding. A record
/// with no decisions orders as 0.
#[derive(Clone, Copy, Debug)]
pub struct WinPct {
    wins: u64,
    decisions: u64,
}

impl WinPct {
    pub fn new(wins: u32, losses: u32) -> Self {
        Self::from_counts(wins as u64, losses as u64)
    }

    pub fn from_counts(wins: u64, losses: u64) -> Self {
        let decisions = wins + losses;
        if decisions == 0 {
            WinPct {
                wins: 0,
                decisions: 1,
            }
        } else {
            WinPct { wins, decisions }
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.wins as f64 / self.decisions as f64
    }
}

impl PartialEq for WinPct {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WinPct {}

impl PartialOrd for WinPct {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WinPct {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.wins * other.decisions).cmp(&(other.wins * self.decisions))
    }
}

impl fmt::Display for WinPct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.as_f64())
    }
}

/// A wins-losses-draws triple, e.g. a home or away record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl SplitRecord {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

impl FromStr for SplitRecord {
    type Err = String;

    /// Parses `"W-L-D"` or `"W-L"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(format!("expected W-L-D, got '{}'", s));
        }
        let mut nums = [0u32; 3];
        for (i, part) in parts.iter().enumerate() {
            nums[i] = part
                .trim()
                .parse()
                .map_err(|e| format!("invalid count '{}' in '{}': {}", part, s, e))?;
        }
        Ok(SplitRecord {
            wins: nums[0],
            losses: nums[1],
            draws: nums[2],
        })
    }
}

impl fmt::Display for SplitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wins, self.losses, self.draws)
    }
}

/// Results over the most recent ten games.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Last10 {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

/// Raw per-team season record as delivered by the data feed.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamRecord {
    pub id: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub home_record: SplitRecord,
    pub away_record: SplitRecord,
    /// Positive for a winning streak, negative for a losing streak
    pub current_streak: i32,
    pub last10: Last10,
}

impl TeamRecord {
    /// Create a record with `games_played` derived from the result counts.
    pub fn new(id: impl Into<String>, wins: u32, losses: u32, draws: u32) -> Self {
        TeamRecord {
            id: id.into(),
            games_played: wins.saturating_add(losses).saturating_add(draws),
            wins,
            losses,
            draws,
            home_record: SplitRecord::default(),
            away_record: SplitRecord::default(),
            current_streak: 0,
            last10: Last10::default(),
        }
    }

    pub fn win_pct(&self) -> WinPct {
        WinPct::new(self.wins, self.losses)
    }

    /// Reject records that contradict the season length or their own totals.
    pub fn validate(&self, season: &SeasonConstants) -> Result<()> {
        // Summed in u64 so out-of-range feed counts cannot wrap
        let decided = self.wins as u64 + self.losses as u64 + self.draws as u64;
        if self.games_played > season.total_games {
            return Err(StandingsError::malformed(
                &self.id,
                format!(
                    "{} games played exceeds the {}-game season",
                    self.games_played, season.total_games
                ),
            ));
        }
        if decided > season.total_games as u64 {
            return Err(StandingsError::malformed(
                &self.id,
                format!(
                    "wins + losses + draws = {} exceeds the {}-game season",
                    decided, season.total_games
                ),
            ));
        }
        if decided != self.games_played as u64 {
            return Err(StandingsError::malformed(
                &self.id,
                format!(
                    "wins + losses + draws = {} but {} games played",
                    decided, self.games_played
                ),
            ));
        }
        let last10 = self.last10.wins as u64 + self.last10.draws as u64 + self.last10.losses as u64;
        if last10 > 10 {
            return Err(StandingsError::malformed(
                &self.id,
                format!("last-10 summary covers {} games", last10),
            ));
        }
        Ok(())
    }
}

/// A team record placed in a snapshot, with its rank and season-derived values.
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    record: TeamRecord,
    remaining_games: u32,
    pub(crate) position: u32,
    pub(crate) display_rank: u32,
}

impl Standing {
    /// Wrap a validated record. Rank fields are filled in by the tie-break sorter.
    pub(crate) fn new(record: TeamRecord, season: &SeasonConstants) -> Self {
        let remaining_games = season.total_games.saturating_sub(record.games_played);
        Standing {
            record,
            remaining_games,
            position: 0,
            display_rank: 0,
        }
    }

    pub fn record(&self) -> &TeamRecord {
        &self.record
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn wins(&self) -> u32 {
        self.record.wins
    }

    pub fn losses(&self) -> u32 {
        self.record.losses
    }

    /// 1-based position in the sorted standings (unique per team)
    pub fn position(&self) -> u32 {
        self.position
    }

    /// 1-based rank shown to users; shared by teams with equal win percentage
    pub fn display_rank(&self) -> u32 {
        self.display_rank
    }

    pub fn remaining_games(&self) -> u32 {
        self.remaining_games
    }

    pub fn max_possible_wins(&self) -> u32 {
        self.record.wins + self.remaining_games
    }

    /// The team's own defeats cannot take wins away.
    pub fn min_possible_wins(&self) -> u32 {
        self.record.wins
    }

    pub fn win_pct(&self) -> WinPct {
        self.record.win_pct()
    }

    /// Final win percentage if every remaining game is won
    pub fn win_out_pct(&self) -> WinPct {
        WinPct::new(self.max_possible_wins(), self.record.losses)
    }

    /// Final win percentage if every remaining game is lost
    pub fn lose_out_pct(&self) -> WinPct {
        WinPct::new(self.record.wins, self.record.losses + self.remaining_games)
    }

    /// Games behind `reference`: half the sum of the win and loss gaps.
    pub fn games_behind(&self, reference: &Standing) -> f64 {
        let win_gap = reference.wins() as i64 - self.wins() as i64;
        let loss_gap = self.losses() as i64 - reference.losses() as i64;
        (win_gap + loss_gap) as f64 / 2.0
    }
}
