use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StandingsError};

/// Pairwise record of one team against one opponent, split by venue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadToHeadRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub home_wins: u32,
    pub home_losses: u32,
    pub home_draws: u32,
    pub away_wins: u32,
    pub away_losses: u32,
    pub away_draws: u32,
}

impl HeadToHeadRecord {
    pub fn new(wins: u32, losses: u32, draws: u32) -> Self {
        HeadToHeadRecord {
            wins,
            losses,
            draws,
            ..Default::default()
        }
    }

    pub fn played(&self) -> u64 {
        self.wins as u64 + self.losses as u64 + self.draws as u64
    }

    /// The same series seen from the opponent's side.
    ///
    /// The opponent's home games are this team's away games.
    pub fn mirrored(&self) -> Self {
        HeadToHeadRecord {
            wins: self.losses,
            losses: self.wins,
            draws: self.draws,
            home_wins: self.away_losses,
            home_losses: self.away_wins,
            home_draws: self.away_draws,
            away_wins: self.home_losses,
            away_losses: self.home_wins,
            away_draws: self.home_draws,
        }
    }
}

/// Nested feed shape: team -> opponent -> record
pub type HeadToHeadFeed = HashMap<String, HashMap<String, HeadToHeadRecord>>;

/// Head-to-head results for every pair of teams.
///
/// Each pair is stored once with the team ids in lexicographic order. Looking a
/// pair up in reverse order returns the mirrored record, so
/// `get(a, b).wins == get(b, a).losses` always holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadToHeadTable {
    records: BTreeMap<(String, String), HeadToHeadRecord>,
}

impl HeadToHeadTable {
    pub fn new() -> Self {
        HeadToHeadTable {
            records: BTreeMap::new(),
        }
    }

    /// Build a table from the nested feed. Mirrored entries must agree.
    pub fn from_feed(feed: &HeadToHeadFeed) -> Result<Self> {
        let mut table = HeadToHeadTable::new();
        // Sorted iteration keeps error reporting deterministic
        let mut teams: Vec<&String> = feed.keys().collect();
        teams.sort();
        for team in teams {
            let mut opponents: Vec<(&String, &HeadToHeadRecord)> = feed[team].iter().collect();
            opponents.sort_by(|a, b| a.0.cmp(b.0));
            for (opponent, record) in opponents {
                table.insert(team, opponent, *record)?;
            }
        }
        Ok(table)
    }

    /// Record `team`'s results against `opponent`.
    ///
    /// Inserting the mirror of an existing pair is accepted only if it matches.
    pub fn insert(&mut self, team: &str, opponent: &str, record: HeadToHeadRecord) -> Result<()> {
        if team == opponent {
            return Err(StandingsError::malformed(team, "head-to-head record against itself"));
        }
        let (key, canonical) = if team < opponent {
            ((team.to_string(), opponent.to_string()), record)
        } else {
            ((opponent.to_string(), team.to_string()), record.mirrored())
        };
        if let Some(existing) = self.records.get(&key) {
            if *existing != canonical {
                return Err(StandingsError::malformed(
                    team,
                    format!("head-to-head record against '{}' disagrees with its mirror", opponent),
                ));
            }
            return Ok(());
        }
        self.records.insert(key, canonical);
        Ok(())
    }

    /// `team`'s record against `opponent`, if any games were recorded.
    pub fn get(&self, team: &str, opponent: &str) -> Option<HeadToHeadRecord> {
        if team < opponent {
            self.records
                .get(&(team.to_string(), opponent.to_string()))
                .copied()
        } else {
            self.records
                .get(&(opponent.to_string(), team.to_string()))
                .map(HeadToHeadRecord::mirrored)
        }
    }

    pub fn wins_against(&self, team: &str, opponent: &str) -> u32 {
        self.get(team, opponent).map(|r| r.wins).unwrap_or(0)
    }

    pub fn played(&self, team: &str, opponent: &str) -> u64 {
        self.get(team, opponent).map(|r| r.played()).unwrap_or(0)
    }

    /// Games still owed between the two teams.
    pub fn remaining_between(&self, team: &str, opponent: &str, games_per_opponent: u32) -> u32 {
        (games_per_opponent as u64).saturating_sub(self.played(team, opponent)) as u32
    }

    /// Stored pairs in canonical order, records from the first team's side.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, &HeadToHeadRecord)> {
        self.records
            .iter()
            .map(|((a, b), record)| (a.as_str(), b.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
