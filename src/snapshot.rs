use std::collections::{HashMap, HashSet};

use log::debug;

use crate::config::SeasonConstants;
use crate::error::{Result, StandingsError};
use crate::feed::StandingsFeed;
use crate::head_to_head::{HeadToHeadFeed, HeadToHeadTable};
use crate::team::{Standing, TeamRecord};
use crate::tiebreak::sort_standings;

/// Immutable standings for one data refresh.
///
/// Built once from validated records, sorted, ranked, and then only read. A
/// new refresh produces a new snapshot; nothing here is ever edited in place,
/// so a snapshot can be shared freely between threads.
#[derive(Clone, Debug)]
pub struct StandingsSnapshot {
    standings: Vec<Standing>,
    index: HashMap<String, usize>,
    head_to_head: HeadToHeadTable,
    season: SeasonConstants,
}

impl StandingsSnapshot {
    /// Validate the inputs, sort the teams and attach display ranks.
    pub fn new(
        records: Vec<TeamRecord>,
        head_to_head: HeadToHeadTable,
        season: SeasonConstants,
    ) -> Result<Self> {
        season.validate()?;

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            record.validate(&season)?;
            if !seen.insert(record.id.as_str()) {
                return Err(StandingsError::malformed(&record.id, "duplicate team id"));
            }
        }

        for (team, opponent, record) in head_to_head.pairs() {
            for id in [team, opponent] {
                if !seen.contains(id) {
                    return Err(StandingsError::missing(id));
                }
            }
            if record.played() > season.games_per_opponent as u64 {
                return Err(StandingsError::malformed(
                    team,
                    format!(
                        "{} games against '{}' exceeds {} per opponent",
                        record.played(),
                        opponent,
                        season.games_per_opponent
                    ),
                ));
            }
        }

        let standings: Vec<Standing> = records
            .into_iter()
            .map(|record| Standing::new(record, &season))
            .collect();
        let standings = sort_standings(standings, &head_to_head);
        let index = standings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id().to_string(), i))
            .collect();

        debug!(
            "built standings snapshot: {} teams, {} head-to-head pairs",
            standings.len(),
            head_to_head.len()
        );

        Ok(StandingsSnapshot {
            standings,
            index,
            head_to_head,
            season,
        })
    }

    /// Build a snapshot from the standings and head-to-head feed documents.
    pub fn from_json(
        standings_json: &str,
        head_to_head_json: Option<&str>,
        season: SeasonConstants,
    ) -> Result<Self> {
        let records = StandingsFeed::from_json(standings_json)?
            .into_entries()
            .into_iter()
            .map(|entry| entry.into_record(&season))
            .collect::<Result<Vec<_>>>()?;
        let head_to_head = match head_to_head_json {
            Some(raw) => {
                let feed: HeadToHeadFeed = serde_json::from_str(raw)?;
                HeadToHeadTable::from_feed(&feed)?
            }
            None => HeadToHeadTable::new(),
        };
        Self::new(records, head_to_head, season)
    }

    /// Teams in sorted order
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn season(&self) -> &SeasonConstants {
        &self.season
    }

    pub fn head_to_head(&self) -> &HeadToHeadTable {
        &self.head_to_head
    }

    pub fn team(&self, id: &str) -> Result<&Standing> {
        self.index
            .get(id)
            .map(|&i| &self.standings[i])
            .ok_or_else(|| StandingsError::missing(id))
    }

    /// Team at a 1-based sorted position.
    pub fn at_rank(&self, position: u32) -> Result<&Standing> {
        if position == 0 {
            return Err(StandingsError::InsufficientStandings {
                required: 1,
                available: self.len(),
            });
        }
        self.standings
            .get(position as usize - 1)
            .ok_or(StandingsError::InsufficientStandings {
                required: position as usize,
                available: self.len(),
            })
    }

    pub fn leader(&self) -> Result<&Standing> {
        self.at_rank(1)
    }

    pub fn runner_up(&self) -> Option<&Standing> {
        self.standings.get(1)
    }

    /// Every team except `team`, in sorted order
    pub fn rivals<'a>(&'a self, team: &'a Standing) -> impl Iterator<Item = &'a Standing> + 'a {
        self.standings.iter().filter(move |s| s.id() != team.id())
    }

    /// Fail unless the snapshot holds at least `count` teams.
    pub fn require_teams(&self, count: usize) -> Result<()> {
        if self.len() < count {
            return Err(StandingsError::InsufficientStandings {
                required: count,
                available: self.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::head_to_head::HeadToHeadRecord;

    #[test]
    fn test_snapshot_sorted_and_indexed() {
        let snapshot = fixtures::kbo_snapshot();
        assert_eq!(snapshot.len(), 10);
        assert_eq!(snapshot.leader().unwrap().id(), "Hanwha");
        assert_eq!(snapshot.team("Kiwoom").unwrap().position(), 10);
        for (i, s) in snapshot.standings().iter().enumerate() {
            assert_eq!(s.position() as usize, i + 1);
        }
    }

    #[test]
    fn test_missing_team_is_reported() {
        let snapshot = fixtures::kbo_snapshot();
        let err = snapshot.team("Yomiuri").unwrap_err();
        assert!(matches!(err, StandingsError::MissingTeamData { .. }));
    }

    #[test]
    fn test_head_to_head_references_unknown_team() {
        let mut h2h = HeadToHeadTable::new();
        h2h.insert("A", "Z", HeadToHeadRecord::new(1, 0, 0)).unwrap();
        let err = StandingsSnapshot::new(
            vec![TeamRecord::new("A", 1, 0, 0)],
            h2h,
            SeasonConstants::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StandingsError::MissingTeamData { ref team_id } if team_id == "Z"));
    }

    #[test]
    fn test_head_to_head_overfull_pair() {
        let mut h2h = HeadToHeadTable::new();
        h2h.insert("A", "B", HeadToHeadRecord::new(10, 7, 0)).unwrap();
        let err = StandingsSnapshot::new(
            vec![TeamRecord::new("A", 10, 7, 0), TeamRecord::new("B", 7, 10, 0)],
            h2h,
            SeasonConstants::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StandingsError::MalformedRecord { .. }));
    }

    #[test]
    fn test_duplicate_team_rejected() {
        let err = StandingsSnapshot::new(
            vec![TeamRecord::new("A", 1, 0, 0), TeamRecord::new("A", 0, 1, 0)],
            HeadToHeadTable::new(),
            SeasonConstants::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StandingsError::MalformedRecord { .. }));
    }

    #[test]
    fn test_malformed_record_fails_fast() {
        let err = StandingsSnapshot::new(
            vec![TeamRecord::new("A", 100, 50, 0)],
            HeadToHeadTable::new(),
            SeasonConstants::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StandingsError::MalformedRecord { .. }));
    }

    #[test]
    fn test_at_rank_bounds() {
        let snapshot = fixtures::kbo_snapshot();
        assert!(snapshot.at_rank(10).is_ok());
        assert!(matches!(
            snapshot.at_rank(11),
            Err(StandingsError::InsufficientStandings { required: 11, available: 10 })
        ));
        assert!(snapshot.at_rank(0).is_err());
        assert!(snapshot.require_teams(11).is_err());
    }

    #[test]
    fn test_from_json() {
        let standings = r#"[
            {"id": "A", "gamesPlayed": 4, "wins": 3, "losses": 1},
            {"id": "B", "gamesPlayed": 4, "wins": 1, "losses": 3}
        ]"#;
        let h2h = r#"{"A": {"B": {"wins": 3, "losses": 1, "draws": 0}}}"#;
        let season = SeasonConstants {
            total_games: 16,
            ..Default::default()
        };
        let snapshot = StandingsSnapshot::from_json(standings, Some(h2h), season).unwrap();
        assert_eq!(snapshot.leader().unwrap().id(), "A");
        assert_eq!(snapshot.head_to_head().wins_against("B", "A"), 1);
        assert_eq!(snapshot.team("B").unwrap().remaining_games(), 12);
    }

    #[test]
    fn test_from_json_rejects_out_of_range_counts() {
        let standings = r#"[{"id": "A", "gamesPlayed": 144, "wins": 4294967295, "losses": 1}]"#;
        let err = StandingsSnapshot::from_json(standings, None, SeasonConstants::default()).unwrap_err();
        assert!(matches!(err, StandingsError::MalformedRecord { .. }));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_head_to_head() {
        let standings = r#"[
            {"id": "A", "gamesPlayed": 4, "wins": 3, "losses": 1},
            {"id": "B", "gamesPlayed": 4, "wins": 1, "losses": 3}
        ]"#;
        let h2h = r#"{"A": {"B": {"wins": 4294967295, "losses": 1}}}"#;
        let err = StandingsSnapshot::from_json(standings, Some(h2h), SeasonConstants::default())
            .unwrap_err();
        assert!(matches!(err, StandingsError::MalformedRecord { .. }));
    }
}
