//! Shared standings used across unit tests.

use std::collections::HashMap;

use crate::config::SeasonConstants;
use crate::head_to_head::{HeadToHeadRecord, HeadToHeadTable};
use crate::snapshot::StandingsSnapshot;
use crate::team::TeamRecord;

/// Late-season ten-team table, 144-game season, no head-to-head data.
pub fn kbo_snapshot() -> StandingsSnapshot {
    snapshot(
        SeasonConstants::default(),
        &[
            ("Hanwha", 80, 45, 3),
            ("LG", 78, 47, 3),
            ("SSG", 66, 57, 4),
            ("Samsung", 67, 60, 2),
            ("KT", 64, 59, 4),
            ("NC", 61, 58, 6),
            ("Lotte", 63, 62, 6),
            ("KIA", 60, 63, 4),
            ("Doosan", 55, 68, 5),
            ("Kiwoom", 42, 83, 3),
        ],
    )
}

/// Snapshot from `(id, wins, losses, draws)` rows.
pub fn snapshot(season: SeasonConstants, rows: &[(&str, u32, u32, u32)]) -> StandingsSnapshot {
    let records = rows
        .iter()
        .map(|&(id, w, l, d)| TeamRecord::new(id, w, l, d))
        .collect();
    StandingsSnapshot::new(records, HeadToHeadTable::new(), season)
        .expect("fixture standings should be valid")
}

/// Snapshot of generated `(wins, losses, draws)` rows, teams named `T0`, `T1`, ...
pub fn numbered_snapshot(season: SeasonConstants, rows: &[(u32, u32, u32)]) -> StandingsSnapshot {
    let names: Vec<String> = (0..rows.len()).map(|i| format!("T{}", i)).collect();
    let named: Vec<(&str, u32, u32, u32)> = names
        .iter()
        .zip(rows)
        .map(|(id, &(w, l, d))| (id.as_str(), w, l, d))
        .collect();
    snapshot(season, &named)
}

/// Snapshot whose team records are the sums of the given head-to-head series
/// `(team, opponent, team wins, team losses, draws)`.
pub fn league_from_pairs(
    season: SeasonConstants,
    teams: &[&str],
    pairs: &[(&str, &str, u32, u32, u32)],
) -> StandingsSnapshot {
    let mut h2h = HeadToHeadTable::new();
    let mut totals: HashMap<&str, (u32, u32, u32)> =
        teams.iter().map(|&t| (t, (0, 0, 0))).collect();
    for &(team, opponent, w, l, d) in pairs {
        h2h.insert(team, opponent, HeadToHeadRecord::new(w, l, d))
            .expect("fixture pairs should be consistent");
        let entry = totals.get_mut(team).expect("pair team listed");
        entry.0 += w;
        entry.1 += l;
        entry.2 += d;
        let entry = totals.get_mut(opponent).expect("pair opponent listed");
        entry.0 += l;
        entry.1 += w;
        entry.2 += d;
    }
    let records = teams
        .iter()
        .map(|&t| {
            let (w, l, d) = totals[t];
            TeamRecord::new(t, w, l, d)
        })
        .collect();
    StandingsSnapshot::new(records, h2h, season).expect("fixture league should be valid")
}

/// Four teams, four games per opponent, twelve-game season, eight games played each.
///
/// A 6-2, B 5-3, D 3-5, C 2-6; every team has four games left.
pub fn small_league() -> StandingsSnapshot {
    let season = SeasonConstants {
        total_games: 12,
        games_per_opponent: 4,
        playoff_spots: 2,
        legacy_playoff_baseline: 6,
        historical_average_wins: 8,
        ..Default::default()
    };
    league_from_pairs(
        season,
        &["A", "B", "C", "D"],
        &[
            ("A", "B", 2, 1, 0),
            ("A", "C", 2, 1, 0),
            ("A", "D", 2, 0, 0),
            ("B", "C", 2, 0, 0),
            ("B", "D", 2, 1, 0),
            ("C", "D", 1, 2, 0),
        ],
    )
}
