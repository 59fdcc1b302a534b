use std::cmp::Reverse;

use crate::head_to_head::HeadToHeadTable;
use crate::team::Standing;

/// Order teams and attach positions and display ranks.
///
/// Ordering: win percentage descending; within a group of equal win
/// percentage, head-to-head wins against the other members of the group
/// descending; then team id ascending. The result does not depend on the input
/// order, so sorting an already sorted list is a no-op.
pub fn sort_standings(mut standings: Vec<Standing>, head_to_head: &HeadToHeadTable) -> Vec<Standing> {
    standings.sort_by(|a, b| {
        b.win_pct()
            .cmp(&a.win_pct())
            .then_with(|| a.id().cmp(b.id()))
    });

    let mut start = 0;
    while start < standings.len() {
        let pct = standings[start].win_pct();
        let end = start
            + standings[start..]
                .iter()
                .take_while(|s| s.win_pct() == pct)
                .count();
        if end - start > 1 {
            break_tie(&mut standings[start..end], head_to_head);
        }
        start = end;
    }

    assign_display_ranks(&mut standings);
    standings
}

/// Reorder a group of teams with equal win percentage by head-to-head wins
/// within the group, falling back to team id.
fn break_tie(group: &mut [Standing], head_to_head: &HeadToHeadTable) {
    let ids: Vec<String> = group.iter().map(|s| s.id().to_string()).collect();
    group.sort_by_cached_key(|s| {
        let group_wins: u32 = ids
            .iter()
            .filter(|other| other.as_str() != s.id())
            .map(|other| head_to_head.wins_against(s.id(), other))
            .sum();
        (Reverse(group_wins), s.id().to_string())
    });
}

/// Walk the sorted list: a team shares the previous team's rank only when
/// their win percentages are equal, otherwise its rank is its position.
pub fn assign_display_ranks(standings: &mut [Standing]) {
    let mut previous = None;
    for (index, standing) in standings.iter_mut().enumerate() {
        let position = index as u32 + 1;
        standing.position = position;
        standing.display_rank = match previous {
            Some((pct, rank)) if pct == standing.win_pct() => rank,
            _ => position,
        };
        previous = Some((standing.win_pct(), standing.display_rank));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeasonConstants;
    use crate::head_to_head::HeadToHeadRecord;
    use crate::team::TeamRecord;
    use proptest::prelude::*;

    fn standings(records: &[(&str, u32, u32)]) -> Vec<Standing> {
        let season = SeasonConstants::default();
        records
            .iter()
            .map(|&(id, w, l)| Standing::new(TeamRecord::new(id, w, l, 0), &season))
            .collect()
    }

    fn ids(sorted: &[Standing]) -> Vec<&str> {
        sorted.iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_sorted_by_win_pct() {
        let sorted = sort_standings(
            standings(&[("C", 50, 50), ("A", 60, 40), ("B", 30, 20)]),
            &HeadToHeadTable::new(),
        );
        // B and A are both .600
        assert_eq!(ids(&sorted), vec!["A", "B", "C"]);
        let ranks: Vec<u32> = sorted.iter().map(|s| s.display_rank()).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
        let positions: Vec<u32> = sorted.iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_head_to_head_breaks_tie() {
        let mut h2h = HeadToHeadTable::new();
        h2h.insert("B", "A", HeadToHeadRecord::new(9, 7, 0)).unwrap();

        let sorted = sort_standings(standings(&[("A", 60, 40), ("B", 60, 40)]), &h2h);
        assert_eq!(ids(&sorted), vec!["B", "A"]);
        // Display rank is still shared
        assert_eq!(sorted[0].display_rank(), 1);
        assert_eq!(sorted[1].display_rank(), 1);
    }

    #[test]
    fn test_three_way_tie_uses_group_wins() {
        let mut h2h = HeadToHeadTable::new();
        h2h.insert("A", "B", HeadToHeadRecord::new(8, 8, 0)).unwrap();
        h2h.insert("A", "C", HeadToHeadRecord::new(6, 10, 0)).unwrap();
        h2h.insert("B", "C", HeadToHeadRecord::new(7, 9, 0)).unwrap();
        // group wins: A 14, B 15, C 19
        let sorted = sort_standings(
            standings(&[("A", 70, 50), ("B", 70, 50), ("C", 70, 50), ("D", 10, 100)]),
            &h2h,
        );
        assert_eq!(ids(&sorted), vec!["C", "B", "A", "D"]);
        assert_eq!(sorted[3].display_rank(), 4);
    }

    #[test]
    fn test_id_fallback_without_head_to_head() {
        let sorted = sort_standings(
            standings(&[("NC", 50, 50), ("KT", 50, 50)]),
            &HeadToHeadTable::new(),
        );
        assert_eq!(ids(&sorted), vec!["KT", "NC"]);
    }

    #[test]
    fn test_resorting_is_idempotent() {
        let mut h2h = HeadToHeadTable::new();
        h2h.insert("B", "A", HeadToHeadRecord::new(9, 7, 0)).unwrap();
        let first = sort_standings(
            standings(&[("A", 60, 40), ("D", 20, 80), ("B", 60, 40), ("C", 55, 45)]),
            &h2h,
        );
        let second = sort_standings(first.clone(), &h2h);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_resorting_generated_ties_is_idempotent(
            records in prop::collection::vec((0u32..=3, 0u32..=3), 2..8),
            series in prop::collection::vec((0u32..=4, 0u32..=4), 28),
        ) {
            let names: Vec<String> = (0..records.len()).map(|i| format!("T{}", i)).collect();
            let rows: Vec<(&str, u32, u32)> = names
                .iter()
                .zip(&records)
                .map(|(id, &(w, l))| (id.as_str(), w, l))
                .collect();

            let mut h2h = HeadToHeadTable::new();
            let mut next = series.iter();
            for i in 0..names.len() {
                for j in i + 1..names.len() {
                    if let Some(&(w, l)) = next.next() {
                        h2h.insert(&names[i], &names[j], HeadToHeadRecord::new(w, l, 0)).unwrap();
                    }
                }
            }

            let first = sort_standings(standings(&rows), &h2h);
            let second = sort_standings(first.clone(), &h2h);
            prop_assert_eq!(&first, &second);

            let mut reversed = standings(&rows);
            reversed.reverse();
            prop_assert_eq!(&first, &sort_standings(reversed, &h2h));

            for pair in first.windows(2) {
                prop_assert!(pair[0].win_pct() >= pair[1].win_pct());
                let shared = pair[0].win_pct() == pair[1].win_pct();
                prop_assert_eq!(shared, pair[0].display_rank() == pair[1].display_rank());
            }
        }
    }
}
