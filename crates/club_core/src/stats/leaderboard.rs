//! Goal, assist and market value leaderboards.

use crate::adapter::ClubView;
use crate::config::ClubConfig;
use crate::error::ClubError;
use crate::models::{Goal, Match};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    Goals,
    Assists,
    Value,
}

impl Board {
    pub fn unit(&self) -> &'static str {
        match self {
            Board::Goals => "球",
            Board::Assists => "助攻",
            Board::Value => "",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Board::Goals => "射手榜",
            Board::Assists => "助攻榜",
            Board::Value => "身价榜",
        }
    }
}

impl FromStr for Board {
    type Err = ClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goals" => Ok(Board::Goals),
            "assists" => Ok(Board::Assists),
            "value" => Ok(Board::Value),
            other => Err(ClubError::InvalidRequest(format!("unknown leaderboard: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: u32) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BoardValue {
    Count(u32),
    Amount(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub value: BoardValue,
    pub jersey_number: Option<u32>,
    pub medal: Option<Medal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Leaderboard {
    pub board: Board,
    pub title: String,
    pub unit: String,
    pub entries: Vec<LeaderboardEntry>,
}

/// Count occurrences keeping first-seen order, then sort by count
/// descending. The sort is stable, so ties stay in first-seen order.
pub fn tally_names<'a, I>(names: I) -> Vec<(String, u32)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: FxHashMap<&'a str, usize> = FxHashMap::default();
    let mut counts: Vec<(&'a str, u32)> = Vec::new();

    for name in names {
        match index.get(name) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(name, counts.len());
                counts.push((name, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(name, n)| (name.to_string(), n)).collect()
}

fn countable<'a>(name: &'a str, unknown: &str) -> Option<&'a str> {
    let name = name.trim();
    if name.is_empty() || name == unknown {
        None
    } else {
        Some(name)
    }
}

fn credited_goals(matches: &[Match]) -> impl Iterator<Item = &Goal> {
    matches.iter().flat_map(|m| m.events.goal_scorers.iter()).filter(|g| !g.is_own_goal)
}

/// Scorer names in match order, own goals and unknown scorers excluded.
///
/// Totals built from this are below the raw number of goal entries whenever a
/// match has an own goal or an unnamed scorer.
pub fn scorer_names<'a>(matches: &'a [Match], unknown: &'a str) -> impl Iterator<Item = &'a str> {
    credited_goals(matches).filter_map(move |g| countable(&g.scorer, unknown))
}

/// Assister names in match order, own goals excluded.
///
/// An assist recorded on an own goal is dropped with the goal. An assist to an
/// unknown scorer still counts for the assister.
pub fn assister_names<'a>(
    matches: &'a [Match],
    unknown: &'a str,
) -> impl Iterator<Item = &'a str> {
    credited_goals(matches)
        .filter_map(|g| g.assister.as_deref())
        .filter_map(move |name| countable(name, unknown))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn rank_entries<V>(
    items: impl IntoIterator<Item = (String, V, Option<u32>)>,
    size: usize,
    to_value: impl Fn(V) -> BoardValue,
) -> Vec<LeaderboardEntry> {
    items
        .into_iter()
        .take(size)
        .enumerate()
        .map(|(i, (name, value, jersey_number))| {
            let rank = i as u32 + 1;
            LeaderboardEntry {
                rank,
                name,
                value: to_value(value),
                jersey_number,
                medal: Medal::for_rank(rank),
            }
        })
        .collect()
}

pub fn build_leaderboard(view: &ClubView, board: Board, config: &ClubConfig) -> Leaderboard {
    let size = config.leaderboard_size;
    let unknown = config.unknown_name.as_str();
    let numbers = view.numbers_by_name();
    let jersey = |name: &str| numbers.get(name).copied().filter(|n| *n > 0);

    let entries = match board {
        Board::Goals | Board::Assists => {
            let counts = if board == Board::Goals {
                tally_names(scorer_names(&view.matches, unknown))
            } else {
                tally_names(assister_names(&view.matches, unknown))
            };
            let rows = counts.into_iter().map(|(name, n)| {
                let number = jersey(&name);
                (name, n, number)
            });
            rank_entries(rows, size, BoardValue::Count)
        }
        Board::Value => {
            let mut valued: Vec<_> = view.players.iter().filter(|p| p.value > 0.0).collect();
            valued.sort_by(|a, b| b.value.total_cmp(&a.value));
            let rows = valued.into_iter().map(|p| {
                let number = if p.number > 0 { Some(p.number) } else { None };
                (p.name.clone(), round1(p.value), number)
            });
            rank_entries(rows, size, BoardValue::Amount)
        }
    };

    Leaderboard {
        board,
        title: board.title().to_string(),
        unit: board.unit().to_string(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::{goal, match_with_goals, player};
    use proptest::prelude::*;

    #[test]
    fn test_tally_keeps_first_seen_order_on_ties() {
        let counts = tally_names(["乙", "甲", "甲", "丙", "乙", "丁"]);
        assert_eq!(
            counts,
            vec![
                ("乙".to_string(), 2),
                ("甲".to_string(), 2),
                ("丙".to_string(), 1),
                ("丁".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_name_streams_skip_own_goals() {
        let matches = vec![match_with_goals(
            "m1",
            vec![
                goal("张三", Some("李四"), 10, true),
                goal("未知", Some("王五"), 20, false),
                goal(" ", Some("李四"), 30, false),
            ],
        )];

        let scorers: Vec<&str> = scorer_names(&matches, "未知").collect();
        assert!(scorers.is_empty());

        let assisters: Vec<&str> = assister_names(&matches, "未知").collect();
        assert_eq!(assisters, vec!["王五", "李四"]);
    }

    #[test]
    fn test_goal_board_excludes_own_goals_and_unknown() {
        let view = ClubView {
            players: vec![player("p1", "张三", 9, 0.0), player("p2", "李四", 0, 0.0)],
            matches: vec![
                match_with_goals(
                    "m1",
                    vec![
                        goal("张三", Some("李四"), 10, false),
                        goal("李四", None, 20, false),
                        goal("张三", None, 30, true),
                        goal("未知", None, 40, false),
                    ],
                ),
                match_with_goals("m2", vec![goal("张三", Some("李四"), 5, false)]),
            ],
            metadata: None,
        };

        let board = build_leaderboard(&view, Board::Goals, &ClubConfig::default());
        assert_eq!(board.unit, "球");
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.entries[0].name, "张三");
        assert_eq!(board.entries[0].value, BoardValue::Count(2));
        assert_eq!(board.entries[0].jersey_number, Some(9));
        assert_eq!(board.entries[0].medal, Some(Medal::Gold));
        assert_eq!(board.entries[1].jersey_number, None);

        let assists = build_leaderboard(&view, Board::Assists, &ClubConfig::default());
        assert_eq!(assists.entries.len(), 1);
        assert_eq!(assists.entries[0].value, BoardValue::Count(2));
    }

    #[test]
    fn test_value_board_rounds_and_filters() {
        let view = ClubView {
            players: vec![
                player("a", "甲", 4, 12.345),
                player("b", "乙", 5, 0.0),
                player("c", "丙", 0, 30.0),
            ],
            matches: vec![],
            metadata: None,
        };
        let board = build_leaderboard(&view, Board::Value, &ClubConfig::default());
        assert_eq!(board.unit, "");
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.entries[0].name, "丙");
        assert_eq!(board.entries[0].jersey_number, None);
        assert_eq!(board.entries[1].value, BoardValue::Amount(12.3));
    }

    #[test]
    fn test_board_from_str() {
        assert_eq!("Goals".parse::<Board>().unwrap(), Board::Goals);
        assert!("saves".parse::<Board>().is_err());
    }

    proptest! {
        #[test]
        fn prop_ranks_are_sequential_and_values_descend(
            names in proptest::collection::vec(0usize..8, 0..60),
            size in 1usize..25,
        ) {
            let roster = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛"];
            let goals = names.iter().map(|i| goal(roster[*i], None, 1, false)).collect();
            let view = ClubView {
                players: vec![],
                matches: vec![match_with_goals("m", goals)],
                metadata: None,
            };
            let mut config = ClubConfig::default();
            config.leaderboard_size = size;

            let board = build_leaderboard(&view, Board::Goals, &config);
            prop_assert!(board.entries.len() <= size);
            for (i, entry) in board.entries.iter().enumerate() {
                prop_assert_eq!(entry.rank, i as u32 + 1);
            }
            let values: Vec<u32> = board
                .entries
                .iter()
                .map(|e| match e.value { BoardValue::Count(n) => n, BoardValue::Amount(_) => 0 })
                .collect();
            prop_assert!(values.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
