//! Lineup visualizer
//!
//! Rebuilds a plausible starting formation for an archived match from its
//! participation rows, places every goal on the pitch, and lays out the
//! photographed roster on a 4-3-3 board.

pub mod formation;
pub mod goal_detail;
pub mod squad;
pub mod squad_board;

pub use formation::{assign_lineup, slot_score, AssignedPlayer, FormationSlot, FormationTemplate, Lineup};
pub use goal_detail::{goal_details, spot_for, GoalDetail, GoalType, PitchArea, PitchSpot};
pub use squad::{promote_bench_keeper, resolve_details, split_squad, PlayerDetails, Squad};
pub use squad_board::{squad_board, BoardAvatar, BoardSlotView, SquadBoard};

use crate::data::Archive;
use crate::error::{ClubError, Result};
use crate::models::{MatchEventRow, Outcome};
use serde::{Deserialize, Serialize};
use tracing::info;

const UNKNOWN_OPPONENT: &str = "未知对手";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchLineup {
    pub id: String,
    pub date: String,
    pub group: Option<String>,
    pub opponent: String,
    pub our_score: u32,
    pub opponent_score: u32,
    pub result: Outcome,
    pub squad: Squad,
    /// Bench keeper promoted over a starter (keeper, benched starter)
    pub keeper_swap: Option<(String, String)>,
    pub lineup: Lineup,
    pub goals: Vec<GoalDetail>,
}

/// Lineup and goal map for one official match of the archive.
pub fn match_lineup(archive: &Archive, activity_id: &str) -> Result<MatchLineup> {
    let activity = archive
        .activity(activity_id)
        .filter(|a| a.is_match())
        .ok_or_else(|| ClubError::not_found("match", activity_id))?;

    let squad = split_squad(archive.participants_for(activity_id));
    let mut starters: Vec<PlayerDetails> =
        squad.starters.iter().map(|n| resolve_details(archive, n)).collect();
    let mut bench: Vec<PlayerDetails> =
        squad.substitutes.iter().map(|n| resolve_details(archive, n)).collect();

    let keeper_swap = promote_bench_keeper(&mut starters, &mut bench);
    let squad = Squad {
        starters: starters.iter().map(|p| p.name.clone()).collect(),
        substitutes: bench.iter().map(|p| p.name.clone()).collect(),
    };

    let lineup = assign_lineup(&starters);
    let events: Vec<&MatchEventRow> = archive.events_for(activity_id).collect();
    let goals = goal_details(events.iter().copied(), &lineup);

    let our_score = events.len() as u32;
    let opponent_score = activity.opponent_score.unwrap_or(0);

    info!(
        match_id = activity_id,
        formation = %lineup.formation,
        starters = squad.starters.len(),
        goals = our_score,
        "lineup built"
    );

    Ok(MatchLineup {
        id: activity.id.clone(),
        date: activity.date.clone(),
        group: activity.group.clone(),
        opponent: activity.opponent.clone().unwrap_or_else(|| UNKNOWN_OPPONENT.to_string()),
        our_score,
        opponent_score,
        result: Outcome::from_scores(our_score, opponent_score),
        squad,
        keeper_swap,
        lineup,
        goals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::archive::fixtures;
    use crate::models::Position;

    #[test]
    fn test_match_lineup_full_squad() {
        let archive = fixtures::archive();
        let lineup = match_lineup(&archive, "1").unwrap();

        assert_eq!(lineup.opponent, "雷霆队");
        assert_eq!((lineup.our_score, lineup.opponent_score), (3, 1));
        assert_eq!(lineup.result, Outcome::Win);
        assert_eq!(lineup.lineup.formation, "1-2-2-1-1");
        assert_eq!(lineup.lineup.players.len(), 7);
        assert_eq!(lineup.lineup.players[0].name(), "赵六");
        assert_eq!(lineup.keeper_swap, None);

        let minutes: Vec<u32> = lineup.goals.iter().map(|g| g.minute).collect();
        assert_eq!(minutes, vec![12, 40, 77]);
        assert_eq!(
            lineup.lineup.player("张三").map(|p| p.formation_position),
            Some(Position::ST)
        );
        assert_eq!(lineup.goals[0].goal_type, GoalType::InsideBox);
    }

    #[test]
    fn test_short_squad_without_keeper() {
        let archive = fixtures::archive();
        let lineup = match_lineup(&archive, "2").unwrap();

        // 李四 topped up from the bench
        assert_eq!(lineup.squad.starters, vec!["张三", "李四"]);
        assert!(lineup.squad.substitutes.is_empty());
        assert_eq!((lineup.our_score, lineup.opponent_score), (1, 0));
        assert_eq!(lineup.opponent, "闪电队");
        assert_eq!(lineup.lineup.formation, "1-4-3-2-1");
        // no defender either: the first starter keeps goal
        assert_eq!(lineup.lineup.players[0].name(), "张三");
    }

    #[test]
    fn test_non_match_activity_is_not_found() {
        let archive = fixtures::archive();
        assert_eq!(match_lineup(&archive, "3").unwrap_err().code(), "NOT_FOUND");
        assert_eq!(match_lineup(&archive, "99").unwrap_err().code(), "NOT_FOUND");
    }
}
