//! Official matches of the legacy archive.

use super::player_stats::{cmp_date_desc, UNKNOWN_OPPONENT};
use crate::data::Archive;
use crate::models::archive::{STATUS_STARTER, STATUS_SUBSTITUTE};
use crate::models::{ActivityRow, Outcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantCounts {
    pub starters: usize,
    pub substitutes: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalLine {
    pub scorer: String,
    pub assister: Option<String>,
    pub minute: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMatchSummary {
    pub id: String,
    pub date: String,
    pub group: Option<String>,
    pub opponent: String,
    pub our_score: u32,
    pub opponent_score: u32,
    pub result: Outcome,
    pub participants: ParticipantCounts,
    pub goals: Vec<GoalLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMatchList {
    pub total_matches: usize,
    pub matches: Vec<ArchiveMatchSummary>,
}

fn summarize(archive: &Archive, activity: &ActivityRow) -> ArchiveMatchSummary {
    let mut participants = ParticipantCounts::default();
    for p in archive.participants_for(&activity.id) {
        participants.total += 1;
        match p.status.trim() {
            STATUS_STARTER => participants.starters += 1,
            STATUS_SUBSTITUTE => participants.substitutes += 1,
            _ => {}
        }
    }

    let goals: Vec<GoalLine> = archive
        .events_for(&activity.id)
        .map(|e| GoalLine { scorer: e.scorer.clone(), assister: e.assister.clone(), minute: e.minute })
        .collect();

    // every match_events row is one of our goals
    let our_score = goals.len() as u32;
    let opponent_score = activity.opponent_score.unwrap_or(0);

    ArchiveMatchSummary {
        id: activity.id.clone(),
        date: activity.date.clone(),
        group: activity.group.clone(),
        opponent: activity.opponent.clone().unwrap_or_else(|| UNKNOWN_OPPONENT.to_string()),
        our_score,
        opponent_score,
        result: Outcome::from_scores(our_score, opponent_score),
        participants,
        goals,
    }
}

/// Official matches, newest first. Undated matches keep archive order at the end.
pub fn archive_matches(archive: &Archive) -> ArchiveMatchList {
    let mut matches: Vec<ArchiveMatchSummary> = archive
        .activities
        .iter()
        .filter(|a| a.is_match())
        .map(|a| summarize(archive, a))
        .collect();
    matches.sort_by(|a, b| cmp_date_desc(&a.date, &b.date));

    ArchiveMatchList { total_matches: matches.len(), matches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::archive::fixtures;

    #[test]
    fn test_official_matches_newest_first() {
        let list = archive_matches(&fixtures::archive());

        assert_eq!(list.total_matches, 2);
        let ids: Vec<&str> = list.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_summary_counts_and_score() {
        let list = archive_matches(&fixtures::archive());
        let first = list.matches.iter().find(|m| m.id == "1").unwrap();

        assert_eq!(first.opponent, "雷霆队");
        assert_eq!((first.our_score, first.opponent_score), (3, 1));
        assert_eq!(first.result, Outcome::Win);
        assert_eq!(first.participants, ParticipantCounts { starters: 7, substitutes: 0, total: 7 });
        assert_eq!(first.goals[1].assister, None);
        assert_eq!(first.goals[2].scorer, "钱七");

        // missing opponentScore column value reads as 0
        let second = list.matches.iter().find(|m| m.id == "2").unwrap();
        assert_eq!((second.our_score, second.opponent_score), (1, 0));
        assert_eq!(second.participants, ParticipantCounts { starters: 1, substitutes: 1, total: 2 });
    }

    #[test]
    fn test_empty_archive() {
        let list = archive_matches(&Archive::default());
        assert_eq!(list.total_matches, 0);
        assert!(list.matches.is_empty());
    }
}
