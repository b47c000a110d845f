use crate::error::ClubError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Competitive,
    Friendly,
}

impl MatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::Competitive => "竞技赛",
            MatchKind::Friendly => "友谊赛",
        }
    }
}

impl FromStr for MatchKind {
    type Err = ClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "competitive" | "竞技赛" => Ok(MatchKind::Competitive),
            "friendly" | "友谊赛" => Ok(MatchKind::Friendly),
            other => Err(ClubError::InvalidRequest(format!("unknown match kind: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[serde(rename = "胜")]
    Win,
    #[serde(rename = "平")]
    Draw,
    #[serde(rename = "负")]
    Loss,
}

impl Outcome {
    pub fn from_scores(ours: u32, theirs: u32) -> Self {
        match ours.cmp(&theirs) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Loss,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "胜",
            Outcome::Draw => "平",
            Outcome::Loss => "负",
        }
    }
}

/// Goal record: scorer, optional assister, minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub scorer: String,
    pub assister: Option<String>,
    pub minute: u32,
    #[serde(default)]
    pub is_own_goal: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Participants {
    pub starters: u32,
    pub substitutes: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvents {
    /// Goals scored by us
    pub goals: u32,
    /// Every recorded goal, own goals included
    pub goal_scorers: Vec<Goal>,
}

/// Match record as shown on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    /// `YYYY/MM/DD` in the club's time zone, empty when unknown
    pub date: String,
    pub date_raw: String,
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: MatchKind,
    pub type_label: String,
    pub opponent: String,
    pub our_score: u32,
    pub opponent_score: u32,
    pub result: Outcome,
    pub venue: String,
    pub title: String,
    pub status: String,
    pub participants: Participants,
    pub events: MatchEvents,
}

impl Match {
    /// Calendar year taken from the display date.
    pub fn year(&self) -> Option<i32> {
        self.date.get(0..4).and_then(|y| y.parse().ok())
    }

    /// Newest-first ordering; matches without a kickoff sort last.
    pub fn cmp_newest_first(a: &Match, b: &Match) -> Ordering {
        match (&a.kickoff, &b.kickoff) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.date_raw.cmp(&a.date_raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_scores() {
        assert_eq!(Outcome::from_scores(3, 1), Outcome::Win);
        assert_eq!(Outcome::from_scores(2, 2), Outcome::Draw);
        assert_eq!(Outcome::from_scores(0, 1), Outcome::Loss);
        assert_eq!(Outcome::Loss.label(), "负");
    }

    #[test]
    fn test_outcome_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Outcome::Win).unwrap(), "\"胜\"");
        assert_eq!(serde_json::to_string(&MatchKind::Friendly).unwrap(), "\"friendly\"");
    }

    #[test]
    fn test_match_kind_parses_code_or_label() {
        assert_eq!("friendly".parse::<MatchKind>().unwrap(), MatchKind::Friendly);
        assert_eq!("竞技赛".parse::<MatchKind>().unwrap(), MatchKind::Competitive);
        assert!("cup".parse::<MatchKind>().is_err());
    }
}
