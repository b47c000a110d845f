use super::position::Position;
use super::raw::lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerGroup {
    Competitive,
    #[default]
    Recreational,
}

impl PlayerGroup {
    /// Only the literal `competitive` marks the competitive squad.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("competitive") => PlayerGroup::Competitive,
            _ => PlayerGroup::Recreational,
        }
    }
}

/// One teammate tag with the names of those who gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeammateEvaluation {
    pub text: String,
    pub icon: String,
    pub category: String,
    pub description: String,
    pub count: u32,
    pub evaluators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingMeta {
    #[serde(
        rename = "averageScore",
        default,
        deserialize_with = "lenient::f64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub average_score: Option<f64>,
    #[serde(
        rename = "evaluationCount",
        default,
        deserialize_with = "lenient::u32_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub evaluation_count: Option<u32>,
    #[serde(
        rename = "lastUpdated",
        default,
        deserialize_with = "lenient::string_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

/// Teammate skill scores keyed by skill name, plus the aggregate `_meta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillRatings {
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RatingMeta>,
    #[serde(flatten)]
    pub scores: BTreeMap<String, f64>,
}

impl SkillRatings {
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty() && self.meta.is_none()
    }
}

/// Player record as shown on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Jersey number, 0 when unassigned
    pub number: u32,
    /// Position labels as stored (codes or Chinese labels)
    pub positions: Vec<String>,
    pub group: PlayerGroup,
    pub bio: String,
    pub value: f64,
    pub avatar_url: String,
    pub preferred_foot: String,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub teammate_evaluations: Vec<TeammateEvaluation>,
    pub skill_ratings: SkillRatings,
    pub self_skill_ratings: Option<BTreeMap<String, f64>>,
}

impl Player {
    /// Positions that parse into the known vocabulary, in stored order.
    pub fn parsed_positions(&self) -> Vec<Position> {
        self.positions.iter().filter_map(|p| Position::parse(p)).collect()
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.parsed_positions().iter().any(Position::is_goalkeeper)
    }

    pub fn has_number(&self) -> bool {
        self.number > 0
    }

    /// Sort key for roster listings: unassigned numbers go last.
    pub fn number_sort_key(&self) -> u32 {
        if self.number == 0 {
            999
        } else {
            self.number
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_from_raw() {
        assert_eq!(PlayerGroup::from_raw(Some("competitive")), PlayerGroup::Competitive);
        assert_eq!(PlayerGroup::from_raw(Some("Competitive")), PlayerGroup::Recreational);
        assert_eq!(PlayerGroup::from_raw(None), PlayerGroup::Recreational);
    }

    #[test]
    fn test_skill_ratings_flatten_meta() {
        let ratings: SkillRatings = serde_json::from_str(
            r#"{"pace": 82, "passing": 77.5, "_meta": {"averageScore": 79.2, "evaluationCount": 6}}"#,
        )
        .unwrap();
        assert_eq!(ratings.scores.len(), 2);
        assert_eq!(ratings.meta.as_ref().and_then(|m| m.evaluation_count), Some(6));

        let json = serde_json::to_value(&ratings).unwrap();
        assert_eq!(json["pace"], 82.0);
        assert_eq!(json["_meta"]["averageScore"], 79.2);
    }
}
