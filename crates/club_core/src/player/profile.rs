//! Player profile page: teammate tags, rated skills and highlights.

use crate::config::ClubConfig;
use crate::models::{Player, TeammateEvaluation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Skill keys used in rating documents and their display names.
pub const SKILL_NAMES: &[(&str, &str)] = &[
    ("aggression", "侵略性"),
    ("agility", "灵活性"),
    ("anticipation", "预判"),
    ("bravery", "勇气"),
    ("composure", "沉着"),
    ("concentration", "专注力"),
    ("crossing", "传中"),
    ("dribbling", "盘带"),
    ("finishing", "射门"),
    ("first_touch", "第一脚触球"),
    ("heading", "头球"),
    ("jumping", "弹跳"),
    ("leadership", "领导力"),
    ("long_shots", "远射"),
    ("natural_fitness", "身体素质"),
    ("pace", "速度"),
    ("passing", "传球"),
    ("set_pieces", "定位球"),
    ("stamina", "耐力"),
    ("strength", "力量"),
    ("tackling", "抢断"),
    ("teamwork", "团队合作"),
    ("technique", "技术"),
    ("vision", "视野"),
    ("aerial_ability", "制空能力"),
    ("communication", "沟通"),
    ("handling", "扑救"),
    ("kicking", "开球"),
    ("one_on_ones", "一对一"),
    ("reflexes", "反应"),
    ("rushing_out", "出击"),
];

/// Display name of a skill key, the key itself when unknown.
pub fn skill_label(key: &str) -> &str {
    SKILL_NAMES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingBand {
    Elite,
    Excellent,
    Good,
    Average,
    Low,
}

impl RatingBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            RatingBand::Elite
        } else if score >= 85.0 {
            RatingBand::Excellent
        } else if score >= 80.0 {
            RatingBand::Good
        } else if score >= 70.0 {
            RatingBand::Average
        } else {
            RatingBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub key: String,
    pub label: String,
    pub score: f64,
    pub band: RatingBand,
}

/// Scores above zero, highest first; equal scores keep key order.
pub fn ranked_skills(scores: &BTreeMap<String, f64>) -> Vec<SkillScore> {
    let mut ranked: Vec<SkillScore> = scores
        .iter()
        .filter(|(key, score)| key.as_str() != "_meta" && **score > 0.0)
        .map(|(key, score)| SkillScore {
            key: key.clone(),
            label: skill_label(key).to_string(),
            score: *score,
            band: RatingBand::for_score(*score),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongestSkill {
    pub key: String,
    pub label: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTag {
    pub icon: String,
    pub text: String,
    /// Tag count, or the number of evaluators when no count was stored
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub average_score: Option<f64>,
    pub value: Option<f64>,
    pub evaluation_count: Option<u32>,
    pub strongest_skill: Option<StrongestSkill>,
    pub top_tag: Option<TopTag>,
    /// `"{height}cm / {weight}kg"`
    pub physique: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub player: Player,
    pub photo_url: Option<String>,
    pub evaluations: Vec<TeammateEvaluation>,
    pub teammate_ratings: Vec<SkillScore>,
    pub self_ratings: Vec<SkillScore>,
    pub highlights: Highlights,
}

fn highlights(
    player: &Player,
    evaluations: &[TeammateEvaluation],
    ratings: &[SkillScore],
) -> Highlights {
    let meta = player.skill_ratings.meta.as_ref();

    Highlights {
        average_score: meta
            .and_then(|m| m.average_score)
            .filter(|s| *s > 0.0)
            .map(|s| (s * 10.0).round() / 10.0),
        value: Some(player.value).filter(|v| *v > 0.0),
        evaluation_count: meta.and_then(|m| m.evaluation_count).filter(|n| *n > 0),
        strongest_skill: ratings.first().map(|s| StrongestSkill {
            key: s.key.clone(),
            label: s.label.clone(),
            score: s.score.round() as u32,
        }),
        top_tag: evaluations.first().map(|e| TopTag {
            icon: e.icon.clone(),
            text: e.text.clone(),
            count: if e.count > 0 { e.count } else { e.evaluators.len() as u32 },
        }),
        physique: (player.height_cm > 0 && player.weight_kg > 0)
            .then(|| format!("{}cm / {}kg", player.height_cm, player.weight_kg)),
    }
}

pub fn build_profile(player: &Player, config: &ClubConfig) -> PlayerProfile {
    let mut evaluations = player.teammate_evaluations.clone();
    evaluations.sort_by(|a, b| b.count.cmp(&a.count));

    let teammate_ratings = ranked_skills(&player.skill_ratings.scores);
    let self_ratings = player.self_skill_ratings.as_ref().map(ranked_skills).unwrap_or_default();
    let highlights = highlights(player, &evaluations, &teammate_ratings);

    PlayerProfile {
        player: player.clone(),
        photo_url: config
            .photo_for(player.number)
            .filter(|_| player.has_number())
            .map(str::to_string),
        evaluations,
        teammate_ratings,
        self_ratings,
        highlights,
    }
}
