//! Six-axis radar scores
//!
//! Each axis is the rounded mean of the contributor skills present in a
//! rating map. Outfield players and goalkeepers use different axes.

use crate::models::Player;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadarKind {
    Outfield,
    Goalkeeper,
}

impl RadarKind {
    pub fn for_player(player: &Player) -> Self {
        if player.is_goalkeeper() {
            RadarKind::Goalkeeper
        } else {
            RadarKind::Outfield
        }
    }

    /// Axis names with their contributor skills, in display order.
    pub fn axes(&self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            RadarKind::Outfield => &[
                ("pace", &["pace", "agility", "stamina"]),
                ("power", &["strength", "jumping", "natural_fitness", "bravery", "heading"]),
                ("technical", &["dribbling", "first_touch", "technique"]),
                ("shooting", &["finishing", "long_shots", "composure"]),
                ("passing", &["passing", "vision", "crossing", "teamwork", "set_pieces"]),
                ("defending", &["tackling", "anticipation", "concentration", "aggression"]),
            ],
            RadarKind::Goalkeeper => &[
                ("reflexes", &["reflexes", "agility"]),
                ("handling", &["handling", "concentration"]),
                ("aerial", &["aerial_ability", "jumping"]),
                ("distribution", &["kicking", "passing"]),
                ("command", &["communication", "leadership", "rushing_out"]),
                ("positioning", &["one_on_ones", "anticipation", "composure"]),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarAxis {
    pub axis: String,
    /// `None` when no contributor skill was rated
    pub value: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radar {
    pub kind: RadarKind,
    pub axes: Vec<RadarAxis>,
}

impl Radar {
    pub fn from_scores(kind: RadarKind, scores: &BTreeMap<String, f64>) -> Self {
        let axes = kind
            .axes()
            .iter()
            .map(|(axis, contributors)| {
                let present: Vec<f64> = contributors
                    .iter()
                    .filter_map(|skill| scores.get(*skill).copied())
                    .filter(|score| *score > 0.0)
                    .collect();
                let value = if present.is_empty() {
                    None
                } else {
                    Some((present.iter().sum::<f64>() / present.len() as f64).round() as u32)
                };
                RadarAxis { axis: axis.to_string(), value }
            })
            .collect();
        Radar { kind, axes }
    }

    pub fn value(&self, axis: &str) -> Option<u32> {
        self.axes.iter().find(|a| a.axis == axis).and_then(|a| a.value)
    }

    pub fn is_empty(&self) -> bool {
        self.axes.iter().all(|a| a.value.is_none())
    }
}

/// Self radar minus teammate radar, per axis rated on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarDiff {
    pub diffs: Vec<(String, i32)>,
}

impl RadarDiff {
    pub fn compare(self_radar: &Radar, teammate_radar: &Radar) -> Self {
        let diffs = self_radar
            .axes
            .iter()
            .filter_map(|a| {
                let own = a.value? as i32;
                let peer = teammate_radar.value(&a.axis)? as i32;
                Some((a.axis.clone(), own - peer))
            })
            .collect();
        RadarDiff { diffs }
    }

    pub fn total_diff(&self) -> u32 {
        self.diffs.iter().map(|(_, d)| d.unsigned_abs()).sum()
    }

    /// Axis the player rates highest above the teammates' view.
    pub fn biggest_overrating(&self) -> Option<(&str, i32)> {
        self.diffs
            .iter()
            .filter(|(_, d)| *d > 0)
            .max_by_key(|(_, d)| *d)
            .map(|(axis, d)| (axis.as_str(), *d))
    }

    /// Axis the player rates furthest below the teammates' view.
    pub fn biggest_underrating(&self) -> Option<(&str, i32)> {
        self.diffs
            .iter()
            .filter(|(_, d)| *d < 0)
            .min_by_key(|(_, d)| *d)
            .map(|(axis, d)| (axis.as_str(), *d))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisGap {
    pub axis: String,
    pub diff: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRadar {
    pub player_id: String,
    pub name: String,
    pub teammate: Radar,
    pub self_rated: Option<Radar>,
    pub diff: Option<RadarDiff>,
    pub biggest_overrating: Option<AxisGap>,
    pub biggest_underrating: Option<AxisGap>,
}

fn gap(found: Option<(&str, i32)>) -> Option<AxisGap> {
    found.map(|(axis, diff)| AxisGap { axis: axis.to_string(), diff })
}

pub fn player_radar(player: &Player) -> PlayerRadar {
    let kind = RadarKind::for_player(player);
    let teammate = Radar::from_scores(kind, &player.skill_ratings.scores);
    let self_rated = player
        .self_skill_ratings
        .as_ref()
        .map(|scores| Radar::from_scores(kind, scores))
        .filter(|radar| !radar.is_empty());
    let diff = self_rated.as_ref().map(|own| RadarDiff::compare(own, &teammate));

    PlayerRadar {
        player_id: player.id.clone(),
        name: player.name.clone(),
        biggest_overrating: diff.as_ref().and_then(|d| gap(d.biggest_overrating())),
        biggest_underrating: diff.as_ref().and_then(|d| gap(d.biggest_underrating())),
        teammate,
        self_rated,
        diff,
    }
}
