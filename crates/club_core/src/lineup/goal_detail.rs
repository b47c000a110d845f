//! Where each goal came from on the lineup pitch.

use super::formation::Lineup;
use crate::models::MatchEventRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchArea {
    #[serde(rename = "小禁区")]
    SixYardBox,
    #[serde(rename = "禁区内")]
    PenaltyBox,
    #[serde(rename = "左边路")]
    LeftWing,
    #[serde(rename = "右边路")]
    RightWing,
    #[serde(rename = "前场")]
    AttackingThird,
    #[serde(rename = "后场")]
    DefensiveThird,
    #[serde(rename = "中场")]
    Midfield,
}

impl PitchArea {
    /// Attacking zones are checked first (y ≤ 20), then the back line.
    pub fn at(x: f64, y: f64) -> Self {
        if y <= 20.0 {
            if (40.0..=60.0).contains(&x) && y <= 8.0 {
                PitchArea::SixYardBox
            } else if (25.0..=75.0).contains(&x) {
                PitchArea::PenaltyBox
            } else if x < 25.0 {
                PitchArea::LeftWing
            } else if x > 75.0 {
                PitchArea::RightWing
            } else {
                PitchArea::AttackingThird
            }
        } else if y >= 70.0 {
            PitchArea::DefensiveThird
        } else if x < 25.0 {
            PitchArea::LeftWing
        } else if x > 75.0 {
            PitchArea::RightWing
        } else {
            PitchArea::Midfield
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PitchArea::SixYardBox => "小禁区",
            PitchArea::PenaltyBox => "禁区内",
            PitchArea::LeftWing => "左边路",
            PitchArea::RightWing => "右边路",
            PitchArea::AttackingThird => "前场",
            PitchArea::DefensiveThird => "后场",
            PitchArea::Midfield => "中场",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalType {
    #[serde(rename = "近距离破门")]
    CloseRange,
    #[serde(rename = "禁区内射门")]
    InsideBox,
    #[serde(rename = "远距离射门")]
    LongRange,
}

impl GoalType {
    pub fn from_area(area: PitchArea) -> Self {
        match area {
            PitchArea::SixYardBox => GoalType::CloseRange,
            PitchArea::PenaltyBox => GoalType::InsideBox,
            _ => GoalType::LongRange,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchSpot {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub area: PitchArea,
}

/// Spot of `name` in the lineup; players not on the pitch stand at the
/// centre spot.
pub fn spot_for(lineup: &Lineup, name: &str) -> PitchSpot {
    let (x, y, area) = match lineup.player(name) {
        Some(p) => (p.x, p.y, PitchArea::at(p.x, p.y)),
        None => (50.0, 50.0, PitchArea::Midfield),
    };
    PitchSpot { name: name.to_string(), x, y, area }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDetail {
    pub minute: u32,
    pub scorer: PitchSpot,
    pub assister: Option<PitchSpot>,
    pub description: String,
    pub goal_type: GoalType,
}

fn describe(minute: u32, scorer: &PitchSpot, assister: Option<&PitchSpot>) -> String {
    let mut text = format!("{minute}分钟，");
    if let Some(a) = assister {
        text.push_str(&format!("{}在{}送出传球，", a.name, a.area.label()));
    }
    text.push_str(&format!("{}在{}完成射门破门！", scorer.name, scorer.area.label()));
    text
}

/// Goals in minute order with pitch areas, a narrative line and goal type.
pub fn goal_details<'a>(
    events: impl IntoIterator<Item = &'a MatchEventRow>,
    lineup: &Lineup,
) -> Vec<GoalDetail> {
    let mut events: Vec<&MatchEventRow> = events.into_iter().collect();
    events.sort_by_key(|e| e.minute);

    events
        .into_iter()
        .map(|e| {
            let scorer = spot_for(lineup, &e.scorer);
            let assister = e.assister.as_deref().map(|a| spot_for(lineup, a));
            GoalDetail {
                minute: e.minute,
                description: describe(e.minute, &scorer, assister.as_ref()),
                goal_type: GoalType::from_area(scorer.area),
                scorer,
                assister,
            }
        })
        .collect()
}
