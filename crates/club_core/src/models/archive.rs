//! Rows of the legacy CSV archive.
//!
//! Every file is read as header → value maps first; `from_row` picks the
//! columns it knows and returns `None` when the identifying column is empty.

use super::position::Position;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub type Row = FxHashMap<String, String>;

fn cell<'a>(row: &'a Row, key: &str) -> &'a str {
    row.get(key).map(|v| v.trim()).unwrap_or("")
}

fn opt_cell(row: &Row, key: &str) -> Option<String> {
    let value = cell(row, key);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Integer prefix of `text` (`"82分"` → 82). Zero counts as absent.
pub fn parse_int_prefix(text: &str) -> Option<u32> {
    let digits: String = text.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u32>().ok().filter(|v| *v != 0)
}

/// `2025member.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRow {
    pub name: String,
    /// Jersey number as stored, `"0"` when missing
    pub number: String,
    pub primary_position: Option<String>,
    pub secondary_position: Option<String>,
    pub ability: Option<u32>,
    pub level: Option<String>,
    pub age: Option<u32>,
    pub stored_value: Option<f64>,
    pub group: Option<String>,
}

impl MemberRow {
    pub fn from_row(row: &Row) -> Option<Self> {
        let name = opt_cell(row, "姓名")?;
        Some(Self {
            name,
            number: opt_cell(row, "球衣号码").unwrap_or_else(|| "0".to_string()),
            primary_position: opt_cell(row, "主要位置"),
            secondary_position: opt_cell(row, "次要位置"),
            ability: parse_int_prefix(cell(row, "综合能力")),
            level: opt_cell(row, "水平"),
            age: parse_int_prefix(cell(row, "年龄")),
            stored_value: cell(row, "身价").parse::<f64>().ok().filter(|v| *v > 0.0),
            group: opt_cell(row, "组别"),
        })
    }

    pub fn primary(&self) -> Option<Position> {
        self.primary_position.as_deref().and_then(Position::parse)
    }

    pub fn secondary(&self) -> Option<Position> {
        self.secondary_position.as_deref().and_then(Position::parse)
    }
}

/// `goalkeepers.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalkeeperRow {
    pub name: String,
    pub secondary_position: Option<String>,
    pub rating: Option<u32>,
    pub number: Option<String>,
}

impl GoalkeeperRow {
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            name: opt_cell(row, "姓名")?,
            secondary_position: opt_cell(row, "次要位置"),
            rating: parse_int_prefix(cell(row, "综合评分")),
            number: opt_cell(row, "背号"),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// 正式比赛
    OfficialMatch,
    /// 队内训练
    TeamTraining,
    /// 队内对抗赛
    Skirmish,
    Other,
}

impl ActivityType {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "正式比赛" => ActivityType::OfficialMatch,
            "队内训练" => ActivityType::TeamTraining,
            "队内对抗赛" => ActivityType::Skirmish,
            _ => ActivityType::Other,
        }
    }
}

/// `activities.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: String,
    pub date: String,
    pub activity_type: ActivityType,
    pub group: Option<String>,
    pub opponent: Option<String>,
    /// Optional column; absent in older exports
    pub opponent_score: Option<u32>,
}

impl ActivityRow {
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            id: opt_cell(row, "id")?,
            date: cell(row, "date").to_string(),
            activity_type: ActivityType::parse(cell(row, "type")),
            group: opt_cell(row, "group"),
            opponent: opt_cell(row, "opponent"),
            opponent_score: cell(row, "opponentScore").parse().ok(),
        })
    }

    pub fn is_match(&self) -> bool {
        self.activity_type == ActivityType::OfficialMatch
    }
}

/// `match_events.csv`: one goal per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEventRow {
    pub activity_id: String,
    pub event_type: Option<String>,
    pub scorer: String,
    pub assister: Option<String>,
    pub minute: u32,
    pub date: String,
    pub group: Option<String>,
}

impl MatchEventRow {
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            activity_id: opt_cell(row, "activityId")?,
            event_type: opt_cell(row, "eventType"),
            scorer: cell(row, "scorer").to_string(),
            assister: opt_cell(row, "assister"),
            minute: parse_int_prefix(cell(row, "minute")).unwrap_or(0),
            date: cell(row, "date").to_string(),
            group: opt_cell(row, "group"),
        })
    }
}

/// `match_participants.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRow {
    pub activity_id: String,
    pub player_name: String,
    /// 首发 / 替补, free text in practice
    pub status: String,
    pub group: Option<String>,
}

impl ParticipantRow {
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            activity_id: opt_cell(row, "activityId")?,
            player_name: opt_cell(row, "playerName")?,
            status: cell(row, "status").to_string(),
            group: opt_cell(row, "group"),
        })
    }

    pub fn is_starter(&self) -> bool {
        self.status == STATUS_STARTER
    }

    pub fn is_substitute(&self) -> bool {
        self.status == STATUS_SUBSTITUTE
    }
}

pub const STATUS_STARTER: &str = "首发";
pub const STATUS_SUBSTITUTE: &str = "替补";

/// `training_attendance.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub player_name: String,
    pub activity_type: ActivityType,
    pub attended: bool,
    pub activity_id: Option<String>,
    pub date: Option<String>,
}

impl TrainingRow {
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            player_name: opt_cell(row, "playerName")?,
            activity_type: ActivityType::parse(cell(row, "type")),
            attended: cell(row, "attended") == "true",
            activity_id: opt_cell(row, "activityId"),
            date: opt_cell(row, "date"),
        })
    }
}

/// `football_attributes.csv`: one score band of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeBandRow {
    pub category: String,
    /// Attribute name with the parenthesised English part removed
    pub attribute: String,
    pub min: u32,
    pub max: u32,
    pub description: String,
}

impl AttributeBandRow {
    /// Rows whose score range has no `min-max` pair are dropped.
    pub fn from_row(row: &Row) -> Option<Self> {
        let attribute = strip_parenthesised(cell(row, "Attribute"));
        if attribute.is_empty() {
            return None;
        }
        let (min, max) = parse_range(cell(row, "Score_Range"))?;
        Some(Self {
            category: cell(row, "Category").to_string(),
            attribute,
            min,
            max,
            description: cell(row, "Description_CN").to_string(),
        })
    }
}

/// `"传球 (Passing)"` → `"传球"`; only the first parenthesised group goes.
pub fn strip_parenthesised(text: &str) -> String {
    match (text.find('('), text.find(')')) {
        (Some(open), Some(close)) if close > open => {
            let mut out = String::with_capacity(text.len());
            out.push_str(text[..open].trim_end());
            out.push_str(&text[close + 1..]);
            out.trim().to_string()
        }
        _ => text.trim().to_string(),
    }
}

/// First `min-max` digit pair in `text` (`"60-68 (业余初学)"` → (60, 68)).
pub fn parse_range(text: &str) -> Option<(u32, u32)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'-' {
                let dash = i;
                let mut j = dash + 1;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                if j > dash + 1 {
                    let min = text[start..dash].parse().ok()?;
                    let max = text[dash + 1..j].parse().ok()?;
                    return Some((min, max));
                }
            }
        } else {
            i += 1;
        }
    }
    None
}
