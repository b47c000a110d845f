//! Raw documents as exported from the cloud document store.
//!
//! Exports are loosely typed: numeric fields arrive as numbers, numeric
//! strings or null, and timestamps as ISO strings, epoch milliseconds or
//! `{"$date": ...}` wrappers. Everything here deserializes leniently and
//! leaves interpretation to the adapter.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deserializers for loosely typed fields.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Bool(bool),
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    fn loose<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Loose>, D::Error> {
        Option::<Loose>::deserialize(d)
    }

    pub fn f64_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match loose(d)? {
            Some(Loose::Number(n)) if n.is_finite() => Some(n),
            Some(Loose::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        })
    }

    pub fn u32_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(f64_opt(d)?.filter(|n| *n >= 0.0 && *n <= u32::MAX as f64).map(|n| n as u32))
    }

    pub fn string_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match loose(d)? {
            Some(Loose::Text(s)) => Some(s),
            Some(Loose::Number(n)) if n.fract() == 0.0 => Some(format!("{}", n as i64)),
            Some(Loose::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(string_opt(d)?.unwrap_or_default())
    }

    pub fn bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match loose(d)? {
            Some(Loose::Bool(b)) => b,
            Some(Loose::Number(n)) => n != 0.0,
            Some(Loose::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }
}

/// A timestamp in any of the shapes the export produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(f64),
    Text(String),
    Wrapped {
        #[serde(rename = "$date")]
        date: Box<RawTimestamp>,
    },
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

impl RawTimestamp {
    /// Resolve to an instant. Zone-less text is read as local time in `offset`.
    pub fn to_utc(&self, offset: FixedOffset) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => millis_to_utc(*ms),
            RawTimestamp::Wrapped { date } => date.to_utc(offset),
            RawTimestamp::Text(text) => parse_text(text.trim(), offset),
        }
    }

    /// The stored form as text; epoch values render as RFC 3339.
    pub fn raw_text(&self) -> String {
        match self {
            RawTimestamp::Text(text) => text.clone(),
            RawTimestamp::Wrapped { date } => date.raw_text(),
            RawTimestamp::Millis(ms) => millis_to_utc(*ms)
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default(),
        }
    }
}

fn millis_to_utc(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(ms as i64).single()
}

fn parse_text(text: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return local_to_utc(naive, offset);
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return local_to_utc(date.and_hms_opt(0, 0, 0)?, offset);
        }
    }
    text.parse::<f64>().ok().and_then(millis_to_utc)
}

fn local_to_utc(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset.from_local_datetime(&naive).single().map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvaluationTag {
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub icon: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvaluator {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
}

/// Aggregated teammate tag embedded in a user document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTeammateEvaluation {
    #[serde(default)]
    pub tag: RawEvaluationTag,
    #[serde(default, deserialize_with = "lenient::u32_opt")]
    pub count: Option<u32>,
    #[serde(default)]
    pub evaluators: Vec<RawEvaluator>,
}

/// `users` collection document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub real_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::u32_opt")]
    pub current_jersey_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub current_squad: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub bio: Option<String>,
    #[serde(default)]
    pub positions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub preferred_foot: Option<String>,
    #[serde(default, deserialize_with = "lenient::u32_opt")]
    pub height_cm: Option<u32>,
    #[serde(default, deserialize_with = "lenient::u32_opt")]
    pub weight_kg: Option<u32>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub player_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub avatar_url: Option<String>,
    /// Per-skill scores plus an optional `_meta` object
    #[serde(default)]
    pub skill_ratings: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub self_skill_ratings: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub teammate_evaluations: Option<Vec<RawTeammateEvaluation>>,
}

/// `events` collection document (one fixture).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub opponent: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub activity_category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub field_size: Option<String>,
    #[serde(default)]
    pub start_time: Option<RawTimestamp>,
    #[serde(default)]
    pub end_time: Option<RawTimestamp>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub competition_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGoal {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub scorer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub assister_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::u32_opt")]
    pub minute: Option<u32>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_own_goal: bool,
}

/// `goal_records` collection document: the goals of one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGoalRecord {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub event_id: String,
    #[serde(default)]
    pub goals: Vec<RawGoal>,
}

/// `metadata.json` written next to the exported collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub collections: BTreeMap<String, u64>,
}
