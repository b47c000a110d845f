//! JSON snapshot directory loader.
//!
//! Layout written by the export script:
//! `users.json`, `events.json`, `goal_records.json` (required),
//! `metadata.json` (optional). The export script also writes
//! `evaluations.json`; peer evaluations already live on the user documents,
//! so that file is not read.

use crate::error::{ClubError, Result};
use crate::models::{RawEvent, RawGoalRecord, RawUser, SnapshotMetadata};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const USERS_FILE: &str = "users.json";
pub const EVENTS_FILE: &str = "events.json";
pub const GOAL_RECORDS_FILE: &str = "goal_records.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Everything read from one snapshot directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubSnapshot {
    pub users: Vec<RawUser>,
    pub events: Vec<RawEvent>,
    pub goal_records: Vec<RawGoalRecord>,
    #[serde(default)]
    pub metadata: Option<SnapshotMetadata>,
}

impl ClubSnapshot {
    /// Record count per collection.
    pub fn record_counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        counts.insert("users".to_string(), self.users.len() as u64);
        counts.insert("events".to_string(), self.events.len() as u64);
        counts.insert("goal_records".to_string(), self.goal_records.len() as u64);
        counts
    }
}

/// Decode a collection array. Items that are JSON-encoded strings are
/// decoded first; items that still fail are skipped with a warning.
pub fn parse_collection<T: DeserializeOwned>(json: &str, context: &str) -> Result<Vec<T>> {
    let items: Vec<Value> = serde_json::from_str(json).map_err(|e| ClubError::json(context, e))?;
    let total = items.len();

    let mut out = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        let item = match item {
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!(context, index, error = %e, "skipping undecodable string item");
                    continue;
                }
            },
            other => other,
        };

        match serde_json::from_value::<T>(item) {
            Ok(record) => out.push(record),
            Err(e) => warn!(context, index, error = %e, "skipping malformed record"),
        }
    }

    if out.len() < total {
        debug!(context, total, kept = out.len(), "collection parsed with skips");
    }
    Ok(out)
}

fn read_required<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    let json = fs::read_to_string(&path).map_err(|e| ClubError::io(&path, e))?;
    parse_collection(&json, file)
}

pub fn load_metadata(dir: &Path) -> Result<Option<SnapshotMetadata>> {
    let path = dir.join(METADATA_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(&path).map_err(|e| ClubError::io(&path, e))?;
    let metadata = serde_json::from_str(&json).map_err(|e| ClubError::json(METADATA_FILE, e))?;
    Ok(Some(metadata))
}

pub fn load_snapshot_dir(dir: &Path) -> Result<ClubSnapshot> {
    let snapshot = ClubSnapshot {
        users: read_required(dir, USERS_FILE)?,
        events: read_required(dir, EVENTS_FILE)?,
        goal_records: read_required(dir, GOAL_RECORDS_FILE)?,
        metadata: load_metadata(dir)?,
    };

    info!(
        dir = %dir.display(),
        users = snapshot.users.len(),
        events = snapshot.events.len(),
        goal_records = snapshot.goal_records.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_string_encoded_items_are_decoded() {
        let json = r#"[
            "{\"_id\": \"u1\", \"nickname\": \"阿杰\"}",
            {"_id": "u2", "real_name": "王五"},
            "not json at all"
        ]"#;
        let users: Vec<RawUser> = parse_collection(json, "users.json").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].nickname.as_deref(), Some("阿杰"));
        assert_eq!(users[1].real_name.as_deref(), Some("王五"));
    }

    #[test]
    fn test_non_array_is_json_error() {
        let err = parse_collection::<RawUser>(r#"{"users": []}"#, "users.json").unwrap_err();
        assert_eq!(err.code(), "JSON_ERROR");
    }

    #[test]
    fn test_load_snapshot_dir() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), USERS_FILE, r#"[{"_id": "u1", "nickname": "A"}]"#);
        write(dir.path(), EVENTS_FILE, r#"[{"_id": "e1", "opponent": "B"}]"#);
        write(dir.path(), GOAL_RECORDS_FILE, "[]");
        write(dir.path(), "evaluations.json", r#"[{"_id": "ev1"}]"#);
        write(
            dir.path(),
            METADATA_FILE,
            r#"{"lastUpdated": "2025-10-01T00:00:00Z", "collections": {"users": 1}}"#,
        );

        let snapshot = load_snapshot_dir(dir.path()).unwrap();
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.events.len(), 1);
        assert!(!snapshot.record_counts().contains_key("evaluations"));
        assert!(snapshot.metadata.is_some());
        assert_eq!(snapshot.record_counts().get("events"), Some(&1));
    }

    #[test]
    fn test_missing_required_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), USERS_FILE, "[]");
        let err = load_snapshot_dir(dir.path()).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
        assert!(err.to_string().contains(EVENTS_FILE));
    }
}
