//! Legacy CSV archive loader.
//!
//! Each file is read into header → value rows and then mapped onto the
//! typed rows in `models::archive`. Rows that cannot be read or lack their
//! identifying column are counted as failed and skipped.

use crate::error::{ClubError, Result};
use crate::models::archive::Row;
use crate::models::{
    ActivityRow, AttributeBandRow, GoalkeeperRow, MatchEventRow, MemberRow, ParticipantRow,
    TrainingRow,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub const MEMBERS_FILE: &str = "2025member.csv";
pub const ACTIVITIES_FILE: &str = "activities.csv";
pub const MATCH_EVENTS_FILE: &str = "match_events.csv";
pub const PARTICIPANTS_FILE: &str = "match_participants.csv";
pub const TRAINING_FILE: &str = "training_attendance.csv";
pub const GOALKEEPERS_FILE: &str = "goalkeepers.csv";
pub const ATTRIBUTES_FILE: &str = "football_attributes.csv";

/// Per-file parse statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

impl ParseStats {
    fn new() -> Self {
        Self { total_rows: 0, parsed: 0, failed: 0 }
    }
}

/// The whole archive, typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    pub members: Vec<MemberRow>,
    pub goalkeepers: Vec<GoalkeeperRow>,
    pub activities: Vec<ActivityRow>,
    pub events: Vec<MatchEventRow>,
    pub participants: Vec<ParticipantRow>,
    pub trainings: Vec<TrainingRow>,
    pub attributes: Vec<AttributeBandRow>,
}

impl Archive {
    pub fn member(&self, name: &str) -> Option<&MemberRow> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn goalkeeper(&self, name: &str) -> Option<&GoalkeeperRow> {
        self.goalkeepers.iter().find(|g| g.name == name)
    }

    pub fn activity(&self, id: &str) -> Option<&ActivityRow> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn events_for(&self, activity_id: &str) -> impl Iterator<Item = &MatchEventRow> + '_ {
        let id = activity_id.to_string();
        self.events.iter().filter(move |e| e.activity_id == id)
    }

    pub fn participants_for(
        &self,
        activity_id: &str,
    ) -> impl Iterator<Item = &ParticipantRow> + '_ {
        let id = activity_id.to_string();
        self.participants.iter().filter(move |p| p.activity_id == id)
    }
}

/// Parse statistics keyed by file name.
pub type ArchiveReport = BTreeMap<String, ParseStats>;

/// Read a CSV file into header → value rows.
pub fn read_rows(path: &Path) -> Result<(Vec<Row>, u32)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| ClubError::Csv { path: path.to_path_buf(), source: e })?;

    let headers = reader
        .headers()
        .map_err(|e| ClubError::Csv { path: path.to_path_buf(), source: e })?
        .clone();

    let mut rows = Vec::new();
    let mut unreadable = 0u32;
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                let row: Row = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.trim_start_matches('\u{feff}').to_string(), v.to_string()))
                    .collect();
                rows.push(row);
            }
            Err(e) => {
                unreadable += 1;
                warn!(path = %path.display(), line = line + 2, error = %e, "unreadable CSV record");
            }
        }
    }
    Ok((rows, unreadable))
}

fn load_file<T>(
    dir: &Path,
    file: &str,
    required: bool,
    report: &mut ArchiveReport,
    map: fn(&Row) -> Option<T>,
) -> Result<Vec<T>> {
    let path = dir.join(file);
    if !path.exists() {
        if required {
            return Err(ClubError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "archive file missing"),
            ));
        }
        debug!(file, "optional archive file not present");
        return Ok(Vec::new());
    }

    let (rows, unreadable) = read_rows(&path)?;
    let mut stats = ParseStats::new();
    stats.total_rows = rows.len() as u32 + unreadable;
    stats.failed = unreadable;

    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        match map(row) {
            Some(record) => {
                stats.parsed += 1;
                out.push(record);
            }
            None => stats.failed += 1,
        }
    }

    if stats.failed > 0 {
        warn!(file, failed = stats.failed, total = stats.total_rows, "archive rows skipped");
    }
    report.insert(file.to_string(), stats);
    Ok(out)
}

pub fn load_archive_dir(dir: &Path) -> Result<(Archive, ArchiveReport)> {
    let mut report = ArchiveReport::new();

    let archive = Archive {
        members: load_file(dir, MEMBERS_FILE, true, &mut report, MemberRow::from_row)?,
        activities: load_file(dir, ACTIVITIES_FILE, true, &mut report, ActivityRow::from_row)?,
        events: load_file(dir, MATCH_EVENTS_FILE, true, &mut report, MatchEventRow::from_row)?,
        participants: load_file(
            dir,
            PARTICIPANTS_FILE,
            true,
            &mut report,
            ParticipantRow::from_row,
        )?,
        trainings: load_file(dir, TRAINING_FILE, true, &mut report, TrainingRow::from_row)?,
        goalkeepers: load_file(dir, GOALKEEPERS_FILE, false, &mut report, GoalkeeperRow::from_row)?,
        attributes: load_file(
            dir,
            ATTRIBUTES_FILE,
            false,
            &mut report,
            AttributeBandRow::from_row,
        )?,
    };

    info!(
        dir = %dir.display(),
        members = archive.members.len(),
        activities = archive.activities.len(),
        events = archive.events.len(),
        "archive loaded"
    );
    Ok((archive, report))
}
