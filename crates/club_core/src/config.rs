//! Site configuration
//!
//! The default configuration is embedded with `include_str!`, so the CLI and
//! the tests run without any file on disk. A YAML file can replace it.
//!
//! Resolution order:
//! 1) explicit path (CLI `--config`)
//! 2) `CLUB_CONFIG_PATH` if set
//! 3) embedded `data/club_config.yaml`

use crate::error::{ClubError, Result};
use chrono::{FixedOffset, Offset, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Env var overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "CLUB_CONFIG_PATH";

/// Env var overriding the JSON snapshot directory.
pub const DATA_DIR_ENV: &str = "CLUB_DATA_DIR";

/// Env var pointing at the legacy CSV archive directory.
pub const ARCHIVE_DIR_ENV: &str = "CLUB_ARCHIVE_DIR";

/// Snapshot directory used when nothing else is configured.
pub const DEFAULT_DATA_REL_PATH: &str = "client/public/data";

/// Embedded default configuration (YAML).
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../data/club_config.yaml");

static DEFAULT_CONFIG: Lazy<ClubConfig> = Lazy::new(|| {
    serde_yaml::from_str(DEFAULT_CONFIG_YAML).expect("embedded club_config.yaml must parse")
});

/// Fallbacks applied to roster entries with missing physical data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterDefaults {
    pub preferred_foot: String,
    pub height_cm: u16,
    pub weight_kg: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubConfig {
    /// Club name used in match titles
    pub club_name: String,
    pub default_opponent: String,
    pub default_venue: String,
    /// Placeholder for missing player / scorer names
    pub unknown_name: String,
    /// Offset used to turn match timestamps into calendar dates
    pub utc_offset_hours: i32,
    pub leaderboard_size: usize,
    pub recent_matches: usize,
    pub home_top_scorers: usize,
    pub squad_preview_size: usize,
    pub cache_ttl_secs: u64,
    pub roster_defaults: RosterDefaults,
    /// Jersey number → photo URL
    #[serde(default)]
    pub player_photos: BTreeMap<u32, String>,
}

impl Default for ClubConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl ClubConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClubConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ClubError::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Load using the resolution order described in the module docs.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config from explicit path");
            return Self::from_path(path);
        }

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                tracing::debug!(path = trimmed, "loading config from {}", CONFIG_PATH_ENV);
                return Self::from_path(Path::new(trimmed));
            }
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.leaderboard_size == 0 {
            return Err(ClubError::InvalidConfig("leaderboard_size must be > 0".to_string()));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ClubError::InvalidConfig(format!(
                "utc_offset_hours out of range: {}",
                self.utc_offset_hours
            )));
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> FixedOffset {
        // validate() keeps the offset within a range FixedOffset accepts
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn photo_for(&self, jersey_number: u32) -> Option<&str> {
        self.player_photos.get(&jersey_number).map(String::as_str)
    }
}

fn dir_from_env(name: &str) -> Option<PathBuf> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

/// Snapshot directory: explicit → `CLUB_DATA_DIR` → `client/public/data`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| dir_from_env(DATA_DIR_ENV))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_REL_PATH))
}

/// Archive directory: explicit → `CLUB_ARCHIVE_DIR`, otherwise none.
pub fn resolve_archive_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| dir_from_env(ARCHIVE_DIR_ENV))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_default_parses() {
        let config = ClubConfig::default();
        assert_eq!(config.club_name, "蔚来联队");
        assert_eq!(config.leaderboard_size, 20);
        assert_eq!(config.roster_defaults.height_cm, 175);
        assert!(config.photo_for(7).is_some());
        assert!(config.photo_for(1).is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_leaderboard() {
        let yaml = DEFAULT_CONFIG_YAML.replace("leaderboard_size: 20", "leaderboard_size: 0");
        let err = ClubConfig::from_yaml_str(&yaml).unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_rejects_bad_offset() {
        let yaml = DEFAULT_CONFIG_YAML.replace("utc_offset_hours: 8", "utc_offset_hours: 20");
        assert!(ClubConfig::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let yaml = DEFAULT_CONFIG_YAML.replace("club_name: 蔚来联队", "club_name: Test FC");
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = ClubConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.club_name, "Test FC");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ClubConfig::load(Some(Path::new("/nonexistent/club.yaml"))).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn test_explicit_dirs_win() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/snap")));
        assert_eq!(dir, PathBuf::from("/tmp/snap"));
        let archive = resolve_archive_dir(Some(Path::new("/tmp/archive")));
        assert_eq!(archive, Some(PathBuf::from("/tmp/archive")));
    }
}
