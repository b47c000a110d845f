//! Club CLI
//!
//! Prints every site view as a pretty JSON envelope. Snapshot views read the
//! data directory (or a bundle); archive views need `--archive-dir`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use club_core::api;
use club_core::config::{resolve_archive_dir, resolve_data_dir};
use club_core::models::MatchKind;
use club_core::player::{AttributeCatalog, RosterFilter, RosterQuery};
use club_core::stats::MatchFilter;
use club_core::{
    build_view, load_archive_dir, load_snapshot_dir, Archive, ClubConfig, ClubView, SnapshotCache,
};
use club_core::{ApiResponse, ClubSnapshot};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "club")]
#[command(about = "Club statistics views as JSON", version = club_core::VERSION)]
struct Cli {
    /// Snapshot directory (default: $CLUB_DATA_DIR or client/public/data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Legacy CSV archive directory (default: $CLUB_ARCHIVE_DIR)
    #[arg(long, global = true)]
    archive_dir: Option<PathBuf>,

    /// Read the snapshot from a MsgPack+LZ4 bundle instead of the data directory
    #[arg(long, global = true)]
    bundle: Option<PathBuf>,

    /// Config YAML (default: $CLUB_CONFIG_PATH or the embedded config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Home page summary
    Home,

    /// Roster list
    Players {
        /// Match on name, number or position
        #[arg(long)]
        search: Option<String>,

        /// all | competitive | recreational | has_photo
        #[arg(long, default_value = "all")]
        filter: String,
    },

    /// Player profile page
    Player { id: String },

    /// Player radar chart
    Radar { id: String },

    /// Match listing
    Matches {
        #[arg(long)]
        year: Option<i32>,

        /// competitive | friendly
        #[arg(long)]
        kind: Option<String>,
    },

    /// Match detail
    Match { id: String },

    /// goals | assists | value
    Leaderboard { board: String },

    /// Archive: match and training stats of a member
    Stats { name: String },

    /// Archive: member profile with ratings and market value
    Profile { name: String },

    /// Archive: goal and assist timeline of a member
    Events { name: String },

    /// Archive: assist partners of a member
    Network { name: String },

    /// Archive: official matches with goals and squad sizes
    History,

    /// Archive: reconstructed lineup of an official match
    Lineup { activity_id: String },

    /// Archive: attribute band description
    Describe { attribute: String, score: f64 },

    /// 4-3-3 squad board of photographed players
    Board,

    /// Write every snapshot view as static JSON files
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

/// Snapshot of the data directory, shared by every view rendered in this process.
/// The data directory is fixed per invocation, so one cache suffices.
static SNAPSHOT_CACHE: OnceCell<SnapshotCache<ClubSnapshot>> = OnceCell::new();

#[derive(Debug, Serialize)]
struct ExportSummary {
    out: String,
    files: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn cached_snapshot(dir: &Path, ttl_secs: u64) -> Result<Arc<ClubSnapshot>> {
    let cache = SNAPSHOT_CACHE.get_or_init(|| SnapshotCache::new(Duration::from_secs(ttl_secs)));
    cache
        .get_or_load(|| load_snapshot_dir(dir))
        .with_context(|| format!("Failed to load snapshot: {}", dir.display()))
}

fn load_view(cli: &Cli, config: &ClubConfig) -> Result<ClubView> {
    let snapshot = match &cli.bundle {
        Some(bundle) => Arc::new(snapshot_builder::load_bundle(bundle)?),
        None => {
            cached_snapshot(&resolve_data_dir(cli.data_dir.as_deref()), config.cache_ttl_secs)?
        }
    };
    Ok(build_view(&snapshot, config))
}

fn write_page(out: &Path, rel: &str, json: &str, files: &mut Vec<String>) -> Result<()> {
    let path = out.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, json).with_context(|| format!("Failed to write: {}", path.display()))?;
    files.push(rel.to_string());
    Ok(())
}

/// Static site export. Each page group re-reads the view through the snapshot cache.
fn export_site(cli: &Cli, config: &ClubConfig, out: &Path) -> Result<String> {
    let mut files = Vec::new();

    let view = load_view(cli, config)?;
    write_page(out, "home.json", &api::home_json(&view, config), &mut files)?;
    write_page(
        out,
        "players.json",
        &api::players_json(&view, &RosterQuery::default(), config),
        &mut files,
    )?;
    write_page(out, "matches.json", &api::matches_json(&view, MatchFilter::default()), &mut files)?;
    write_page(out, "board.json", &api::squad_board_json(&view, config), &mut files)?;
    for board in ["goals", "assists", "value"] {
        let json = api::leaderboard_json(&view, board, config);
        write_page(out, &format!("leaderboard/{board}.json"), &json, &mut files)?;
    }

    let view = load_view(cli, config)?;
    for player in &view.players {
        let json = api::player_json(&view, &player.id, config);
        write_page(out, &format!("players/{}.json", player.id), &json, &mut files)?;
        let json = api::player_radar_json(&view, &player.id);
        write_page(out, &format!("radar/{}.json", player.id), &json, &mut files)?;
    }

    let view = load_view(cli, config)?;
    for m in &view.matches {
        let json = api::match_json(&view, &m.id);
        write_page(out, &format!("matches/{}.json", m.id), &json, &mut files)?;
    }

    info!(out = %out.display(), files = files.len(), "site exported");
    let summary = ExportSummary { out: out.display().to_string(), files };
    Ok(serde_json::to_string(&ApiResponse::success(summary))?)
}

fn load_archive(cli: &Cli) -> Result<Archive> {
    let dir = resolve_archive_dir(cli.archive_dir.as_deref())
        .context("Archive directory not set (use --archive-dir or CLUB_ARCHIVE_DIR)")?;
    let (archive, report) = load_archive_dir(&dir)
        .with_context(|| format!("Failed to load archive: {}", dir.display()))?;
    for (file, stats) in &report {
        debug!(file = %file, rows = stats.total_rows, failed = stats.failed, "archive file");
    }
    Ok(archive)
}

fn parse_filter(filter: &str) -> Result<RosterFilter> {
    filter.parse::<RosterFilter>().map_err(anyhow::Error::from)
}

fn run(cli: &Cli) -> Result<String> {
    let config = ClubConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    info!(club = %config.club_name, "config loaded");

    let json = match &cli.command {
        Commands::Home => api::home_json(&load_view(cli, &config)?, &config),
        Commands::Players { search, filter } => {
            let query = RosterQuery { search: search.clone(), filter: parse_filter(filter)? };
            api::players_json(&load_view(cli, &config)?, &query, &config)
        }
        Commands::Player { id } => api::player_json(&load_view(cli, &config)?, id, &config),
        Commands::Radar { id } => api::player_radar_json(&load_view(cli, &config)?, id),
        Commands::Matches { year, kind } => {
            let kind = kind.as_deref().map(str::parse::<MatchKind>).transpose()?;
            api::matches_json(&load_view(cli, &config)?, MatchFilter { year: *year, kind })
        }
        Commands::Match { id } => api::match_json(&load_view(cli, &config)?, id),
        Commands::Leaderboard { board } => {
            api::leaderboard_json(&load_view(cli, &config)?, board, &config)
        }
        Commands::Stats { name } => api::player_stats_json(&load_archive(cli)?, name),
        Commands::Profile { name } => api::player_profile_json(&load_archive(cli)?, name),
        Commands::Events { name } => api::player_events_json(&load_archive(cli)?, name),
        Commands::Network { name } => api::player_network_json(&load_archive(cli)?, name),
        Commands::History => api::archive_matches_json(&load_archive(cli)?),
        Commands::Lineup { activity_id } => {
            api::match_lineup_json(&load_archive(cli)?, activity_id)
        }
        Commands::Describe { attribute, score } => {
            let archive = load_archive(cli)?;
            let catalog = AttributeCatalog::from_rows(&archive.attributes);
            let request = serde_json::json!({ "attribute": attribute, "score": score });
            api::attribute_description_json(&request.to_string(), &catalog)
        }
        Commands::Board => api::squad_board_json(&load_view(cli, &config)?, &config),
        Commands::Export { out } => export_site(cli, &config, out)?,
    };

    Ok(json)
}

/// Pretty-print the envelope; returns whether it reports success.
fn print_envelope(json: &str) -> Result<bool> {
    let value: serde_json::Value = serde_json::from_str(json).context("Malformed envelope")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(value.get("success").and_then(serde_json::Value::as_bool).unwrap_or(false))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).and_then(|json| print_envelope(&json)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "club",
            "players",
            "--search",
            "张",
            "--data-dir",
            "/tmp/data",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir.as_deref(), Some(Path::new("/tmp/data")));
        match cli.command {
            Commands::Players { search, filter } => {
                assert_eq!(search.as_deref(), Some("张"));
                assert_eq!(filter, "all");
            }
            _ => panic!("expected players"),
        }
    }

    #[test]
    fn test_describe_args() {
        let cli = Cli::try_parse_from(["club", "describe", "传球", "75"]).unwrap();
        assert!(matches!(cli.command, Commands::Describe { ref attribute, score }
            if attribute == "传球" && score == 75.0));
    }

    #[test]
    fn test_print_envelope_reports_failure() {
        assert!(!print_envelope(r#"{"success": false, "data": null}"#).unwrap());
        assert!(print_envelope(r#"{"success": true, "data": 1}"#).unwrap());
        assert!(print_envelope("not json").is_err());
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        assert!(parse_filter("goalies").is_err());
        assert_eq!(parse_filter("has_photo").unwrap(), RosterFilter::HasPhoto);
    }

    #[test]
    fn test_export_reuses_cached_snapshot() {
        let data = TempDir::new().unwrap();
        fs::write(
            data.path().join("users.json"),
            r#"[{"_id": "u1", "nickname": "阿杰", "current_jersey_number": 7}]"#,
        )
        .unwrap();
        fs::write(data.path().join("events.json"), r#"[{"_id": "e1", "opponent": "雷霆队"}]"#)
            .unwrap();
        fs::write(data.path().join("goal_records.json"), "[]").unwrap();
        let out = TempDir::new().unwrap();

        let first = cached_snapshot(data.path(), 600).unwrap();
        let again = cached_snapshot(data.path(), 600).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        let data_dir = data.path().to_str().unwrap();
        let out_dir = out.path().to_str().unwrap();
        let cli =
            Cli::try_parse_from(["club", "--data-dir", data_dir, "export", "--out", out_dir])
                .unwrap();
        let summary: serde_json::Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();

        assert_eq!(summary["success"], true);
        assert!(out.path().join("home.json").exists());
        assert!(out.path().join("leaderboard/value.json").exists());
        assert!(out.path().join("players/u1.json").exists());
        assert!(out.path().join("matches/e1.json").exists());

        let player: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.path().join("players/u1.json")).unwrap())
                .unwrap();
        assert_eq!(player["data"]["player"]["name"], "阿杰");
    }
}
