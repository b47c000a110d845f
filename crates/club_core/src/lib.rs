//! # club_core - Football club statistics core
//!
//! Loads the club's exported data (JSON snapshots of the document store and
//! the legacy CSV archive) and derives everything the fan site shows.
//!
//! ## Features
//! - Lenient decoding of loosely typed snapshot documents
//! - Leaderboards, club record, match listings and per-player aggregates
//! - Player profiles, radar charts and attribute band descriptions
//! - Deterministic lineup reconstruction for archived matches
//! - JSON API envelope for every view

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Complex types are sometimes necessary for generic APIs
#![allow(clippy::type_complexity)]

pub mod adapter;
pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod lineup;
pub mod models;
pub mod player;
pub mod stats;

pub use adapter::{build_view, ClubView};
pub use api::{ApiError, ApiResponse, ErrorDetails, API_VERSION};
pub use config::ClubConfig;
pub use data::{load_archive_dir, load_snapshot_dir, Archive, ClubSnapshot, SnapshotCache};
pub use error::{ClubError, Result};

/// Crate version, reported by the CLI and stamped into bundles.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
