//! Data loading: JSON snapshots, the legacy CSV archive, and a TTL cache.

pub mod archive;
pub mod cache;
pub mod snapshot;

pub use archive::{load_archive_dir, Archive, ArchiveReport, ParseStats};
pub use cache::SnapshotCache;
pub use snapshot::{load_snapshot_dir, parse_collection, ClubSnapshot};
