//! Snapshot Builder Library
//!
//! Snapshot directory (JSON collections) → MessagePack → LZ4 → SHA256 checksum.
//! The bundle is a single file the site can fetch instead of five JSON files.

use anyhow::{Context, Result};
use club_core::{load_snapshot_dir, ClubSnapshot};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Bundle metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Schema version (e.g. "v1")
    pub schema_version: String,
    /// SHA256 of the compressed bytes (hex)
    pub checksum: String,
    /// Creation time (RFC3339)
    pub created_at: String,
    /// Size of the snapshot as compact JSON (bytes)
    pub original_size: u64,
    /// Size of the bundle file (bytes)
    pub compressed_size: u64,
    /// compressed / original
    pub compression_ratio: f64,
    /// Records per collection
    pub record_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub builder_version: Option<String>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Pack a snapshot directory into a MessagePack+LZ4 bundle.
///
/// # Arguments
///
/// * `data_dir` - directory holding `users.json`, `events.json`, ...
/// * `output_bundle` - bundle file to write
/// * `schema_version` - schema version string
///
/// # Returns
///
/// Metadata of the written bundle
pub fn build_bundle(
    data_dir: &Path,
    output_bundle: &Path,
    schema_version: &str,
) -> Result<BundleMetadata> {
    // 1. Decode the snapshot (lenient, same path the site uses)
    let snapshot = load_snapshot_dir(data_dir)
        .with_context(|| format!("Failed to load snapshot directory: {}", data_dir.display()))?;

    // 2. Normalized snapshot → serde_json::Value
    let value = serde_json::to_value(&snapshot).context("Failed to convert snapshot to JSON")?;
    let original_size = serde_json::to_vec(&value).context("Failed to serialize JSON")?.len() as u64;

    // 3. MessagePack
    let msgpack_bytes = rmp_serde::to_vec(&value).context("Failed to serialize to MessagePack")?;

    // 4. LZ4 (size prefixed)
    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;

    // 5. Checksum
    let checksum = sha256_hex(&compressed);

    // 6. Write
    if let Some(parent) = output_bundle.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    fs::write(output_bundle, &compressed)
        .with_context(|| format!("Failed to write bundle: {}", output_bundle.display()))?;

    // 7. Metadata
    let compression_ratio = if original_size == 0 {
        0.0
    } else {
        compressed_size as f64 / original_size as f64
    };

    Ok(BundleMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio,
        record_counts: snapshot.record_counts(),
        builder_version: Some(club_core::VERSION.to_string()),
    })
}

/// Check a bundle file against an expected SHA256 checksum.
pub fn verify_bundle(bundle_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(bundle_file)
        .with_context(|| format!("Failed to read bundle: {}", bundle_file.display()))?;

    Ok(sha256_hex(&bytes).eq_ignore_ascii_case(expected_checksum.trim()))
}

/// Decompress and decode a bundle back into a snapshot.
pub fn load_bundle(bundle_file: &Path) -> Result<ClubSnapshot> {
    let compressed = fs::read(bundle_file)
        .with_context(|| format!("Failed to read bundle: {}", bundle_file.display()))?;

    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;

    let value: serde_json::Value =
        rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize MessagePack")?;

    serde_json::from_value(value).context("Bundle does not hold a club snapshot")
}
