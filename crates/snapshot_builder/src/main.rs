//! Snapshot Builder CLI
//!
//! Packs a snapshot directory into a MessagePack+LZ4 bundle and checks bundles.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "snapshot_builder")]
#[command(about = "Build and verify club snapshot bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build a bundle from a snapshot directory
    Build {
        /// Snapshot directory (users.json, events.json, goal_records.json, ...)
        #[arg(long)]
        data_dir: PathBuf,

        /// Output MsgPack+LZ4 file path
        #[arg(long)]
        out: PathBuf,

        /// Schema version (e.g., "v1")
        #[arg(long, default_value = "v1")]
        schema_version: String,

        /// Verify bundle after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Check a bundle against a checksum
    Verify {
        /// Bundle file path
        #[arg(long)]
        bundle: PathBuf,

        /// Expected SHA256 checksum (hex)
        #[arg(long)]
        checksum: String,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { data_dir, out, schema_version, verify, metadata } => {
            println!("🔨 Building snapshot bundle...");
            println!("   Data:   {}", data_dir.display());
            println!("   Output: {}", out.display());
            println!("   Schema: {}", schema_version);

            let meta = snapshot_builder::build_bundle(&data_dir, &out, &schema_version)?;

            print_metadata(&meta);

            if verify {
                verify_bundle_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Verify { bundle, checksum } => {
            verify_bundle_integrity(&bundle, &checksum)?;
            let snapshot = snapshot_builder::load_bundle(&bundle)?;
            for (collection, count) in snapshot.record_counts() {
                println!("   {:<14} {}", collection, count);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &snapshot_builder::BundleMetadata) {
    println!("\n✅ Bundle built successfully!");
    println!(
        "   Original size:   {} bytes ({:.2} KB)",
        meta.original_size,
        meta.original_size as f64 / 1024.0
    );
    println!(
        "   Compressed size: {} bytes ({:.2} KB)",
        meta.compressed_size,
        meta.compressed_size as f64 / 1024.0
    );
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
    for (collection, count) in &meta.record_counts {
        println!("   {:<16} {}", format!("{}:", collection), count);
    }
}

#[cfg(feature = "cli")]
fn verify_bundle_integrity(bundle_path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying bundle integrity...");
    let is_valid = snapshot_builder::verify_bundle(bundle_path, checksum)?;

    if is_valid {
        println!("✅ Bundle verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ Bundle verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata(path: &Path, meta: &snapshot_builder::BundleMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\n📄 Metadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("snapshot_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
