//! Configuration for the optic-restore binary.
//!
//! Three subcommands, each with its own argument set:
//!
//! - `work` - run the restoration worker against the in-process mock store
//! - `tile` - partition a local image file and print (or write) its tiles
//! - `report` - aggregate exported benchmark records into a JSON report
//!
//! All options can also be set via environment variables with the `RESTORE_`
//! prefix, e.g. `RESTORE_TILE_SIZE=512`.

use clap::{Args, Parser, Subcommand};

use crate::tile::{TilingConfig, DEFAULT_OVERLAP, DEFAULT_TILE_SIZE};
use crate::worker::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_WORKERS};

/// Default seconds between polls when the worker queue is empty.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default number of fabricated demo jobs seeded into the mock store.
pub const DEFAULT_DEMO_JOBS: usize = 4;

// =============================================================================
// CLI
// =============================================================================

/// Optic Restore - worker pipeline for optical image restoration jobs.
#[derive(Parser, Debug, Clone)]
#[command(name = "optic-restore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the restoration worker over fabricated demo jobs.
    Work(WorkConfig),

    /// Partition a local image into overlapping tiles.
    Tile(TileConfig),

    /// Aggregate exported benchmark records into a JSON report.
    Report(ReportConfig),
}

// =============================================================================
// Work
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct WorkConfig {
    /// Jobs to claim per batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, env = "RESTORE_BATCH_SIZE")]
    pub batch_size: usize,

    /// Jobs processed concurrently within a batch.
    #[arg(long, default_value_t = DEFAULT_MAX_WORKERS, env = "RESTORE_MAX_WORKERS")]
    pub max_workers: usize,

    /// Tile edge length in pixels for oversized inputs.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "RESTORE_TILE_SIZE")]
    pub tile_size: u32,

    /// Overlap margin between adjacent tiles, in pixels.
    #[arg(long, default_value_t = DEFAULT_OVERLAP, env = "RESTORE_OVERLAP")]
    pub overlap: u32,

    /// Maximum pixel area restored in a single pass; larger inputs are tiled.
    #[arg(long, default_value_t = TilingConfig::DEFAULT_AREA_LIMIT, env = "RESTORE_AREA_LIMIT")]
    pub area_limit: u64,

    /// Number of fabricated demo jobs to seed into the mock store.
    #[arg(long, default_value_t = DEFAULT_DEMO_JOBS, env = "RESTORE_DEMO_JOBS")]
    pub demo_jobs: usize,

    /// Keep polling for work instead of exiting after the queue drains.
    #[arg(long = "loop", default_value_t = false)]
    pub loop_forever: bool,

    /// Seconds between polls when the queue is empty.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS, env = "RESTORE_POLL_INTERVAL")]
    pub poll_interval: u64,

    /// Write the raw benchmark records to this JSON file after the queue
    /// drains.
    #[arg(long, env = "RESTORE_EXPORT_BENCHMARKS")]
    pub export_benchmarks: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl WorkConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if self.max_workers == 0 {
            return Err("max_workers must be greater than 0".to_string());
        }
        validate_tiling(self.tile_size, self.overlap)?;
        if self.area_limit == 0 {
            return Err("area_limit must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Tile geometry as a [`TilingConfig`].
    pub fn tiling(&self) -> TilingConfig {
        TilingConfig::new(self.tile_size, self.overlap)
    }
}

// =============================================================================
// Tile
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct TileConfig {
    /// Path of the image file to partition.
    pub input: String,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "RESTORE_TILE_SIZE")]
    pub tile_size: u32,

    /// Overlap margin between adjacent tiles, in pixels.
    #[arg(long, default_value_t = DEFAULT_OVERLAP, env = "RESTORE_OVERLAP")]
    pub overlap: u32,

    /// Directory to write the tile PNGs into. When absent, only the grid is
    /// printed.
    #[arg(long)]
    pub out: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl TileConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("input image path is required".to_string());
        }
        validate_tiling(self.tile_size, self.overlap)
    }

    pub fn tiling(&self) -> TilingConfig {
        TilingConfig::new(self.tile_size, self.overlap)
    }
}

// =============================================================================
// Report
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ReportConfig {
    /// JSON file of exported benchmark records (see `work --export-benchmarks`).
    pub input: String,

    /// Path of the aggregated report to write.
    #[arg(long, default_value = "benchmark_report.json", env = "RESTORE_REPORT_OUTPUT")]
    pub output: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("input records file is required".to_string());
        }
        if self.output.is_empty() {
            return Err("output path is required".to_string());
        }
        Ok(())
    }
}

fn validate_tiling(tile_size: u32, overlap: u32) -> Result<(), String> {
    if tile_size == 0 {
        return Err("tile_size must be greater than 0".to_string());
    }
    if overlap >= tile_size {
        return Err(format!(
            "overlap ({overlap}) must be smaller than tile_size ({tile_size})"
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
