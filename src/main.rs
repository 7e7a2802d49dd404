//! Optic Restore - restoration worker and tiling tools.
//!
//! This binary drives the job pipeline against the in-process mock store and
//! exposes the tiling core as a small command-line tool.

use std::io::Cursor;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use optic_restore::{
    config::{Cli, Command, ReportConfig, TileConfig, WorkConfig},
    job::{model_catalog, BenchmarkRecord, NewJob},
    report::BenchmarkReport,
    store::{ImageStore, JobStore, MockStore},
    tile::{partition, tile_grid, TilingConfig},
    worker::{Worker, WorkerConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Work(config) => run_work(config).await,
        Command::Tile(config) => run_tile(config),
        Command::Report(config) => run_report(config),
    }
}

// =============================================================================
// Work Command
// =============================================================================

async fn run_work(config: WorkConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let store = Arc::new(MockStore::new());

    info!("Configuration:");
    info!("  batch size:  {}", config.batch_size);
    info!("  max workers: {}", config.max_workers);
    info!(
        "  tiling:      {}px tiles, {}px overlap, area limit {}",
        config.tile_size, config.overlap, config.area_limit
    );

    if let Err(e) = seed_demo_jobs(&*store, config.demo_jobs).await {
        error!("Failed to seed demo jobs: {}", e);
        return ExitCode::FAILURE;
    }

    let worker = Worker::new(
        Arc::clone(&store),
        WorkerConfig {
            batch_size: config.batch_size,
            max_workers: config.max_workers,
            tiling: config.tiling(),
            area_limit: config.area_limit,
        },
    );

    if config.loop_forever {
        let interval = Duration::from_secs(config.poll_interval);
        if let Err(e) = worker.run_loop(interval).await {
            error!("Worker loop failed: {}", e);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    // Drain the queue: keep claiming until a batch comes back empty.
    let mut completed = 0;
    let mut failed = 0;
    loop {
        match worker.run_once().await {
            Ok(outcome) if outcome.claimed == 0 => break,
            Ok(outcome) => {
                completed += outcome.completed;
                failed += outcome.failed;
            }
            Err(e) => {
                error!("Batch failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    info!("Queue drained: {} completed, {} failed", completed, failed);

    if let Some(path) = &config.export_benchmarks {
        match export_benchmarks(&*store, path).await {
            Ok(count) => info!("Exported {} benchmark record(s) to {}", count, path),
            Err(e) => {
                error!("Benchmark export failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Seed fabricated demo jobs into the mock store, cycling through the model
/// catalog. Every other job also carries a sharp original so benchmarks get
/// recorded.
async fn seed_demo_jobs(store: &MockStore, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = model_catalog();

    for i in 0..count {
        let blurred_path = format!("blurred/demo_{i:02}.png");
        store
            .upload(&blurred_path, demo_image(640, 480, i as u32)?, "image/png")
            .await?;

        let original_image_path = if i % 2 == 0 {
            // The original differs slightly from the input so PSNR stays
            // finite (identical images would benchmark as infinity, which
            // has no JSON representation in the export).
            let path = format!("originals/demo_{i:02}.png");
            store
                .upload(&path, demo_image(640, 480, i as u32 + 1)?, "image/png")
                .await?;
            Some(path)
        } else {
            None
        };

        let model_id = catalog[i % catalog.len()].id.to_string();
        let job = store
            .insert_job(NewJob {
                blurred_image_path: blurred_path,
                original_image_path,
                model_id,
                parameters: None,
            })
            .await?;
        info!("Seeded {} (model {})", job.id, job.model_id);
    }
    Ok(())
}

/// Synthetic gradient image standing in for an uploaded photograph.
fn demo_image(width: u32, height: u32, seed: u32) -> Result<Bytes, image::ImageError> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            ((x + seed * 31) % 256) as u8,
            ((y + seed * 17) % 256) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(Bytes::from(buf))
}

async fn export_benchmarks(
    store: &MockStore,
    path: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let records: Vec<BenchmarkRecord> = store.list_benchmarks().await?;
    std::fs::write(path, serde_json::to_string_pretty(&records)?)?;
    Ok(records.len())
}

// =============================================================================
// Tile Command
// =============================================================================

fn run_tile(config: TileConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let image = match image::open(&config.input) {
        Ok(img) => img,
        Err(e) => {
            error!("Cannot open '{}': {}", config.input, e);
            return ExitCode::FAILURE;
        }
    };

    let tiling = config.tiling();
    let rects = match tile_grid(image.width(), image.height(), &tiling) {
        Ok(rects) => rects,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} ({}x{}): {} tile(s), {}px tiles, {}px overlap, stride {}",
        config.input,
        image.width(),
        image.height(),
        rects.len(),
        tiling.tile_size,
        tiling.overlap,
        tiling.stride()
    );
    for rect in &rects {
        println!(
            "  ({:>5}, {:>5})  {:>5} x {:>5}",
            rect.x, rect.y, rect.width, rect.height
        );
    }

    if let Some(out_dir) = &config.out {
        if let Err(e) = write_tiles(&image, &tiling, out_dir) {
            error!("Writing tiles failed: {}", e);
            return ExitCode::FAILURE;
        }
        println!("Wrote {} tile(s) to {}", rects.len(), out_dir);
    }

    ExitCode::SUCCESS
}

fn write_tiles(
    image: &DynamicImage,
    tiling: &TilingConfig,
    out_dir: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(out_dir)?;
    for tile in partition(image, tiling)? {
        let path = format!("{out_dir}/tile_{}_{}.png", tile.rect.x, tile.rect.y);
        tile.content.save(&path)?;
    }
    Ok(())
}

// =============================================================================
// Report Command
// =============================================================================

fn run_report(config: ReportConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let records: Vec<BenchmarkRecord> = match std::fs::read_to_string(&config.input)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(records) => records,
        Err(e) => {
            error!("Cannot read benchmark records from '{}': {}", config.input, e);
            return ExitCode::FAILURE;
        }
    };

    let report = BenchmarkReport::from_records(&records);
    for (model, summary) in &report.models {
        println!(
            "{}: {} image(s), avg PSNR {:.2}, avg SSIM {:.4}",
            model, summary.image_count, summary.average_psnr, summary.average_ssim
        );
    }

    let json = match report.to_json() {
        Ok(json) => json,
        Err(e) => {
            error!("Report serialization failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = std::fs::write(&config.output, json) {
        error!("Cannot write '{}': {}", config.output, e);
        return ExitCode::FAILURE;
    }
    println!("Report written to {}", config.output);

    ExitCode::SUCCESS
}

// =============================================================================
// Logging
// =============================================================================

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("optic_restore={default_level}")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
