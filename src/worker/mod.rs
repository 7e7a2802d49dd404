//! Restoration worker.
//!
//! Claims pending jobs from the store, runs each through its model, uploads
//! the restored output, records quality benchmarks when a sharp original is
//! available, and transitions the job to `completed` or `failed`.
//!
//! # Pipeline
//!
//! ```text
//! claim_pending ──► download ──► decode ──► restore ──► upload ──► complete
//!                                   │                                 ▲
//!                                   └── needs_tiling? ── per-tile ────┘
//! ```
//!
//! Images over the configured area limit are partitioned into overlapping
//! tiles and restored tile-by-tile; each restored tile is uploaded under the
//! job's output prefix with its offset in the name, carrying everything a
//! downstream stitcher needs. Reassembly is deliberately not performed here.
//!
//! Any error while processing a job is recorded in the job's `error_log` and
//! the job is marked failed; one bad job never aborts the batch.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::{RestoreError, StoreError, WorkerError};
use crate::job::{BenchmarkRecord, RestorationJob};
use crate::metrics::quality_metrics;
use crate::restore::{resolve_restorer, Restorer};
use crate::store::{ImageStore, JobStore};
use crate::tile::{needs_tiling, partition, TilingConfig};

// =============================================================================
// Configuration
// =============================================================================

/// Default number of jobs claimed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Default number of jobs processed concurrently.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Worker tuning knobs.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Jobs claimed per `run_once` call.
    pub batch_size: usize,

    /// Upper bound on concurrently processed jobs within a batch.
    pub max_workers: usize,

    /// Tile geometry used when an input exceeds `area_limit`.
    pub tiling: TilingConfig,

    /// Maximum pixel area processed in a single pass.
    pub area_limit: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
            tiling: TilingConfig::default(),
            area_limit: TilingConfig::DEFAULT_AREA_LIMIT,
        }
    }
}

/// Counts for one processed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    pub claimed: usize,
    pub completed: usize,
    pub failed: usize,
}

// =============================================================================
// Worker
// =============================================================================

/// Maps a job's `model_id` to the restorer that will run it.
///
/// The default is [`resolve_restorer`] over the model catalog; tests and
/// embedders can inject their own to swap in a real inference engine.
pub type RestorerResolver =
    Arc<dyn Fn(&str) -> Result<Box<dyn Restorer>, RestoreError> + Send + Sync>;

/// Drives restoration jobs from a store through their model.
pub struct Worker<S> {
    store: Arc<S>,
    config: WorkerConfig,
    resolver: RestorerResolver,
}

impl<S> Worker<S>
where
    S: JobStore + ImageStore + 'static,
{
    /// Create a worker using the catalog resolver.
    pub fn new(store: Arc<S>, config: WorkerConfig) -> Self {
        Self::with_resolver(store, config, Arc::new(resolve_restorer))
    }

    /// Create a worker with an injected restorer resolver.
    pub fn with_resolver(
        store: Arc<S>,
        config: WorkerConfig,
        resolver: RestorerResolver,
    ) -> Self {
        Self {
            store,
            config,
            resolver,
        }
    }

    /// Claim and process one batch of pending jobs.
    ///
    /// Returns how many jobs were claimed, completed, and failed. Only a
    /// failure to talk to the job table itself is an error; per-job failures
    /// are recorded on the jobs.
    pub async fn run_once(&self) -> Result<BatchOutcome, StoreError> {
        let jobs = self.store.claim_pending(self.config.batch_size).await?;
        if jobs.is_empty() {
            debug!("no pending jobs");
            return Ok(BatchOutcome::default());
        }

        info!(count = jobs.len(), "claimed batch");

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let mut tasks = JoinSet::new();

        let mut outcome = BatchOutcome {
            claimed: jobs.len(),
            ..BatchOutcome::default()
        };

        for job in jobs {
            let store = Arc::clone(&self.store);
            let config = self.config.clone();
            let resolver = Arc::clone(&self.resolver);
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            tasks.spawn(async move {
                let _permit = permit;
                let job_id = job.id.clone();
                let result = process_job(&*store, &job, &config, &resolver).await;
                (job_id, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((job_id, Ok(restored_path))) => {
                    info!(job = %job_id, path = %restored_path, "job completed");
                    outcome.completed += 1;
                }
                Ok((job_id, Err(e))) => {
                    error!(job = %job_id, error = %e, "job failed");
                    if let Err(store_err) = self.store.fail_job(&job_id, &e.to_string()).await {
                        error!(job = %job_id, error = %store_err, "could not mark job failed");
                    }
                    outcome.failed += 1;
                }
                Err(join_err) => {
                    // A panicking job task is counted as failed but cannot be
                    // attributed to an id anymore.
                    error!(error = %join_err, "job task aborted");
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Poll for work until the process is stopped.
    ///
    /// Sleeps `poll_interval` between empty batches; a non-empty batch is
    /// followed immediately by another claim.
    pub async fn run_loop(&self, poll_interval: Duration) -> Result<(), StoreError> {
        info!(
            batch_size = self.config.batch_size,
            max_workers = self.config.max_workers,
            "worker loop started"
        );
        loop {
            let outcome = self.run_once().await?;
            if outcome.claimed == 0 {
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

// =============================================================================
// Per-job pipeline
// =============================================================================

/// Process one claimed job end to end. Returns the restored output path (a
/// single object, or a tile prefix for tiled jobs) and completes the job.
async fn process_job<S>(
    store: &S,
    job: &RestorationJob,
    config: &WorkerConfig,
    resolver: &RestorerResolver,
) -> Result<String, WorkerError>
where
    S: JobStore + ImageStore,
{
    store
        .update_progress(&job.id, 10, "Downloading input image")
        .await?;
    let input_bytes = store.download(&job.blurred_image_path).await?;

    let image = image::load_from_memory(&input_bytes)?;
    let (width, height) = (image.width(), image.height());
    debug!(job = %job.id, width, height, model = %job.model_id, "input decoded");

    let restorer = resolver(&job.model_id)?;
    let parameters = job.parameters.as_ref();

    let restored_path = if needs_tiling(width, height, config.area_limit) {
        info!(
            job = %job.id,
            width,
            height,
            area_limit = config.area_limit,
            "input exceeds single-pass area, restoring per tile"
        );
        store
            .update_progress(&job.id, 30, "Restoring image tiles")
            .await?;

        let tiles = partition(&image, &config.tiling)?;
        let tile_count = tiles.len();
        let prefix = format!("restored/{}/", job.id);

        for (index, tile) in tiles.into_iter().enumerate() {
            let restored = restorer.restore(&tile.content, parameters)?;
            let path = format!("{prefix}tile_{}_{}.png", tile.rect.x, tile.rect.y);
            store
                .upload(&path, encode_png(&restored)?, "image/png")
                .await?;
            debug!(job = %job.id, tile = index + 1, total = tile_count, path = %path, "tile restored");
        }

        store
            .update_progress(&job.id, 90, "Uploading restored tiles")
            .await?;
        prefix
    } else {
        store
            .update_progress(&job.id, 30, "Restoring image")
            .await?;
        let restored = restorer.restore(&image.to_rgba8(), parameters)?;

        store
            .update_progress(&job.id, 70, "Uploading restored image")
            .await?;
        let path = format!("restored/{}.png", job.id);
        store
            .upload(&path, encode_png(&restored)?, "image/png")
            .await?;

        // Benchmarks need a sharp original to compare against; a missing or
        // unusable original never fails the job.
        if let Some(original_path) = &job.original_image_path {
            record_benchmark(store, job, original_path, &restored).await;
        }
        path
    };

    store.complete_job(&job.id, &restored_path).await?;
    Ok(restored_path)
}

/// Compute PSNR/SSIM of the restored image against the original and record
/// them. Failures are logged and swallowed.
async fn record_benchmark<S>(
    store: &S,
    job: &RestorationJob,
    original_path: &str,
    restored: &RgbaImage,
) where
    S: JobStore + ImageStore,
{
    let result = async {
        let original_bytes = store.download(original_path).await?;
        let original = image::load_from_memory(&original_bytes)?.to_rgba8();
        let metrics = quality_metrics(&original, restored)?;

        store
            .insert_benchmark(BenchmarkRecord {
                job_id: job.id.clone(),
                model_name: job.model_id.clone(),
                psnr: metrics.psnr,
                ssim: metrics.ssim,
            })
            .await?;

        info!(
            job = %job.id,
            psnr = metrics.psnr,
            ssim = metrics.ssim,
            "benchmark recorded"
        );
        Ok::<(), WorkerError>(())
    }
    .await;

    if let Err(e) = result {
        warn!(job = %job.id, error = %e, "benchmark skipped");
    }
}

/// Encode an RGBA buffer as PNG bytes.
fn encode_png(image: &RgbaImage) -> Result<Bytes, WorkerError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image.clone()).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(Bytes::from(buf))
}

// =============================================================================
// Tests
// =============================================================================
