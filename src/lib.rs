//! # Optic Restore
//!
//! Worker pipeline for optical image restoration jobs.
//!
//! The dashboard that submits jobs and the inference engine that actually
//! deblurs images both live elsewhere; this crate covers everything in
//! between: partitioning oversized inputs into overlapping tiles, claiming
//! and driving jobs through their lifecycle, uploading restored output, and
//! benchmarking restoration quality against sharp originals.
//!
//! ## Features
//!
//! - **Overlap tiling**: splits images over a memory budget into a row-major
//!   grid of clipped, overlapping tiles for independent per-tile restoration
//! - **Job lifecycle**: `pending` -> `processing` -> `completed`/`failed`,
//!   with progress and error reporting on every job
//! - **Mock backend**: an in-memory store fabricating job records and canned
//!   status transitions, so the pipeline runs without the managed backend
//! - **Quality benchmarks**: PSNR and SSIM per restored image, aggregated
//!   into a per-model JSON report
//!
//! ## Architecture
//!
//! - [`tile`] - tile grid geometry, pixel extraction, and the tiling-need predicate
//! - [`job`] - job records, parameters, statuses, and the model catalog
//! - [`store`] - `JobStore`/`ImageStore` traits and the in-memory mock
//! - [`restore`] - the restoration model seam
//! - [`metrics`] - PSNR/SSIM computation
//! - [`report`] - per-model benchmark aggregation
//! - [`worker`] - the batch worker driving jobs end to end
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```
//! use optic_restore::tile::{needs_tiling, tile_grid, TilingConfig};
//!
//! let config = TilingConfig::default();
//! if needs_tiling(9000, 6000, TilingConfig::DEFAULT_AREA_LIMIT) {
//!     let rects = tile_grid(9000, 6000, &config).unwrap();
//!     assert!(rects.len() > 1);
//! }
//! ```

pub mod config;
pub mod error;
pub mod job;
pub mod metrics;
pub mod report;
pub mod restore;
pub mod store;
pub mod tile;
pub mod worker;

// Re-export commonly used types
pub use config::{Cli, Command, ReportConfig, TileConfig, WorkConfig};
pub use error::{MetricsError, RestoreError, StoreError, TilingError, WorkerError};
pub use job::{
    find_model, model_catalog, BenchmarkRecord, JobStatus, ModelInfo, ModelKind, NewJob,
    RestorationJob, RestorationMethod, RestorationParameters,
};
pub use metrics::{mse, psnr, quality_metrics, ssim, QualityMetrics};
pub use report::{BenchmarkReport, ModelSummary};
pub use restore::{resolve_restorer, PassthroughRestorer, Restorer};
pub use store::{ImageStore, JobStore, MockStore};
pub use tile::{
    needs_tiling, partition, tile_grid, Tile, TileRect, TilingConfig, DEFAULT_OVERLAP,
    DEFAULT_TILE_SIZE,
};
pub use worker::{
    BatchOutcome, RestorerResolver, Worker, WorkerConfig, DEFAULT_BATCH_SIZE, DEFAULT_MAX_WORKERS,
};
