use thiserror::Error;

/// Errors raised when validating a tiling configuration against an image.
///
/// All variants are detected before any tile is produced: partitioning either
/// returns a complete, valid tile sequence or fails fast with one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilingError {
    /// Tile size of zero can never cover anything.
    #[error("Invalid configuration: tile size must be greater than 0")]
    ZeroTileSize,

    /// Overlap at least as large as the tile size yields a stride of zero
    /// (or negative), so the scan would never advance.
    #[error("Invalid configuration: overlap ({overlap}) must be smaller than tile size ({tile_size})")]
    OverlapTooLarge { tile_size: u32, overlap: u32 },

    /// Image with a zero dimension has no extent to partition.
    #[error("Invalid configuration: image dimensions must be positive, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

/// Errors from the storage layer (jobs table and image bucket).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Job id or object path does not exist in the store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A status transition was applied to a job that is not in the expected
    /// state (e.g., completing a job that was never claimed).
    #[error("Job {id} is in state '{status}', transition rejected")]
    Conflict { id: String, status: String },

    /// Backend-specific failure (network, serialization, quota).
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Errors from a restoration model.
#[derive(Debug, Clone, Error)]
pub enum RestoreError {
    /// The requested model id is not in the catalog.
    #[error("Unknown model: '{0}'")]
    UnknownModel(String),

    /// The model ran but produced no usable output.
    #[error("Inference failed for model '{model}': {reason}")]
    Inference { model: String, reason: String },
}

/// Errors from quality metric computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// PSNR/SSIM require both images to have the same extent.
    #[error("Dimension mismatch: reference is {ref_width}x{ref_height}, candidate is {width}x{height}")]
    DimensionMismatch {
        ref_width: u32,
        ref_height: u32,
        width: u32,
        height: u32,
    },
}

/// Errors surfaced while processing a single restoration job.
///
/// Whatever the cause, the worker records `to_string()` of this error in the
/// job's `error_log` and marks the job failed.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Storage failure (download, upload, or job table update).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The input image could not be decoded (or the output not encoded).
    /// Propagated unchanged from the image codec, never retried.
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// Tiling configuration rejected for this image.
    #[error(transparent)]
    Tiling(#[from] TilingError),

    /// Model lookup or inference failure.
    #[error("Restore error: {0}")]
    Restore(#[from] RestoreError),

    /// Quality metric computation failure (dimension mismatch with the
    /// reference image). Logged and swallowed, never fails a job.
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}
