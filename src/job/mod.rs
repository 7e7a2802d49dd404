//! Restoration job model.
//!
//! Mirrors the rows of the jobs table the dashboard writes: a job points at a
//! blurred input image in the bucket, optionally at a sharp original for
//! benchmarking, and tracks its lifecycle from `pending` through `processing`
//! to `completed` or `failed`.

mod models;

pub use models::{find_model, model_catalog, ModelInfo, ModelKind};

use serde::{Deserialize, Serialize};

// =============================================================================
// Status
// =============================================================================

/// Lifecycle state of a restoration job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted, waiting to be claimed by a worker.
    Pending,
    /// Claimed by a worker, restoration in progress.
    Processing,
    /// Restored output uploaded, job finished.
    Completed,
    /// Restoration aborted; see `error_log`.
    Failed,
}

impl JobStatus {
    /// Lowercase wire name, as stored in the jobs table.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Restoration method requested for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestorationMethod {
    Deconvolution,
    Gan,
    Pinn,
    Swinir,
    RealEsrgan,
    OpticalDiffusion,
}

/// Tuning parameters attached to a job by the dashboard's sliders.
///
/// All knobs are optional; a model uses its own defaults for absent ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationParameters {
    pub method: RestorationMethod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub denoise_level: Option<f64>,
}

// =============================================================================
// Job
// =============================================================================

/// One restoration job, as stored in the jobs table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestorationJob {
    /// Store-assigned identifier.
    pub id: String,

    /// Submission time, unix seconds.
    pub created_at: u64,

    /// Bucket path of the blurred input image.
    pub blurred_image_path: String,

    /// Bucket path of the sharp original, when the submitter has one.
    /// Enables PSNR/SSIM benchmarking of the restored output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_image_path: Option<String>,

    /// Bucket path (or tile directory prefix) of the restored output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restored_image_path: Option<String>,

    pub status: JobStatus,

    /// Percent complete, 0-100, updated by the worker as it moves through
    /// download, restore, and upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    /// Human-readable description of the worker's current step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,

    /// Completion time, unix seconds. Set on the transition to `completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,

    /// Error text recorded on the transition to `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_log: Option<String>,

    /// Catalog id of the model to run.
    pub model_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<RestorationParameters>,
}

/// What a submitter provides; the store fills in id, timestamps, and status.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub blurred_image_path: String,
    pub original_image_path: Option<String>,
    pub model_id: String,
    pub parameters: Option<RestorationParameters>,
}

/// A quality measurement for one completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub job_id: String,
    pub model_name: String,
    pub psnr: f64,
    pub ssim: f64,
}

// =============================================================================
// Tests
// =============================================================================
