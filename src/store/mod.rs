//! Storage abstraction for jobs and images.
//!
//! The production backend (a managed Postgres + object bucket) lives outside
//! this repository; workers talk to it through the [`JobStore`] and
//! [`ImageStore`] traits. The in-process [`MockStore`] implements both and is
//! what the binary and the tests run against.
//!
//! # Example
//!
//! ```
//! use optic_restore::store::{JobStore, ImageStore, MockStore};
//! use optic_restore::job::NewJob;
//! use bytes::Bytes;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MockStore::new();
//!
//!     store
//!         .upload("blurred/demo.png", Bytes::from_static(b"..."), "image/png")
//!         .await
//!         .unwrap();
//!
//!     let job = store
//!         .insert_job(NewJob {
//!             blurred_image_path: "blurred/demo.png".to_string(),
//!             original_image_path: None,
//!             model_id: "wiener_deconvolution_v1".to_string(),
//!             parameters: None,
//!         })
//!         .await
//!         .unwrap();
//!
//!     let claimed = store.claim_pending(1).await.unwrap();
//!     assert_eq!(claimed[0].id, job.id);
//! }
//! ```

mod mock;

pub use mock::MockStore;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::job::{BenchmarkRecord, NewJob, RestorationJob};

// =============================================================================
// JobStore
// =============================================================================

/// Access to the restoration jobs table and the benchmarks table.
///
/// Implementations must be safe to share across worker tasks.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job in `pending` state. The store assigns the id and
    /// `created_at`.
    async fn insert_job(&self, new: NewJob) -> Result<RestorationJob, StoreError>;

    /// Fetch a job by id.
    async fn fetch_job(&self, id: &str) -> Result<RestorationJob, StoreError>;

    /// Claim up to `limit` pending jobs, atomically flipping each to
    /// `processing` so no other worker picks them up.
    ///
    /// Returns the claimed jobs in submission order; empty when nothing is
    /// pending.
    async fn claim_pending(&self, limit: usize) -> Result<Vec<RestorationJob>, StoreError>;

    /// Record worker progress on a processing job.
    async fn update_progress(
        &self,
        id: &str,
        percent: u8,
        step: &str,
    ) -> Result<(), StoreError>;

    /// Transition a processing job to `completed`, recording where the
    /// restored output was uploaded.
    async fn complete_job(&self, id: &str, restored_path: &str) -> Result<(), StoreError>;

    /// Transition a job to `failed`, recording the error text.
    async fn fail_job(&self, id: &str, error_log: &str) -> Result<(), StoreError>;

    /// Record a quality measurement for a job.
    async fn insert_benchmark(&self, record: BenchmarkRecord) -> Result<(), StoreError>;

    /// All recorded benchmarks, in insertion order.
    async fn list_benchmarks(&self) -> Result<Vec<BenchmarkRecord>, StoreError>;
}

// =============================================================================
// ImageStore
// =============================================================================

/// Access to the image bucket.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Download an object's bytes.
    async fn download(&self, path: &str) -> Result<Bytes, StoreError>;

    /// Upload an object, replacing any existing one at the same path.
    async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Public URL under which an object can be fetched by a viewer.
    fn public_url(&self, path: &str) -> String;
}

/// Current time as unix seconds.
pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
