//! In-memory mock of the job table and image bucket.
//!
//! Stands in for the managed backend during demos and tests. Jobs get
//! fabricated ids (`job-0001`, `job-0002`, ...) and, when canned transitions
//! are enabled, a fetched job walks `pending` -> `processing` -> `completed`
//! on a wall-clock schedule without any worker touching it, the way the
//! dashboard's demo mode animates its status widget. Explicit transitions
//! (claim, complete, fail) take a job off the canned schedule.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::job::{BenchmarkRecord, JobStatus, NewJob, RestorationJob};

use super::{unix_now, ImageStore, JobStore};

/// Canned schedule: a fetched demo job reports `processing` after this long.
const CANNED_PROCESSING_AFTER: Duration = Duration::from_secs(1);

/// Canned schedule: a fetched demo job reports `completed` after this long.
const CANNED_COMPLETED_AFTER: Duration = Duration::from_secs(3);

/// Restored path fabricated for jobs completed by the canned schedule.
const CANNED_RESTORED_PATH: &str = "restored/demo.png";

struct JobEntry {
    job: RestorationJob,
    inserted: Instant,
    /// Set once a worker drives the job explicitly; disables the canned clock.
    driven: bool,
}

/// In-memory [`JobStore`] + [`ImageStore`] implementation.
pub struct MockStore {
    jobs: RwLock<HashMap<String, JobEntry>>,
    /// Insertion order of job ids, for deterministic claiming.
    order: RwLock<Vec<String>>,
    benchmarks: RwLock<Vec<BenchmarkRecord>>,
    objects: RwLock<HashMap<String, (Bytes, String)>>,
    next_id: AtomicU64,
    canned: Option<CannedSchedule>,
}

#[derive(Debug, Clone, Copy)]
struct CannedSchedule {
    processing_after: Duration,
    completed_after: Duration,
}

impl MockStore {
    /// Create a mock store without canned transitions: jobs only change state
    /// when a worker drives them. This is the mode the worker binary and the
    /// tests use.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            benchmarks: RwLock::new(Vec::new()),
            objects: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            canned: None,
        }
    }

    /// Create a mock store with canned, time-based status transitions, for
    /// demoing a status poller without running a worker.
    pub fn with_canned_transitions() -> Self {
        Self::with_canned_schedule(CANNED_PROCESSING_AFTER, CANNED_COMPLETED_AFTER)
    }

    fn with_canned_schedule(processing_after: Duration, completed_after: Duration) -> Self {
        Self {
            canned: Some(CannedSchedule {
                processing_after,
                completed_after,
            }),
            ..Self::new()
        }
    }

    fn fabricate_id(&self) -> String {
        format!("job-{:04}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Apply the canned schedule to a job snapshot, based on time since
    /// insertion. Only used for jobs no worker has touched.
    fn apply_canned(&self, entry: &JobEntry) -> RestorationJob {
        let mut job = entry.job.clone();
        let Some(schedule) = self.canned else {
            return job;
        };
        if entry.driven || job.status.is_terminal() {
            return job;
        }
        let elapsed = entry.inserted.elapsed();
        if elapsed >= schedule.completed_after {
            job.status = JobStatus::Completed;
            job.restored_image_path = Some(CANNED_RESTORED_PATH.to_string());
            job.completed_at = Some(unix_now());
        } else if elapsed >= schedule.processing_after {
            job.status = JobStatus::Processing;
        }
        job
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for MockStore {
    async fn insert_job(&self, new: NewJob) -> Result<RestorationJob, StoreError> {
        let id = self.fabricate_id();
        let job = RestorationJob {
            id: id.clone(),
            created_at: unix_now(),
            blurred_image_path: new.blurred_image_path,
            original_image_path: new.original_image_path,
            restored_image_path: None,
            status: JobStatus::Pending,
            progress: None,
            current_step: None,
            completed_at: None,
            error_log: None,
            model_id: new.model_id,
            parameters: new.parameters,
        };

        // Lock order matches claim_pending: order before jobs.
        let mut order = self.order.write().await;
        let mut jobs = self.jobs.write().await;
        jobs.insert(
            id.clone(),
            JobEntry {
                job: job.clone(),
                inserted: Instant::now(),
                driven: false,
            },
        );
        order.push(id);
        Ok(job)
    }

    async fn fetch_job(&self, id: &str) -> Result<RestorationJob, StoreError> {
        let jobs = self.jobs.read().await;
        let entry = jobs
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.apply_canned(entry))
    }

    async fn claim_pending(&self, limit: usize) -> Result<Vec<RestorationJob>, StoreError> {
        let order = self.order.read().await;
        let mut jobs = self.jobs.write().await;

        let mut claimed = Vec::new();
        for id in order.iter() {
            if claimed.len() >= limit {
                break;
            }
            if let Some(entry) = jobs.get_mut(id) {
                if entry.job.status == JobStatus::Pending {
                    entry.job.status = JobStatus::Processing;
                    entry.driven = true;
                    claimed.push(entry.job.clone());
                }
            }
        }
        Ok(claimed)
    }

    async fn update_progress(&self, id: &str, percent: u8, step: &str) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.job.progress = Some(percent.min(100));
        entry.job.current_step = Some(step.to_string());
        entry.driven = true;
        Ok(())
    }

    async fn complete_job(&self, id: &str, restored_path: &str) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if entry.job.status != JobStatus::Processing {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                status: entry.job.status.to_string(),
            });
        }
        entry.job.status = JobStatus::Completed;
        entry.job.restored_image_path = Some(restored_path.to_string());
        entry.job.completed_at = Some(unix_now());
        entry.job.progress = Some(100);
        entry.driven = true;
        Ok(())
    }

    async fn fail_job(&self, id: &str, error_log: &str) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.job.status = JobStatus::Failed;
        entry.job.error_log = Some(error_log.to_string());
        entry.driven = true;
        Ok(())
    }

    async fn insert_benchmark(&self, record: BenchmarkRecord) -> Result<(), StoreError> {
        self.benchmarks.write().await.push(record);
        Ok(())
    }

    async fn list_benchmarks(&self) -> Result<Vec<BenchmarkRecord>, StoreError> {
        Ok(self.benchmarks.read().await.clone())
    }
}

#[async_trait]
impl ImageStore for MockStore {
    async fn download(&self, path: &str) -> Result<Bytes, StoreError> {
        let objects = self.objects.read().await;
        objects
            .get(path)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.objects
            .write()
            .await
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("mock://images/{path}")
    }
}

// =============================================================================
// Tests
// =============================================================================
