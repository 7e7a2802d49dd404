//! Benchmark aggregation over records produced by a real worker run.

use std::sync::Arc;

use optic_restore::report::BenchmarkReport;
use optic_restore::store::{JobStore, MockStore};
use optic_restore::worker::{Worker, WorkerConfig};

use super::test_utils::seed_job;

#[tokio::test]
async fn report_aggregates_worker_benchmarks_per_model() {
    let store = Arc::new(MockStore::new());

    // Three benchmarked jobs on one model, one on another.
    for i in 0..3 {
        seed_job(&store, i, "wiener_deconvolution_v1", 128, 96, true).await;
    }
    seed_job(&store, 3, "swinir_restoration", 128, 96, true).await;

    let worker = Worker::new(Arc::clone(&store), WorkerConfig::default());
    let outcome = worker.run_once().await.unwrap();
    assert_eq!(outcome.completed, 4);

    let records = store.list_benchmarks().await.unwrap();
    assert_eq!(records.len(), 4);

    let report = BenchmarkReport::from_records(&records);
    assert_eq!(report.models.len(), 2);
    assert_eq!(report.models["wiener_deconvolution_v1"].image_count, 3);
    assert_eq!(report.models["swinir_restoration"].image_count, 1);

    // Pass-through restoration against identical originals: SSIM is perfect
    // and every PSNR is infinite, so the averaged PSNR falls back to 0.
    for summary in report.models.values() {
        assert!((summary.average_ssim - 1.0).abs() < 1e-9);
        assert_eq!(summary.average_psnr, 0.0);
    }

    // The JSON form round-trips.
    let json = report.to_json().unwrap();
    let back: BenchmarkReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
