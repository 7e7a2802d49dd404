//! End-to-end worker pipeline tests over the mock store.

use std::sync::Arc;

use bytes::Bytes;

use optic_restore::job::{model_catalog, JobStatus, NewJob};
use optic_restore::store::{ImageStore, JobStore, MockStore};
use optic_restore::tile::TilingConfig;
use optic_restore::worker::{Worker, WorkerConfig};

use super::test_utils::{png_image, seed_job};

#[tokio::test]
async fn mixed_batch_runs_to_completion() {
    let store = Arc::new(MockStore::new());

    // One job per catalog model, alternating originals.
    let catalog = model_catalog();
    let mut ids = Vec::new();
    for (i, model) in catalog.iter().enumerate() {
        ids.push(seed_job(&store, i as u32, model.id, 320, 240, i % 2 == 0).await);
    }

    let worker = Worker::new(Arc::clone(&store), WorkerConfig::default());
    let outcome = worker.run_once().await.unwrap();
    assert_eq!(outcome.claimed, catalog.len());
    assert_eq!(outcome.completed, catalog.len());
    assert_eq!(outcome.failed, 0);

    for id in &ids {
        let job = store.fetch_job(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert_eq!(job.progress, Some(100));

        let restored = job.restored_image_path.expect("restored path");
        let data = store.download(&restored).await.unwrap();
        assert!(image::load_from_memory(&data).is_ok());
    }

    // Originals were seeded for half the jobs, so half got benchmarked.
    let benchmarks = store.list_benchmarks().await.unwrap();
    assert_eq!(benchmarks.len(), catalog.len().div_ceil(2));
}

#[tokio::test]
async fn batch_size_limits_claims_per_run() {
    let store = Arc::new(MockStore::new());
    for i in 0..5 {
        seed_job(&store, i, "wiener_deconvolution_v1", 64, 64, false).await;
    }

    let worker = Worker::new(
        Arc::clone(&store),
        WorkerConfig {
            batch_size: 2,
            ..WorkerConfig::default()
        },
    );

    assert_eq!(worker.run_once().await.unwrap().claimed, 2);
    assert_eq!(worker.run_once().await.unwrap().claimed, 2);
    assert_eq!(worker.run_once().await.unwrap().claimed, 1);
    assert_eq!(worker.run_once().await.unwrap().claimed, 0);
}

#[tokio::test]
async fn oversized_input_produces_tile_outputs() {
    let store = Arc::new(MockStore::new());
    store
        .upload("blurred/pano.png", png_image(300, 200, 9), "image/png")
        .await
        .unwrap();
    let job = store
        .insert_job(NewJob {
            blurred_image_path: "blurred/pano.png".to_string(),
            original_image_path: None,
            model_id: "real_esrgan_v2".to_string(),
            parameters: None,
        })
        .await
        .unwrap();

    let worker = Worker::new(
        Arc::clone(&store),
        WorkerConfig {
            tiling: TilingConfig::new(128, 16),
            area_limit: 128 * 128,
            ..WorkerConfig::default()
        },
    );
    let outcome = worker.run_once().await.unwrap();
    assert_eq!(outcome.completed, 1);

    let fetched = store.fetch_job(&job.id).await.unwrap();
    let prefix = fetched.restored_image_path.unwrap();
    assert!(prefix.ends_with('/'));

    // stride 112: x offsets 0, 112, 224; y offsets 0, 112.
    let mut total_area = 0u64;
    for (x, y) in [(0, 0), (112, 0), (224, 0), (0, 112), (112, 112), (224, 112)] {
        let data = store
            .download(&format!("{prefix}tile_{x}_{y}.png"))
            .await
            .unwrap_or_else(|_| panic!("missing tile at ({x}, {y})"));
        let tile = image::load_from_memory(&data).unwrap();
        assert!(x + tile.width() <= 300);
        assert!(y + tile.height() <= 200);
        total_area += tile.width() as u64 * tile.height() as u64;
    }
    // Overlap means the tiles are collectively larger than the image.
    assert!(total_area >= 300 * 200);
}

#[tokio::test]
async fn corrupt_input_fails_only_its_own_job() {
    let store = Arc::new(MockStore::new());

    let good = seed_job(&store, 0, "swinir_restoration", 100, 80, false).await;

    store
        .upload("blurred/broken.png", Bytes::from_static(b"\x89PNG junk"), "image/png")
        .await
        .unwrap();
    let bad = store
        .insert_job(NewJob {
            blurred_image_path: "blurred/broken.png".to_string(),
            original_image_path: None,
            model_id: "swinir_restoration".to_string(),
            parameters: None,
        })
        .await
        .unwrap()
        .id;

    let worker = Worker::new(Arc::clone(&store), WorkerConfig::default());
    let outcome = worker.run_once().await.unwrap();
    assert_eq!(outcome.completed, 1);
    assert_eq!(outcome.failed, 1);

    assert_eq!(
        store.fetch_job(&good).await.unwrap().status,
        JobStatus::Completed
    );
    let failed = store.fetch_job(&bad).await.unwrap();
    assert_eq!(failed.status, JobStatus::Failed);
    assert!(failed.error_log.is_some());
    assert!(failed.restored_image_path.is_none());
}

#[tokio::test]
async fn missing_input_object_fails_the_job() {
    let store = Arc::new(MockStore::new());
    let job = store
        .insert_job(NewJob {
            blurred_image_path: "blurred/never_uploaded.png".to_string(),
            original_image_path: None,
            model_id: "wiener_deconvolution_v1".to_string(),
            parameters: None,
        })
        .await
        .unwrap();

    let worker = Worker::new(Arc::clone(&store), WorkerConfig::default());
    let outcome = worker.run_once().await.unwrap();
    assert_eq!(outcome.failed, 1);

    let fetched = store.fetch_job(&job.id).await.unwrap();
    assert_eq!(fetched.status, JobStatus::Failed);
    assert!(fetched
        .error_log
        .unwrap()
        .contains("blurred/never_uploaded.png"));
}
