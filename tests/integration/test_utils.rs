//! Shared fixtures for the integration tests.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use optic_restore::job::NewJob;
use optic_restore::store::{ImageStore, JobStore, MockStore};

/// Deterministic gradient image encoded as PNG bytes.
pub fn png_image(width: u32, height: u32, seed: u32) -> Bytes {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            ((x + seed * 7) % 256) as u8,
            ((y + seed * 11) % 256) as u8,
            ((x ^ y) % 256) as u8,
            255,
        ])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("in-memory PNG encode");
    Bytes::from(buf)
}

/// Upload a blurred input (and optionally a matching original) and insert a
/// pending job pointing at it. Returns the job id.
pub async fn seed_job(
    store: &MockStore,
    index: u32,
    model_id: &str,
    width: u32,
    height: u32,
    with_original: bool,
) -> String {
    let blurred = format!("blurred/input_{index:02}.png");
    store
        .upload(&blurred, png_image(width, height, index), "image/png")
        .await
        .expect("upload blurred");

    let original_image_path = if with_original {
        let path = format!("originals/input_{index:02}.png");
        store
            .upload(&path, png_image(width, height, index), "image/png")
            .await
            .expect("upload original");
        Some(path)
    } else {
        None
    };

    store
        .insert_job(NewJob {
            blurred_image_path: blurred,
            original_image_path,
            model_id: model_id.to_string(),
            parameters: None,
        })
        .await
        .expect("insert job")
        .id
}
