//! Image quality metrics.
//!
//! PSNR and SSIM between a restored image and its sharp reference, computed
//! over luma. SSIM here is the global single-window form: one mean, variance,
//! and covariance over the full image, with the standard stabilizing
//! constants. That is coarser than the windowed formulation but ranks model
//! output the same way for the benchmark report.

use image::RgbaImage;

use crate::error::MetricsError;

/// Stabilizer `(0.01 * 255)^2` for the luminance term.
const SSIM_C1: f64 = 6.5025;

/// Stabilizer `(0.03 * 255)^2` for the contrast term.
const SSIM_C2: f64 = 58.5225;

/// PSNR and SSIM for one reference/candidate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMetrics {
    /// Peak signal-to-noise ratio in dB. Infinite for identical images.
    pub psnr: f64,
    /// Structural similarity in `[-1, 1]`, 1 for identical images.
    pub ssim: f64,
}

/// Compute PSNR and SSIM of `candidate` against `reference`.
///
/// # Errors
///
/// Both images must have the same dimensions; a mismatch is a
/// [`MetricsError::DimensionMismatch`].
pub fn quality_metrics(
    reference: &RgbaImage,
    candidate: &RgbaImage,
) -> Result<QualityMetrics, MetricsError> {
    check_dimensions(reference, candidate)?;
    Ok(QualityMetrics {
        psnr: psnr(reference, candidate)?,
        ssim: ssim(reference, candidate)?,
    })
}

/// Mean squared error over luma, `data_range = 255`.
pub fn mse(reference: &RgbaImage, candidate: &RgbaImage) -> Result<f64, MetricsError> {
    check_dimensions(reference, candidate)?;
    let a = luma(reference);
    let b = luma(candidate);
    let sum: f64 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
    Ok(sum / a.len() as f64)
}

/// Peak signal-to-noise ratio in dB. Returns `f64::INFINITY` when the images
/// are identical.
pub fn psnr(reference: &RgbaImage, candidate: &RgbaImage) -> Result<f64, MetricsError> {
    let mse = mse(reference, candidate)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0_f64 * 255.0 / mse).log10())
}

/// Global structural similarity over luma.
pub fn ssim(reference: &RgbaImage, candidate: &RgbaImage) -> Result<f64, MetricsError> {
    check_dimensions(reference, candidate)?;
    let a = luma(reference);
    let b = luma(candidate);
    let n = a.len() as f64;

    let mean_a: f64 = a.iter().sum::<f64>() / n;
    let mean_b: f64 = b.iter().sum::<f64>() / n;

    let mut var_a = 0.0;
    let mut var_b = 0.0;
    let mut cov = 0.0;
    for (x, y) in a.iter().zip(&b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        var_a += dx * dx;
        var_b += dy * dy;
        cov += dx * dy;
    }
    var_a /= n;
    var_b /= n;
    cov /= n;

    let numerator = (2.0 * mean_a * mean_b + SSIM_C1) * (2.0 * cov + SSIM_C2);
    let denominator = (mean_a * mean_a + mean_b * mean_b + SSIM_C1) * (var_a + var_b + SSIM_C2);
    Ok(numerator / denominator)
}

fn check_dimensions(reference: &RgbaImage, candidate: &RgbaImage) -> Result<(), MetricsError> {
    if reference.dimensions() != candidate.dimensions() {
        return Err(MetricsError::DimensionMismatch {
            ref_width: reference.width(),
            ref_height: reference.height(),
            width: candidate.width(),
            height: candidate.height(),
        });
    }
    Ok(())
}

/// ITU-R BT.601 luma of each pixel, in `[0, 255]`.
fn luma(image: &RgbaImage) -> Vec<f64> {
    image
        .pixels()
        .map(|p| 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
