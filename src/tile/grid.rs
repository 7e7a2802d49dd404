//! Tile grid geometry.
//!
//! Pure integer arithmetic over image dimensions: no pixel data is touched
//! here. [`tile_grid`] produces the full rectangle set for an image and
//! [`needs_tiling`] decides whether partitioning is warranted at all.

use serde::{Deserialize, Serialize};

use crate::error::TilingError;

// =============================================================================
// Configuration
// =============================================================================

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 1024;

/// Default overlap margin between adjacent tiles, in pixels.
pub const DEFAULT_OVERLAP: u32 = 64;

/// Configuration for partitioning an image into overlapping tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Maximum edge length of a tile in pixels. Trailing tiles are clipped to
    /// the image boundary and may be smaller.
    pub tile_size: u32,

    /// Pixels shared between two adjacent tiles. Must be smaller than
    /// `tile_size`.
    pub overlap: u32,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl TilingConfig {
    /// Default single-pass area limit: images up to 4096x4096 pixels are
    /// processed untiled.
    pub const DEFAULT_AREA_LIMIT: u64 = 4096 * 4096;

    /// Create a configuration, without validating it. Validation happens when
    /// the configuration meets an image in [`tile_grid`].
    pub fn new(tile_size: u32, overlap: u32) -> Self {
        Self { tile_size, overlap }
    }

    /// Distance advanced between the start of one tile and the start of the
    /// next along an axis.
    ///
    /// Saturates to zero when `overlap >= tile_size`; such a configuration
    /// is rejected by [`validate`](Self::validate) before any scan uses the
    /// stride.
    pub fn stride(&self) -> u32 {
        self.tile_size.saturating_sub(self.overlap)
    }

    /// Check the configuration against an image's dimensions.
    ///
    /// Rejects zero tile sizes, overlaps that would stall the scan, and empty
    /// images. Called by [`tile_grid`] before any tile is produced.
    pub fn validate(&self, image_width: u32, image_height: u32) -> Result<(), TilingError> {
        if self.tile_size == 0 {
            return Err(TilingError::ZeroTileSize);
        }
        if self.overlap >= self.tile_size {
            return Err(TilingError::OverlapTooLarge {
                tile_size: self.tile_size,
                overlap: self.overlap,
            });
        }
        if image_width == 0 || image_height == 0 {
            return Err(TilingError::EmptyImage {
                width: image_width,
                height: image_height,
            });
        }
        Ok(())
    }
}

// =============================================================================
// TileRect
// =============================================================================

/// One rectangular region of a source image.
///
/// `x + width` and `y + height` never exceed the source image's dimensions:
/// trailing tiles are clipped to the boundary rather than padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    /// Horizontal offset of the tile's top-left corner.
    pub x: u32,

    /// Vertical offset of the tile's top-left corner.
    pub y: u32,

    /// Tile width in pixels, always at least 1.
    pub width: u32,

    /// Tile height in pixels, always at least 1.
    pub height: u32,
}

impl TileRect {
    /// Exclusive right edge of the tile.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge of the tile.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Area of the tile in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Compute the tile grid for an image of the given dimensions.
///
/// Tiles are produced in row-major order: top-to-bottom, and left-to-right
/// within each row. Starting offsets advance by `config.stride()`; each tile's
/// extent is clipped at the image's right and bottom edges. The union of the
/// returned rectangles covers the image exactly, and every pair of adjacent
/// tiles shares `config.overlap` pixels except where clipping shrinks the
/// trailing tile.
///
/// # Errors
///
/// Returns [`TilingError`] if the configuration is degenerate or the image has
/// a zero dimension. No partial grid is ever returned.
pub fn tile_grid(
    image_width: u32,
    image_height: u32,
    config: &TilingConfig,
) -> Result<Vec<TileRect>, TilingError> {
    config.validate(image_width, image_height)?;

    let stride = config.stride();
    let mut rects = Vec::new();

    let mut y = 0;
    while y < image_height {
        let height = config.tile_size.min(image_height - y);
        let mut x = 0;
        while x < image_width {
            let width = config.tile_size.min(image_width - x);
            rects.push(TileRect {
                x,
                y,
                width,
                height,
            });
            x += stride;
        }
        y += stride;
    }

    Ok(rects)
}

/// Report whether an image exceeds the single-pass area limit and therefore
/// requires partitioning before restoration.
///
/// Returns `true` iff `image_width * image_height > area_limit`. Widths and
/// heights are promoted to `u64` so the product cannot overflow.
pub fn needs_tiling(image_width: u32, image_height: u32, area_limit: u64) -> bool {
    image_width as u64 * image_height as u64 > area_limit
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tile_for_small_image() {
        let config = TilingConfig::new(1024, 64);
        let rects = tile_grid(500, 300, &config).unwrap();

        assert_eq!(
            rects,
            vec![TileRect {
                x: 0,
                y: 0,
                width: 500,
                height: 300
            }]
        );
    }

    #[test]
    fn test_exact_grid_no_overlap() {
        let config = TilingConfig::new(1024, 0);
        let rects = tile_grid(2048, 1024, &config).unwrap();

        assert_eq!(rects.len(), 2);
        assert_eq!(
            rects[0],
            TileRect {
                x: 0,
                y: 0,
                width: 1024,
                height: 1024
            }
        );
        assert_eq!(
            rects[1],
            TileRect {
                x: 1024,
                y: 0,
                width: 1024,
                height: 1024
            }
        );
    }

    #[test]
    fn test_exact_grid_row_major_order() {
        // Evenly divisible image: 2x2 grid of full-size tiles, scanned
        // top-to-bottom and left-to-right within each row.
        let config = TilingConfig::new(512, 0);
        let rects = tile_grid(1024, 1024, &config).unwrap();

        let offsets: Vec<(u32, u32)> = rects.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(offsets, vec![(0, 0), (512, 0), (0, 512), (512, 512)]);
        assert!(rects.iter().all(|r| r.width == 512 && r.height == 512));
    }

    #[test]
    fn test_clipped_trailing_column() {
        // stride = 1024 - 64 = 960; second column starts at 960 and is
        // clipped to 1200 - 960 = 240 pixels wide.
        let config = TilingConfig::new(1024, 64);
        let rects = tile_grid(1200, 1200, &config).unwrap();

        assert_eq!(rects.len(), 4);
        let last = rects.last().unwrap();
        assert_eq!(last.x, 960);
        assert_eq!(last.width, 240);
        assert_eq!(last.y, 960);
        assert_eq!(last.height, 240);

        for rect in &rects {
            assert!(rect.right() <= 1200);
            assert!(rect.bottom() <= 1200);
            assert!(rect.width >= 1);
            assert!(rect.height >= 1);
        }
    }

    #[test]
    fn test_full_coverage_no_gaps() {
        let config = TilingConfig::new(300, 40);
        let (w, h) = (1000u32, 730u32);
        let rects = tile_grid(w, h, &config).unwrap();

        // Mark every covered pixel; afterwards none may be missing.
        let mut covered = vec![false; (w * h) as usize];
        for rect in &rects {
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    covered[(y * w + x) as usize] = true;
                }
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn test_adjacent_overlap_margin() {
        // Height 200 <= tile_size guarantees a single row: x offsets 0, 224,
        // 448, 672, 896, trailing tile clipped to 104px. Every consecutive
        // pair shares exactly `overlap` pixels.
        let config = TilingConfig::new(256, 32);
        let rects = tile_grid(1000, 200, &config).unwrap();

        assert_eq!(rects.len(), 5);
        for pair in rects.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert_eq!(a.y, b.y);
            let shared = a.right() - b.x;
            assert_eq!(shared, config.overlap);
        }
        assert_eq!(rects.last().unwrap().width, 104);
    }

    #[test]
    fn test_height_past_one_stride_emits_clipped_second_row() {
        // 256-tall image with stride 224: the scan starts a second row at
        // y = 224, clipped to 32px tall, doubling the tile count.
        let config = TilingConfig::new(256, 32);
        let rects = tile_grid(1000, 256, &config).unwrap();

        assert_eq!(rects.len(), 10);
        let second_row: Vec<&TileRect> = rects.iter().filter(|r| r.y == 224).collect();
        assert_eq!(second_row.len(), 5);
        assert!(second_row.iter().all(|r| r.height == 32));
        assert!(rects.iter().all(|r| r.bottom() <= 256));

        // Overlap still holds within each row; pairs that cross the row
        // boundary are not horizontally adjacent.
        for pair in rects.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.y != b.y {
                continue;
            }
            assert_eq!(a.right() - b.x, config.overlap);
        }
    }

    #[test]
    fn test_overlap_equal_to_tile_size_rejected() {
        let config = TilingConfig::new(64, 64);
        let result = tile_grid(100, 100, &config);
        assert_eq!(
            result,
            Err(TilingError::OverlapTooLarge {
                tile_size: 64,
                overlap: 64
            })
        );
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let config = TilingConfig::new(0, 0);
        assert_eq!(tile_grid(100, 100, &config), Err(TilingError::ZeroTileSize));
    }

    #[test]
    fn test_empty_image_rejected() {
        let config = TilingConfig::default();
        assert_eq!(
            tile_grid(0, 100, &config),
            Err(TilingError::EmptyImage {
                width: 0,
                height: 100
            })
        );
        assert_eq!(
            tile_grid(100, 0, &config),
            Err(TilingError::EmptyImage {
                width: 100,
                height: 0
            })
        );
    }

    #[test]
    fn test_needs_tiling_boundary() {
        let limit = 4096u64 * 4096;
        assert!(!needs_tiling(4096, 4096, limit));
        assert!(needs_tiling(4097, 4096, limit));
        assert!(needs_tiling(4096, 4097, limit));
        assert!(!needs_tiling(1, 1, limit));
    }

    #[test]
    fn test_needs_tiling_no_overflow() {
        // u32::MAX squared overflows u32 arithmetic; the predicate promotes
        // to u64, where the product is 2^64 - 2^33 + 1. A limit below that
        // fires; a limit at or above it (u64::MAX included) does not.
        let product = (u32::MAX as u64) * (u32::MAX as u64);
        assert!(needs_tiling(u32::MAX, u32::MAX, u64::MAX / 2));
        assert!(needs_tiling(u32::MAX, u32::MAX, product - 1));
        assert!(!needs_tiling(u32::MAX, u32::MAX, product));
        assert!(!needs_tiling(u32::MAX, u32::MAX, u64::MAX));
    }

    #[test]
    fn test_stride() {
        assert_eq!(TilingConfig::new(1024, 64).stride(), 960);
        assert_eq!(TilingConfig::new(1024, 0).stride(), 1024);
        // Degenerate configs saturate instead of underflowing; validate()
        // rejects them before any scan runs.
        assert_eq!(TilingConfig::new(16, 64).stride(), 0);
        assert_eq!(TilingConfig::new(64, 64).stride(), 0);
    }
}
