//! Pixel extraction for tiles.
//!
//! [`partition`] pairs the grid geometry from [`super::grid`] with owned pixel
//! buffers cropped out of a decoded source image. Extraction is a pure read:
//! the source image is never mutated and the tiles share no storage with it.

use image::{DynamicImage, RgbaImage};

use crate::error::TilingError;

use super::grid::{tile_grid, TileRect, TilingConfig};

/// One tile of a source image: its rectangle plus an independently owned copy
/// of the pixels inside it.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Offset and extent of this tile within the source image.
    pub rect: TileRect,

    /// The tile's pixel data, `rect.width` x `rect.height`.
    pub content: RgbaImage,
}

/// Partition a decoded image into overlapping tiles.
///
/// Computes the full tile grid for the image's dimensions, then crops each
/// rectangle into an owned RGBA buffer. Tiles come back in the same row-major
/// order as [`tile_grid`].
///
/// The whole sequence is materialized up front: per-tile extraction is cheap
/// relative to whatever model consumes the tiles afterwards.
///
/// # Errors
///
/// Returns [`TilingError`] for a degenerate configuration or an empty image,
/// before any pixel is copied.
pub fn partition(image: &DynamicImage, config: &TilingConfig) -> Result<Vec<Tile>, TilingError> {
    let rects = tile_grid(image.width(), image.height(), config)?;

    let tiles = rects
        .into_iter()
        .map(|rect| Tile {
            content: image
                .crop_imm(rect.x, rect.y, rect.width, rect.height)
                .to_rgba8(),
            rect,
        })
        .collect();

    Ok(tiles)
}
