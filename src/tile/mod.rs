//! Overlap-tiled partitioning of large images.
//!
//! Images larger than what a restoration model can hold in memory are split
//! into a row-major grid of rectangular tiles. Adjacent tiles share a fixed
//! overlap margin so that seams can be blended away when the independently
//! restored tiles are reassembled downstream (reassembly itself lives outside
//! this crate).
//!
//! # Components
//!
//! - [`TilingConfig`]: tile edge length and overlap margin
//! - [`TileRect`]: one tile's offset and extent within the source image
//! - [`Tile`]: a `TileRect` plus its extracted pixel content
//! - [`tile_grid`]: compute the grid geometry for given image dimensions
//! - [`partition`]: compute the grid and extract each tile's pixels
//! - [`needs_tiling`]: decide whether an image exceeds the single-pass area limit
//!
//! # Example
//!
//! ```
//! use optic_restore::tile::{tile_grid, needs_tiling, TilingConfig};
//!
//! let config = TilingConfig::default(); // 1024px tiles, 64px overlap
//!
//! if needs_tiling(5000, 4000, TilingConfig::DEFAULT_AREA_LIMIT) {
//!     let rects = tile_grid(5000, 4000, &config).unwrap();
//!     assert!(rects.iter().all(|r| r.x + r.width <= 5000));
//! }
//! ```

mod extract;
mod grid;

pub use extract::{partition, Tile};
pub use grid::{
    needs_tiling, tile_grid, TileRect, TilingConfig, DEFAULT_OVERLAP, DEFAULT_TILE_SIZE,
};
