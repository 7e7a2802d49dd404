//! Tiling geometry properties exercised through the public API.

use optic_restore::error::TilingError;
use optic_restore::tile::{needs_tiling, tile_grid, TileRect, TilingConfig};

/// Assorted image/config combinations, including awkward remainders.
const CASES: &[(u32, u32, u32, u32)] = &[
    (500, 300, 1024, 64),
    (1200, 1200, 1024, 64),
    (2048, 1024, 1024, 0),
    (1, 1, 1024, 64),
    (1000, 730, 300, 40),
    (409, 33, 64, 63),
    (999, 1001, 100, 1),
];

#[test]
fn grid_covers_image_exactly() {
    for &(w, h, tile_size, overlap) in CASES {
        let rects = tile_grid(w, h, &TilingConfig::new(tile_size, overlap)).unwrap();

        let mut covered = vec![false; (w as usize) * (h as usize)];
        for rect in &rects {
            assert!(rect.right() <= w, "{rect:?} exceeds width {w}");
            assert!(rect.bottom() <= h, "{rect:?} exceeds height {h}");
            assert!(rect.width >= 1 && rect.height >= 1, "{rect:?} is degenerate");
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    covered[(y as usize) * (w as usize) + x as usize] = true;
                }
            }
        }
        assert!(
            covered.iter().all(|&c| c),
            "gap in coverage for {w}x{h} with {tile_size}/{overlap}"
        );
    }
}

#[test]
fn grid_is_row_major() {
    for &(w, h, tile_size, overlap) in CASES {
        let rects = tile_grid(w, h, &TilingConfig::new(tile_size, overlap)).unwrap();
        for pair in rects.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                b.y > a.y || (b.y == a.y && b.x > a.x),
                "order violated between {a:?} and {b:?}"
            );
        }
    }
}

#[test]
fn horizontally_adjacent_tiles_share_the_overlap_margin() {
    for &(w, h, tile_size, overlap) in CASES {
        let config = TilingConfig::new(tile_size, overlap);
        let rects = tile_grid(w, h, &config).unwrap();

        for pair in rects.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.y != b.y {
                continue; // row boundary
            }
            let shared = a.right() - b.x;
            // A full-size left tile shares exactly `overlap` pixels; a tile
            // clipped at the right edge may share more of its shortened self,
            // but never extends past the image.
            if a.width == tile_size {
                assert_eq!(shared, overlap);
            } else {
                assert!(shared <= a.width);
            }
        }
    }
}

#[test]
fn single_tile_when_image_fits() {
    let rects = tile_grid(500, 300, &TilingConfig::new(1024, 64)).unwrap();
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
fn degenerate_configs_fail_before_producing_tiles() {
    assert!(matches!(
        tile_grid(100, 100, &TilingConfig::new(64, 64)),
        Err(TilingError::OverlapTooLarge { .. })
    ));
    assert!(matches!(
        tile_grid(100, 100, &TilingConfig::new(64, 65)),
        Err(TilingError::OverlapTooLarge { .. })
    ));
    assert!(matches!(
        tile_grid(100, 100, &TilingConfig::new(0, 0)),
        Err(TilingError::ZeroTileSize)
    ));
    assert!(matches!(
        tile_grid(0, 0, &TilingConfig::default()),
        Err(TilingError::EmptyImage { .. })
    ));
}

#[test]
fn predicate_is_strict_at_the_boundary() {
    let limit = 4096u64 * 4096;
    assert!(!needs_tiling(4096, 4096, limit));
    assert!(needs_tiling(4097, 4096, limit));
}
