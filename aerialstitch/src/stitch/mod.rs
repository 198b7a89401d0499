//! Stitching of fetched tiles into one cropped raster.
//!
//! Each grid row is assembled into a horizontal strip first, the strips are
//! stacked into the full canvas, and the canvas is cropped to the grid's
//! [`CropWindow`]:
//!
//! ```text
//!  ┌────┬────┬────┐   strip 0
//!  ├────┼────┼────┤   strip 1      ──crop──▶  ┌──────────┐
//!  └────┴────┴────┘   strip 2                 └──────────┘
//! ```
//!
//! Everything here is synchronous CPU work; async callers should run it on
//! a blocking thread.

use crate::coord::{TileCoord, TILE_SIZE};
use crate::fetch::FetchedTiles;
use crate::grid::CropWindow;
use image::{imageops, RgbImage};
use thiserror::Error;
use tracing::debug;

/// Errors from decoding or assembling tiles.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StitchError {
    /// A grid position had no tile data
    #[error("tile {0} missing from fetched set")]
    MissingTile(TileCoord),

    /// Tile bytes did not decode to a 256×256 raster
    #[error("invalid data for tile {tile}: {reason}")]
    InvalidTileData { tile: TileCoord, reason: String },
}

/// Decodes one tile and checks its dimensions.
pub fn decode_tile(tile: TileCoord, data: &[u8]) -> Result<RgbImage, StitchError> {
    let image = image::load_from_memory(data).map_err(|e| StitchError::InvalidTileData {
        tile,
        reason: format!("image decode error: {}", e),
    })?;

    if image.width() != TILE_SIZE || image.height() != TILE_SIZE {
        return Err(StitchError::InvalidTileData {
            tile,
            reason: format!(
                "expected {}x{} pixels, got {}x{}",
                TILE_SIZE,
                TILE_SIZE,
                image.width(),
                image.height()
            ),
        });
    }

    Ok(image.to_rgb8())
}

/// Assembles one grid row into a `columns × 256` wide strip.
fn stitch_row(fetched: &FetchedTiles, row: u32) -> Result<RgbImage, StitchError> {
    let grid = fetched.grid();
    let mut strip = RgbImage::new(grid.canvas_width(), TILE_SIZE);

    for column in 0..grid.columns() {
        let tile = grid
            .tile_at(column, row)
            .ok_or_else(|| StitchError::MissingTile(grid.min_tile()))?;
        let data = fetched
            .get(column, row)
            .ok_or(StitchError::MissingTile(tile))?;
        let raster = decode_tile(tile, data)?;

        imageops::replace(&mut strip, &raster, (column * TILE_SIZE) as i64, 0);
    }

    Ok(strip)
}

/// Stitches every fetched tile into the uncropped canvas.
pub fn stitch_canvas(fetched: &FetchedTiles) -> Result<RgbImage, StitchError> {
    let grid = fetched.grid();
    let mut canvas = RgbImage::new(grid.canvas_width(), grid.canvas_height());

    for row in 0..grid.rows() {
        let strip = stitch_row(fetched, row)?;
        imageops::replace(&mut canvas, &strip, 0, (row * TILE_SIZE) as i64);
    }

    Ok(canvas)
}

/// Cuts the crop window out of a stitched canvas.
pub fn crop_canvas(canvas: &RgbImage, crop: CropWindow) -> RgbImage {
    imageops::crop_imm(canvas, crop.left, crop.top, crop.width(), crop.height()).to_image()
}

/// Stitches the grid and crops it to the requested bounding box.
pub fn stitch_and_crop(fetched: &FetchedTiles) -> Result<RgbImage, StitchError> {
    let grid = fetched.grid();
    let canvas = stitch_canvas(fetched)?;
    let cropped = crop_canvas(&canvas, grid.crop());

    debug!(
        canvas_width = canvas.width(),
        canvas_height = canvas.height(),
        width = cropped.width(),
        height = cropped.height(),
        "Stitched and cropped tile grid"
    );

    Ok(cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{plan_grid, BoundingBox, TileGrid};
    use image::Rgb;

    fn encode_png(img: &RgbImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
        buffer
    }

    /// Solid tile whose colour encodes its grid position.
    fn position_tile(column: u32, row: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(256, 256, Rgb([column as u8 * 40, row as u8 * 40, 200]));
        encode_png(&img)
    }

    fn grid() -> TileGrid {
        let bbox = BoundingBox::new(41.0, 40.5, -73.6, -74.5).unwrap();
        plan_grid(&bbox, 10).unwrap()
    }

    fn fetched_for(grid: TileGrid) -> FetchedTiles {
        let tiles = grid
            .tiles()
            .map(|tile| {
                let (column, row) = grid.position_of(&tile).unwrap();
                position_tile(column, row)
            })
            .collect();
        FetchedTiles::new(grid, tiles).unwrap()
    }

    #[test]
    fn test_decode_tile_accepts_256_square() {
        let data = position_tile(0, 0);
        let img = decode_tile(TileCoord::new(0, 0, 1), &data).unwrap();
        assert_eq!(img.dimensions(), (256, 256));
    }

    #[test]
    fn test_decode_tile_rejects_wrong_size() {
        let data = encode_png(&RgbImage::new(128, 256));
        let result = decode_tile(TileCoord::new(1, 1, 2), &data);
        match result {
            Err(StitchError::InvalidTileData { tile, reason }) => {
                assert_eq!(tile, TileCoord::new(1, 1, 2));
                assert!(reason.contains("128x256"));
            }
            other => panic!("expected InvalidTileData, got {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn test_decode_tile_rejects_garbage() {
        let result = decode_tile(TileCoord::new(0, 0, 0), b"not an image");
        assert!(matches!(result, Err(StitchError::InvalidTileData { .. })));
    }

    #[test]
    fn test_canvas_places_tiles_by_position() {
        let grid = grid();
        let canvas = stitch_canvas(&fetched_for(grid)).unwrap();

        assert_eq!(canvas.dimensions(), (grid.canvas_width(), grid.canvas_height()));
        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let expected = Rgb([column as u8 * 40, row as u8 * 40, 200]);
                let x = column * 256;
                let y = row * 256;
                assert_eq!(*canvas.get_pixel(x, y), expected);
                assert_eq!(*canvas.get_pixel(x + 255, y + 255), expected);
            }
        }
    }

    #[test]
    fn test_cropped_size_matches_window() {
        let grid = grid();
        let cropped = stitch_and_crop(&fetched_for(grid)).unwrap();

        assert_eq!(cropped.width(), grid.crop().width());
        assert_eq!(cropped.height(), grid.crop().height());
    }

    #[test]
    fn test_crop_window_offsets() {
        let canvas = RgbImage::from_fn(512, 512, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 0]));
        let crop = CropWindow {
            left: 10,
            top: 20,
            right: 300,
            bottom: 400,
        };
        let cropped = crop_canvas(&canvas, crop);

        assert_eq!(cropped.dimensions(), (290, 380));
        assert_eq!(*cropped.get_pixel(0, 0), Rgb([10, 20, 0]));
        assert_eq!(*cropped.get_pixel(289, 379), Rgb([(299 % 256) as u8, (399 % 256) as u8, 0]));
    }

    #[test]
    fn test_bad_tile_fails_whole_stitch() {
        let grid = grid();
        let bad = grid.tile_at(2, 1).unwrap();
        let tiles = grid
            .tiles()
            .map(|tile| {
                if tile == bad {
                    b"corrupt".to_vec()
                } else {
                    position_tile(0, 0)
                }
            })
            .collect();
        let fetched = FetchedTiles::new(grid, tiles).unwrap();

        match stitch_and_crop(&fetched) {
            Err(StitchError::InvalidTileData { tile, .. }) => assert_eq!(tile, bad),
            other => panic!("expected InvalidTileData, got {:?}", other.map(|i| i.dimensions())),
        }
    }
}
