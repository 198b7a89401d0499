//! Coordinate conversion module
//!
//! Bit-exact conversions between the four coordinate spaces of the Web
//! Mercator tile system:
//!
//! ```text
//!  lat/lon ──lat_lon_to_pixel──▶ pixel ──pixel_to_tile──▶ tile ──tile_to_quadkey──▶ quadkey
//!          ◀─pixel_to_lat_lon──        ◀──tile_to_pixel──      ◀──quadkey_to_tile──
//! ```
//!
//! Geographic inputs are clamped to the projection's domain, never rejected,
//! except for NaN which has no meaningful clamp.

mod types;


pub use types::{
    CoordError, GeoPoint, PixelCoord, QuadKey, TileCoord, EARTH_RADIUS, MAX_LAT, MAX_LON,
    MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM, TILE_SIZE,
};

use std::f64::consts::PI;

/// Clamps `value` to `[min, max]`.
///
/// Infinities land on the bounds. Callers reject NaN before clipping.
#[inline]
pub fn clip(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Side length in pixels of the whole world map at `zoom`.
#[inline]
pub fn map_size(zoom: u8) -> Result<u32, CoordError> {
    check_zoom(zoom)?;
    Ok(TILE_SIZE << zoom)
}

/// Meters on the ground covered by one pixel at the given latitude and zoom.
pub fn ground_resolution(lat: f64, zoom: u8) -> Result<f64, CoordError> {
    if lat.is_nan() {
        return Err(CoordError::InvalidCoordinate { lat, lon: 0.0 });
    }
    let lat = clip(lat, MIN_LAT, MAX_LAT);
    let size = map_size(zoom)? as f64;
    Ok((lat * PI / 180.0).cos() * 2.0 * PI * EARTH_RADIUS / size)
}

/// Map scale denominator (the `N` in `1:N`) for a screen of `screen_dpi`.
pub fn map_scale(lat: f64, zoom: u8, screen_dpi: f64) -> Result<f64, CoordError> {
    Ok(ground_resolution(lat, zoom)? * screen_dpi / 0.0254)
}

/// Projects a geographic position to unrounded world pixels at `zoom`.
///
/// This is the continuous form of [`lat_lon_to_pixel`], used by renderers
/// that need sub-pixel placement.
pub fn project(lat: f64, lon: f64, zoom: u8) -> Result<(f64, f64), CoordError> {
    if lat.is_nan() || lon.is_nan() {
        return Err(CoordError::InvalidCoordinate { lat, lon });
    }
    let size = map_size(zoom)? as f64;

    let lat = clip(lat, MIN_LAT, MAX_LAT);
    let lon = clip(lon, MIN_LON, MAX_LON);

    let x = (lon + 180.0) / 360.0;
    let sin_lat = (lat * PI / 180.0).sin();
    let y = 0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI);

    Ok((x * size, y * size))
}

/// Converts a geographic position to the pixel containing it at `zoom`.
///
/// Longitude is clamped, not wrapped; callers normalize it first.
pub fn lat_lon_to_pixel(lat: f64, lon: f64, zoom: u8) -> Result<PixelCoord, CoordError> {
    let (x, y) = project(lat, lon, zoom)?;
    let max = (map_size(zoom)? - 1) as f64;

    Ok(PixelCoord {
        x: clip(x + 0.5, 0.0, max).floor() as u32,
        y: clip(y + 0.5, 0.0, max).floor() as u32,
        zoom,
    })
}

/// Converts a pixel back to the geographic position of its top-left corner.
///
/// Derived as the exact inverse of [`lat_lon_to_pixel`]: the vertical axis is
/// normalized to a fraction of the map before the inverse Mercator.
pub fn pixel_to_lat_lon(pixel: &PixelCoord) -> Result<GeoPoint, CoordError> {
    let size = map_size(pixel.zoom)? as f64;
    let max = size - 1.0;

    let x = clip(pixel.x as f64, 0.0, max) / size - 0.5;
    let y = 0.5 - clip(pixel.y as f64, 0.0, max) / size;

    let lat = 90.0 - 360.0 * (-y * 2.0 * PI).exp().atan() / PI;
    let lon = 360.0 * x;

    Ok(GeoPoint { lat, lon })
}

/// Returns the tile containing `pixel`.
#[inline]
pub fn pixel_to_tile(pixel: &PixelCoord) -> TileCoord {
    TileCoord {
        x: pixel.x / TILE_SIZE,
        y: pixel.y / TILE_SIZE,
        zoom: pixel.zoom,
    }
}

/// Returns the top-left pixel of `tile`.
///
/// Indices outside `[0, 2^zoom)` are rejected rather than wrapped.
#[inline]
pub fn tile_to_pixel(tile: &TileCoord) -> Result<PixelCoord, CoordError> {
    check_zoom(tile.zoom)?;
    if !tile.is_valid() {
        return Err(CoordError::InvalidAddress(format!(
            "tile ({}, {}) outside zoom {} grid",
            tile.x, tile.y, tile.zoom
        )));
    }

    Ok(PixelCoord {
        x: tile.x * TILE_SIZE,
        y: tile.y * TILE_SIZE,
        zoom: tile.zoom,
    })
}

/// Encodes a tile as a quadkey.
///
/// Each digit carries one bit of `y` (high) and one bit of `x` (low), most
/// significant level first. Zoom 0 encodes to the empty key.
pub fn tile_to_quadkey(tile: &TileCoord) -> Result<QuadKey, CoordError> {
    check_zoom(tile.zoom)?;
    if !tile.is_valid() {
        return Err(CoordError::InvalidAddress(format!(
            "tile ({}, {}) outside zoom {} grid",
            tile.x, tile.y, tile.zoom
        )));
    }

    let mut key = String::with_capacity(tile.zoom as usize);
    for level in (1..=tile.zoom).rev() {
        let mask = 1u32 << (level - 1);
        let mut digit = b'0';
        if tile.x & mask != 0 {
            digit += 1;
        }
        if tile.y & mask != 0 {
            digit += 2;
        }
        key.push(digit as char);
    }

    Ok(QuadKey::from_validated(key))
}

/// Decodes a quadkey back to its tile.
pub fn quadkey_to_tile(quadkey: &str) -> Result<TileCoord, CoordError> {
    if quadkey.len() > MAX_ZOOM as usize {
        return Err(CoordError::InvalidAddress(format!(
            "quadkey '{}' longer than {} digits",
            quadkey, MAX_ZOOM
        )));
    }

    let zoom = quadkey.len() as u8;
    let mut x = 0u32;
    let mut y = 0u32;

    for (i, c) in quadkey.bytes().enumerate() {
        let mask = 1u32 << (zoom as usize - i - 1);
        match c {
            b'0' => {}
            b'1' => x |= mask,
            b'2' => y |= mask,
            b'3' => {
                x |= mask;
                y |= mask;
            }
            _ => {
                return Err(CoordError::InvalidAddress(format!(
                    "quadkey '{}' contains digit '{}' outside 0-3",
                    quadkey.escape_debug(),
                    (c as char).escape_debug()
                )))
            }
        }
    }

    Ok(TileCoord { x, y, zoom })
}

#[inline]
fn check_zoom(zoom: u8) -> Result<(), CoordError> {
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    Ok(())
}
