//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom range supported by the `u32` pixel math (`256 << 23 == 2^31`).
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 23;

/// Side length of one tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// WGS-84 equatorial radius in meters.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude, positive north
    pub lat: f64,
    /// Longitude, positive east
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Absolute pixel position on the full-world raster at a fixed zoom.
///
/// `x` grows eastwards and `y` grows southwards, both in `[0, map_size - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

impl fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "px({}, {})@z{}", self.x, self.y, self.zoom)
    }
}

/// Index of one 256×256 tile in the Web Mercator tile pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column (east-west), 0 at the antimeridian
    pub x: u32,
    /// Row (north-south), 0 at the north edge
    pub y: u32,
    /// Zoom level (0-23)
    pub zoom: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Returns true if both indices lie inside `[0, 2^zoom)` and the zoom is supported.
    pub fn is_valid(&self) -> bool {
        if self.zoom > MAX_ZOOM {
            return false;
        }
        let tiles_per_side = 1u32 << self.zoom;
        self.x < tiles_per_side && self.y < tiles_per_side
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Base-4 tile address. One digit per zoom level, most significant first.
///
/// Only constructible from well-formed input, so every `QuadKey` maps back
/// to exactly one tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuadKey(String);

impl QuadKey {
    pub(super) fn from_validated(digits: String) -> Self {
        Self(digits)
    }

    /// The zoom level this key addresses.
    pub fn zoom(&self) -> u8 {
        self.0.len() as u8
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for QuadKey {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::quadkey_to_tile(s)?;
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for QuadKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude or longitude is not a number
    InvalidCoordinate { lat: f64, lon: f64 },
    /// Zoom level is outside valid range (0 to 23)
    InvalidZoom(u8),
    /// Malformed quadkey or tile index outside `[0, 2^zoom)`
    InvalidAddress(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidCoordinate { lat, lon } => {
                write!(f, "Invalid coordinate: lat={}, lon={}", lat, lon)
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::InvalidAddress(reason) => {
                write!(f, "Invalid tile address: {}", reason)
            }
        }
    }
}

impl std::error::Error for CoordError {}
