//! Polyline (street graph) layer drawn with tiny-skia.

use super::layer::{RenderError, VectorLayerRenderer};
use crate::coord::{project, GeoPoint};
use crate::grid::BoundingBox;
use image::RgbImage;
use serde::Deserialize;
use std::path::Path;
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Shader, Stroke, Transform};
use tracing::debug;

/// Default stroke width in output pixels.
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// GeoJSON subset accepted by [`PolylineLayer::from_geojson`].
///
/// Only `LineString` and `MultiLineString` geometries are drawn; every other
/// geometry type is skipped.
#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

/// Geographic polylines drawn as white anti-aliased strokes on black.
#[derive(Debug, Clone)]
pub struct PolylineLayer {
    lines: Vec<Vec<GeoPoint>>,
    stroke_width: f32,
}

impl PolylineLayer {
    pub fn new(lines: Vec<Vec<GeoPoint>>) -> Self {
        Self {
            lines,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    /// Parses a GeoJSON `FeatureCollection` of line features.
    ///
    /// Positions are `[lon, lat]` (extra elements such as altitude are
    /// ignored).
    pub fn from_geojson(json: &str) -> Result<Self, RenderError> {
        let collection: FeatureCollection =
            serde_json::from_str(json).map_err(|e| RenderError::GeoJson(e.to_string()))?;

        let mut lines = Vec::new();
        for geometry in collection.features.into_iter().filter_map(|f| f.geometry) {
            match geometry {
                Geometry::LineString { coordinates } => lines.push(to_points(&coordinates)?),
                Geometry::MultiLineString { coordinates } => {
                    for line in &coordinates {
                        lines.push(to_points(line)?);
                    }
                }
                Geometry::Unsupported => {}
            }
        }

        debug!(lines = lines.len(), "Parsed GeoJSON polylines");
        Ok(Self::new(lines))
    }

    /// Reads and parses a GeoJSON file.
    pub fn from_geojson_file(path: &Path) -> Result<Self, RenderError> {
        let json = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson(&json)
    }

    pub fn lines(&self) -> &[Vec<GeoPoint>] {
        &self.lines
    }
}

impl Default for PolylineLayer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn to_points(positions: &[Vec<f64>]) -> Result<Vec<GeoPoint>, RenderError> {
    positions
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(GeoPoint::new(*lat, *lon)),
            _ => Err(RenderError::GeoJson(format!(
                "position {:?} needs at least two numbers",
                position
            ))),
        })
        .collect()
}

impl VectorLayerRenderer for PolylineLayer {
    fn render(&self, bbox: &BoundingBox, size: (u32, u32)) -> Result<RgbImage, RenderError> {
        let (width, height) = size;
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        pixmap.fill(Color::BLACK);

        // Continuous world pixels at zoom 0, mapped linearly onto the output
        let (west, north) = project(bbox.north(), bbox.west(), 0)?;
        let (east, south) = project(bbox.south(), bbox.east(), 0)?;
        let scale_x = width as f64 / (east - west);
        let scale_y = height as f64 / (south - north);

        let mut builder = PathBuilder::new();
        for line in self.lines.iter().filter(|line| line.len() >= 2) {
            for (i, point) in line.iter().enumerate() {
                let (x, y) = project(point.lat, point.lon, 0)?;
                let px = ((x - west) * scale_x) as f32;
                let py = ((y - north) * scale_y) as f32;
                if i == 0 {
                    builder.move_to(px, py);
                } else {
                    builder.line_to(px, py);
                }
            }
        }

        if let Some(path) = builder.finish() {
            let paint = Paint {
                shader: Shader::SolidColor(Color::WHITE),
                anti_alias: true,
                ..Default::default()
            };
            pixmap.stroke_path(
                &path,
                &paint,
                &Stroke {
                    width: self.stroke_width,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Default::default()
                },
                Transform::default(),
                None,
            );
        }

        // Background and strokes are opaque, so premultiplied RGB is exact
        let rgb: Vec<u8> = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        RgbImage::from_raw(width, height, rgb).ok_or(RenderError::InvalidSize { width, height })
    }
}
