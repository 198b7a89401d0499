//! aerialstitch - Aerial imagery mosaics from Web-Mercator tiles
//!
//! Converts a geographic bounding box into a quadkey-addressed tile grid,
//! fetches and stitches the tiles into one raster cropped exactly to the box,
//! and composites a rendered map layer over it.
//!
//! # High-Level API
//!
//! ```ignore
//! use aerialstitch::grid::BoundingBox;
//! use aerialstitch::mosaic::{MosaicRequest, MosaicService};
//! use aerialstitch::overlay::PolylineLayer;
//! use aerialstitch::provider::{AsyncReqwestClient, HttpTileProvider, RetryingProvider};
//!
//! let provider = RetryingProvider::new(HttpTileProvider::new(AsyncReqwestClient::new()?), 3);
//! let service = MosaicService::new(provider, 16);
//!
//! let bbox = BoundingBox::new(42.062451, 42.049705, -87.668189, -87.686433)?;
//! let request = MosaicRequest::new(bbox, 18, "campus.png");
//! let streets = PolylineLayer::from_geojson_file(Path::new("streets.geojson"))?;
//! service.run(&request, Arc::new(streets), CancellationToken::new()).await?;
//! ```

pub mod config;
pub mod coord;
pub mod fetch;
pub mod grid;
pub mod logging;
pub mod mosaic;
pub mod overlay;
pub mod provider;
pub mod stitch;

/// Version of the aerialstitch library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
