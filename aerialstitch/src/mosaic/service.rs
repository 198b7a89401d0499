//! Mosaic orchestration: plan, fetch, stitch, composite, write.

use super::error::MosaicError;
use super::request::{MosaicReport, MosaicRequest};
use crate::fetch::{fetch_grid, FetchLimiter, FetchStats};
use crate::grid::{plan_grid, BoundingBox, TileGrid};
use crate::overlay::{downscale, merge_or, VectorLayerRenderer};
use crate::provider::TileProvider;
use crate::stitch::stitch_and_crop;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Builds aerial mosaics from a tile provider.
///
/// The service owns no per-request state; the bounding box, zoom and overlay
/// travel with each call.
pub struct MosaicService<P: TileProvider> {
    provider: Arc<P>,
    limiter: Arc<FetchLimiter>,
}

impl<P: TileProvider + 'static> MosaicService<P> {
    /// Creates a service allowing `max_concurrent` tile requests at once.
    pub fn new(provider: P, max_concurrent: usize) -> Self {
        Self::with_limiter(Arc::new(provider), Arc::new(FetchLimiter::new(max_concurrent)))
    }

    /// Creates a service sharing an existing provider and limiter.
    pub fn with_limiter(provider: Arc<P>, limiter: Arc<FetchLimiter>) -> Self {
        Self { provider, limiter }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn limiter(&self) -> &FetchLimiter {
        &self.limiter
    }

    /// Fetches and stitches the aerial raster for `bbox` at `zoom`.
    ///
    /// The result is exactly the bounding box's pixel rectangle at that zoom.
    #[instrument(skip_all, fields(bbox = %bbox, zoom = zoom))]
    pub async fn build_aerial(
        &self,
        bbox: &BoundingBox,
        zoom: u8,
        cancellation_token: CancellationToken,
    ) -> Result<(RgbImage, TileGrid, FetchStats), MosaicError> {
        let grid = plan_grid(bbox, zoom)?;

        info!(
            zoom,
            tiles = grid.tile_count(),
            columns = grid.columns(),
            rows = grid.rows(),
            "Fetching tile grid"
        );

        let fetched = fetch_grid(
            &grid,
            Arc::clone(&self.provider),
            Arc::clone(&self.limiter),
            cancellation_token,
        )
        .await?;
        let stats = fetched.stats();

        let aerial = tokio::task::spawn_blocking(move || stitch_and_crop(&fetched))
            .await
            .map_err(|e| MosaicError::Internal(format!("stitch task failed: {}", e)))??;

        Ok((aerial, grid, stats))
    }

    /// Runs a full mosaic request.
    ///
    /// Output files are written only once the final raster has been built;
    /// any failure leaves the filesystem untouched.
    #[instrument(skip_all, fields(bbox = %request.bbox, zoom = request.zoom))]
    pub async fn run(
        &self,
        request: &MosaicRequest,
        layer: Arc<dyn VectorLayerRenderer>,
        cancellation_token: CancellationToken,
    ) -> Result<MosaicReport, MosaicError> {
        let format = output_format(&request.output)?;

        let (aerial, grid, fetch) = self
            .build_aerial(&request.bbox, request.zoom, cancellation_token.clone())
            .await?;
        let aerial_size = aerial.dimensions();

        if cancellation_token.is_cancelled() {
            return Err(MosaicError::Cancelled);
        }

        let bbox = request.bbox;
        let shrink = request.shrink_factor;
        let filter = request.filter;
        let output = request.output.clone();
        let aerial_output = request.aerial_output.clone();
        let paths = (output.clone(), aerial_output.clone());

        let output_size = tokio::task::spawn_blocking(move || {
            let aerial = downscale(&aerial, shrink, filter);
            let overlay = layer.render(&bbox, aerial.dimensions())?;
            let merged = merge_or(&aerial, &overlay, filter);

            debug!(
                width = merged.width(),
                height = merged.height(),
                shrink,
                "Composited overlay"
            );

            // Nothing touches the filesystem until both rasters are encoded
            let (output, aerial_output) = paths;
            let mut files = vec![(output, encode_raster(&merged, format)?)];
            if let Some(path) = aerial_output {
                files.push((path, encode_raster(&aerial, ImageFormat::Png)?));
            }
            write_all(&files)?;
            Ok::<_, MosaicError>(merged.dimensions())
        })
        .await
        .map_err(|e| MosaicError::Internal(format!("composite task failed: {}", e)))??;

        info!(
            output = %output.display(),
            width = output_size.0,
            height = output_size.1,
            tiles = fetch.tiles,
            bytes = fetch.bytes,
            peak_in_flight = fetch.peak_in_flight,
            elapsed_ms = fetch.elapsed.as_millis() as u64,
            "Mosaic written"
        );

        Ok(MosaicReport {
            grid,
            fetch,
            aerial_size,
            output_size,
            output,
            aerial_output,
        })
    }
}

/// Resolves the raster format for `path` from its extension.
///
/// Checked before any tile is fetched so a bad path fails without side
/// effects.
fn output_format(path: &Path) -> Result<ImageFormat, MosaicError> {
    let format = ImageFormat::from_path(path).map_err(|e| MosaicError::UnsupportedOutput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !format.writing_enabled() {
        return Err(MosaicError::UnsupportedOutput {
            path: path.to_path_buf(),
            reason: format!("{:?} encoding is not available", format),
        });
    }
    Ok(format)
}

/// Encodes a raster in memory.
fn encode_raster(image: &RgbImage, format: ImageFormat) -> Result<Vec<u8>, MosaicError> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), format)?;
    Ok(buffer)
}

/// Writes every file or none of them.
///
/// Files already written are removed again if a later one fails.
fn write_all(files: &[(PathBuf, Vec<u8>)]) -> Result<(), MosaicError> {
    for (index, (path, bytes)) in files.iter().enumerate() {
        if let Err(e) = write_file(path, bytes) {
            for (written, _) in &files[..index] {
                if let Err(cleanup) = std::fs::remove_file(written) {
                    warn!(path = %written.display(), error = %cleanup, "Failed to remove partial output");
                }
            }
            return Err(e);
        }
    }
    Ok(())
}

/// Writes one encoded raster, creating parent directories.
fn write_file(path: &Path, bytes: &[u8]) -> Result<(), MosaicError> {
    let io_error = |source| MosaicError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, bytes).map_err(io_error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "Raster written");
    Ok(())
}
