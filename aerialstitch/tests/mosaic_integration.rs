//! Integration tests for the mosaic pipeline.
//!
//! These tests run the complete plan → fetch → stitch → composite → write
//! workflow against an in-memory tile provider:
//! - Grid size and crop dimensions for a real campus bounding box
//! - Concurrency limit respected across the whole fetch
//! - Street overlay and shrink factor on the written raster
//! - Failure atomicity when a tile cannot be fetched
//! - Retries of transient provider failures

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aerialstitch::coord::{quadkey_to_tile, tile_to_quadkey, GeoPoint, QuadKey, TileCoord};
use aerialstitch::grid::{plan_grid, BoundingBox};
use aerialstitch::mosaic::{MosaicError, MosaicRequest, MosaicService};
use aerialstitch::overlay::{BlankLayer, PolylineLayer, ResampleFilter};
use aerialstitch::provider::{ProviderError, RetryingProvider, TileProvider};
use image::{ImageFormat, Rgb, RgbImage};
use tokio_util::sync::CancellationToken;

// =============================================================================
// Test Helpers
// =============================================================================

fn campus() -> BoundingBox {
    BoundingBox::new(42.062451, 42.049705, -87.668189, -87.686433).unwrap()
}

fn checker_color(tile: &TileCoord) -> Rgb<u8> {
    match (tile.x % 2, tile.y % 2) {
        (0, 0) => Rgb([200, 40, 40]),
        (1, 0) => Rgb([40, 200, 40]),
        (0, _) => Rgb([40, 40, 200]),
        _ => Rgb([120, 120, 120]),
    }
}

fn encode_png(color: Rgb<u8>) -> Vec<u8> {
    let mut buffer = Vec::new();
    RgbImage::from_pixel(256, 256, color)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Serves a checkerboard of solid tiles for any quadkey, recording requests.
struct CheckerProvider {
    encoded: HashMap<[u8; 3], Vec<u8>>,
    missing: HashSet<String>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    delay: Duration,
}

impl CheckerProvider {
    fn new() -> Self {
        let encoded = [(0, 0), (1, 0), (0, 1), (1, 1)]
            .into_iter()
            .map(|(x, y)| {
                let color = checker_color(&TileCoord::new(x, y, 1));
                (color.0, encode_png(color))
            })
            .collect();
        Self {
            encoded,
            missing: HashSet::new(),
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn without(mut self, tile: TileCoord) -> Self {
        self.missing
            .insert(tile_to_quadkey(&tile).unwrap().to_string());
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl TileProvider for CheckerProvider {
    async fn fetch(&self, quadkey: &QuadKey) -> Result<Vec<u8>, ProviderError> {
        self.requests.lock().unwrap().push(quadkey.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.missing.contains(quadkey.as_str()) {
            return Err(ProviderError::NotFound(quadkey.to_string()));
        }
        let tile = quadkey_to_tile(quadkey.as_str())
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(self.encoded[&checker_color(&tile).0].clone())
    }

    fn name(&self) -> &str {
        "checker"
    }
}

/// Fails every tile's first attempt with a network error.
struct FirstAttemptFails {
    inner: CheckerProvider,
    seen: Mutex<HashSet<String>>,
    failures: AtomicUsize,
}

impl TileProvider for FirstAttemptFails {
    async fn fetch(&self, quadkey: &QuadKey) -> Result<Vec<u8>, ProviderError> {
        let first = self.seen.lock().unwrap().insert(quadkey.to_string());
        if first {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(ProviderError::NetworkFailure("connection reset".to_string()));
        }
        self.inner.fetch(quadkey).await
    }

    fn name(&self) -> &str {
        "first-attempt-fails"
    }
}

// =============================================================================
// Campus scenario
// =============================================================================

#[tokio::test]
async fn test_campus_grid_and_aerial_size() {
    let bbox = campus();
    let grid = plan_grid(&bbox, 18).unwrap();

    assert_eq!(grid.min_tile(), TileCoord::new(67220, 97251, 18));
    assert_eq!(grid.max_tile(), TileCoord::new(67233, 97263, 18));
    assert_eq!(grid.tile_count(), 182);

    let service = MosaicService::new(CheckerProvider::new(), 16);
    let (aerial, _, stats) = service
        .build_aerial(&bbox, 18, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(aerial.dimensions(), (3401, 3200));
    assert_eq!(stats.tiles, 182);

    // Each tile requested exactly once
    let requested = service.provider().requested();
    let unique: HashSet<_> = requested.iter().collect();
    assert_eq!(requested.len(), 182);
    assert_eq!(unique.len(), 182);
    assert!(requested.iter().all(|key| key.len() == 18));

    // Crop starts 176 px into the first column and 24 px into the first row
    let first = checker_color(&grid.min_tile());
    let second_column = checker_color(&TileCoord::new(67221, 97251, 18));
    assert_eq!(*aerial.get_pixel(0, 0), first);
    assert_eq!(*aerial.get_pixel(256 - 176 - 1, 0), first);
    assert_eq!(*aerial.get_pixel(256 - 176, 0), second_column);
}

#[tokio::test]
async fn test_fetch_respects_concurrency_limit() {
    let bbox = campus();
    let provider = CheckerProvider::new().with_delay(Duration::from_millis(2));
    let service = MosaicService::new(provider, 4);

    let (_, _, stats) = service
        .build_aerial(&bbox, 18, CancellationToken::new())
        .await
        .unwrap();

    assert!(stats.peak_in_flight <= 4);
    assert!(service.provider().peak.load(Ordering::SeqCst) <= 4);
    assert_eq!(service.limiter().in_flight(), 0);
}

#[tokio::test]
async fn test_full_run_with_streets_and_shrink() {
    let dir = tempfile::tempdir().unwrap();
    let bbox = campus();
    let service = MosaicService::new(CheckerProvider::new(), 16);

    let streets = PolylineLayer::new(vec![vec![
        GeoPoint::new(42.056, bbox.west()),
        GeoPoint::new(42.056, bbox.east()),
    ]])
    .with_stroke_width(3.0);

    let request = MosaicRequest::new(bbox, 18, dir.path().join("campus.png"))
        .with_aerial_output(dir.path().join("campus_aerial.png"))
        .with_shrink_factor(5)
        .with_filter(ResampleFilter::Nearest);

    let report = service
        .run(&request, Arc::new(streets), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.aerial_size, (3401, 3200));
    assert_eq!(report.output_size, (680, 640));

    let merged = image::open(&request.output).unwrap().to_rgb8();
    let aerial = image::open(dir.path().join("campus_aerial.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!(merged.dimensions(), (680, 640));
    assert_eq!(aerial.dimensions(), (680, 640));

    // The street is white in the merged raster and nowhere in the aerial one
    assert!(merged.pixels().any(|p| *p == Rgb([255, 255, 255])));
    assert!(!aerial.pixels().any(|p| *p == Rgb([255, 255, 255])));
    // Away from the street the mosaic is the aerial imagery
    assert_eq!(merged.get_pixel(0, 0), aerial.get_pixel(0, 0));
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_unavailable_tile_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let bbox = campus();
    let grid = plan_grid(&bbox, 18).unwrap();
    let missing = grid.tile_at(5, 7).unwrap();

    let service = MosaicService::new(CheckerProvider::new().without(missing), 8);
    let request = MosaicRequest::new(bbox, 18, dir.path().join("campus.png"))
        .with_aerial_output(dir.path().join("campus_aerial.png"));

    let result = service
        .run(&request, Arc::new(BlankLayer), CancellationToken::new())
        .await;

    match result {
        Err(MosaicError::TileUnavailable { tile, source }) => {
            assert_eq!(tile, missing);
            assert!(matches!(source, ProviderError::NotFound(_)));
        }
        Err(other) => panic!("expected TileUnavailable, got {}", other),
        Ok(_) => panic!("expected TileUnavailable, got a mosaic"),
    }
    assert!(!dir.path().join("campus.png").exists());
    assert!(!dir.path().join("campus_aerial.png").exists());
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let bbox = BoundingBox::new(41.0, 40.5, -73.6, -74.5).unwrap();
    let provider = RetryingProvider::new(
        FirstAttemptFails {
            inner: CheckerProvider::new(),
            seen: Mutex::new(HashSet::new()),
            failures: AtomicUsize::new(0),
        },
        2,
    )
    .with_initial_backoff(Duration::from_millis(1));
    let service = MosaicService::new(provider, 4);

    let (aerial, grid, stats) = service
        .build_aerial(&bbox, 10, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stats.tiles, 9);
    assert_eq!(aerial.width(), grid.crop().width());
    assert_eq!(
        service.provider().inner().failures.load(Ordering::SeqCst),
        9
    );
}

#[tokio::test]
async fn test_cancellation_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let bbox = campus();
    let service = MosaicService::new(
        CheckerProvider::new().with_delay(Duration::from_millis(20)),
        2,
    );
    let request = MosaicRequest::new(bbox, 18, dir.path().join("campus.png"));

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        canceller.cancel();
    });

    let result = service.run(&request, Arc::new(BlankLayer), token).await;

    assert!(matches!(result, Err(MosaicError::Cancelled)));
    assert!(!request.output.exists());
    assert!(service.provider().requested().len() < 182);
}
