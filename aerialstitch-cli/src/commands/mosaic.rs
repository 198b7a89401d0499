//! Mosaic command - fetch, stitch and composite an aerial mosaic.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use aerialstitch::config::DownloadConfig;
use aerialstitch::mosaic::{MosaicRequest, MosaicService};
use aerialstitch::overlay::{
    BlankLayer, PolylineLayer, RasterFileLayer, ResampleFilter, VectorLayerRenderer,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::common::{BoundsArgs, FilterArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the mosaic command.
pub struct MosaicArgs {
    pub bounds: BoundsArgs,
    pub output: PathBuf,
    pub aerial_output: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
    pub streets: Option<PathBuf>,
    pub shrink: Option<u32>,
    pub filter: Option<FilterArg>,
    pub url_template: Option<String>,
    pub max_concurrent: Option<usize>,
    pub debug: bool,
}

/// Run the mosaic command.
pub fn run(args: MosaicArgs) -> Result<(), CliError> {
    let bbox = args.bounds.to_bbox()?;
    let zoom = args.bounds.zoom;

    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("mosaic");
    let config = runner.config();

    // CLI flags override config.ini
    let filter = args
        .filter
        .map(ResampleFilter::from)
        .unwrap_or(config.output.filter);
    let shrink = args.shrink.unwrap_or(config.output.shrink_factor);
    if shrink == 0 {
        return Err(CliError::InvalidArgument(
            "--shrink must be at least 1".to_string(),
        ));
    }
    let url_template = args
        .url_template
        .as_deref()
        .unwrap_or(&config.provider.url_template);
    let mut download = DownloadConfig::from(&config.download);
    if let Some(max_concurrent) = args.max_concurrent {
        download = download.with_max_concurrent(max_concurrent);
    }

    let layer = load_layer(&args, filter)?;
    let provider = runner.create_provider(&download, url_template)?;
    let service = MosaicService::new(provider, download.max_concurrent());

    let mut request = MosaicRequest::new(bbox, zoom, &args.output)
        .with_shrink_factor(shrink)
        .with_filter(filter);
    if let Some(path) = &args.aerial_output {
        request = request.with_aerial_output(path);
    }

    println!("Building mosaic for:");
    println!("  Box: {}", bbox);
    println!("  Zoom: {}", zoom);
    println!("  Concurrency: {}", download.max_concurrent());
    println!();

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let start = Instant::now();

    let report = runtime.block_on(async {
        let cancellation = CancellationToken::new();
        let signal_token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling outstanding tile requests");
                signal_token.cancel();
            }
        });

        service.run(&request, layer, cancellation).await
    })?;

    let elapsed = start.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "Mosaic command finished");

    println!(
        "Fetched {} tiles ({} bytes, peak {} in flight) in {:.2}s",
        report.fetch.tiles,
        report.fetch.bytes,
        report.fetch.peak_in_flight,
        report.fetch.elapsed.as_secs_f64()
    );
    if let Some(path) = &report.aerial_output {
        println!(
            "Aerial:  {} ({}x{})",
            path.display(),
            report.aerial_size.0,
            report.aerial_size.1
        );
    }
    println!(
        "Mosaic:  {} ({}x{})",
        report.output.display(),
        report.output_size.0,
        report.output_size.1
    );
    println!("Done in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Pick the overlay renderer from the command-line flags.
fn load_layer(
    args: &MosaicArgs,
    filter: ResampleFilter,
) -> Result<Arc<dyn VectorLayerRenderer>, CliError> {
    match (&args.overlay, &args.streets) {
        (Some(_), Some(_)) => Err(CliError::InvalidArgument(
            "--overlay and --streets cannot be combined".to_string(),
        )),
        (Some(path), None) => {
            if !path.is_file() {
                return Err(CliError::InvalidArgument(format!(
                    "overlay image '{}' does not exist",
                    path.display()
                )));
            }
            info!(path = %path.display(), "Using raster overlay");
            Ok(Arc::new(RasterFileLayer::new(path).with_filter(filter)))
        }
        (None, Some(path)) => {
            let layer = PolylineLayer::from_geojson_file(path)?;
            info!(path = %path.display(), lines = layer.lines().len(), "Using street overlay");
            Ok(Arc::new(layer))
        }
        (None, None) => Ok(Arc::new(BlankLayer)),
    }
}
