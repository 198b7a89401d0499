//! aerialstitch CLI - Command-line interface
//!
//! This binary provides a command-line interface to the aerialstitch library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::{BoundsArgs, FilterArg};
use commands::quadkey::QuadkeyCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "aerialstitch")]
#[command(version = aerialstitch::VERSION)]
#[command(about = "Build aerial imagery mosaics from Web-Mercator tiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, stitch and composite a mosaic for a bounding box
    Mosaic {
        #[command(flatten)]
        bounds: BoundsArgs,

        /// Output file path (format from extension: .png, .jpg, ...)
        #[arg(long)]
        output: PathBuf,

        /// Also save the aerial raster before merging (always PNG)
        #[arg(long)]
        aerial_output: Option<PathBuf>,

        /// Raster image to merge over the aerial imagery
        #[arg(long, conflicts_with = "streets")]
        overlay: Option<PathBuf>,

        /// GeoJSON file of street lines to draw over the aerial imagery
        #[arg(long)]
        streets: Option<PathBuf>,

        /// Shrink factor applied before merging (default from config.ini)
        #[arg(long)]
        shrink: Option<u32>,

        /// Resampling filter (default from config.ini)
        #[arg(long, value_enum)]
        filter: Option<FilterArg>,

        /// Tile URL template containing {quadkey} (default from config.ini)
        #[arg(long)]
        url_template: Option<String>,

        /// Maximum concurrent tile requests (default from config.ini)
        #[arg(long)]
        max_concurrent: Option<usize>,

        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,
    },

    /// Show the tile grid and crop window for a bounding box
    Plan {
        #[command(flatten)]
        bounds: BoundsArgs,
    },

    /// Convert between tile coordinates and quadkeys
    Quadkey {
        #[command(subcommand)]
        command: QuadkeyCommands,
    },

    /// Show pixel, tile and quadkey for a geographic point
    Locate {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Level of detail (0-23)
        #[arg(long)]
        zoom: u8,
    },
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Mosaic {
            bounds,
            output,
            aerial_output,
            overlay,
            streets,
            shrink,
            filter,
            url_template,
            max_concurrent,
            debug,
        } => commands::mosaic::run(commands::mosaic::MosaicArgs {
            bounds,
            output,
            aerial_output,
            overlay,
            streets,
            shrink,
            filter,
            url_template,
            max_concurrent,
            debug,
        }),
        Commands::Plan { bounds } => commands::plan::run(bounds),
        Commands::Quadkey { command } => commands::quadkey::run(command),
        Commands::Locate { lat, lon, zoom } => commands::locate::run(lat, lon, zoom),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_mosaic_command() {
        let cli = Cli::try_parse_from([
            "aerialstitch",
            "mosaic",
            "--north",
            "42.062451",
            "--south",
            "42.049705",
            "--east",
            "-87.668189",
            "--west",
            "-87.686433",
            "--zoom",
            "18",
            "--output",
            "campus.png",
            "--streets",
            "streets.geojson",
            "--filter",
            "nearest",
            "--shrink",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Mosaic {
                bounds,
                streets,
                filter,
                shrink,
                ..
            } => {
                assert_eq!(bounds.zoom, 18);
                assert_eq!(bounds.east, -87.668189);
                assert_eq!(streets, Some(PathBuf::from("streets.geojson")));
                assert_eq!(filter, Some(FilterArg::Nearest));
                assert_eq!(shrink, Some(5));
            }
            _ => panic!("expected mosaic command"),
        }
    }

    #[test]
    fn test_overlay_conflicts_with_streets() {
        let result = Cli::try_parse_from([
            "aerialstitch",
            "mosaic",
            "--north",
            "1",
            "--south",
            "0",
            "--east",
            "1",
            "--west",
            "0",
            "--zoom",
            "5",
            "--output",
            "out.png",
            "--overlay",
            "a.png",
            "--streets",
            "b.geojson",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_quadkey_decode() {
        let cli = Cli::try_parse_from(["aerialstitch", "quadkey", "decode", "213"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Quadkey {
                command: QuadkeyCommands::Decode { .. }
            }
        ));
    }
}
