//! Quadkey commands - convert between tile coordinates and quadkeys.

use aerialstitch::coord::{quadkey_to_tile, tile_to_quadkey, TileCoord};
use clap::Subcommand;

use super::common::validate_zoom;
use crate::error::CliError;

/// Quadkey subcommands.
#[derive(Debug, Subcommand)]
pub enum QuadkeyCommands {
    /// Encode tile coordinates as a quadkey
    Encode {
        /// Tile column
        #[arg(long)]
        x: u32,

        /// Tile row
        #[arg(long)]
        y: u32,

        /// Level of detail (0-23); zoom 0 encodes to the empty key
        #[arg(long)]
        zoom: u8,
    },

    /// Decode a quadkey into tile coordinates
    Decode {
        /// Quadkey string of digits 0-3 (e.g., 120200223)
        key: String,
    },
}

/// Run a quadkey subcommand.
pub fn run(command: QuadkeyCommands) -> Result<(), CliError> {
    match command {
        QuadkeyCommands::Encode { x, y, zoom } => {
            println!("{}", encode(x, y, zoom)?);
        }
        QuadkeyCommands::Decode { key } => {
            let tile = quadkey_to_tile(&key)?;
            println!("x={} y={} zoom={}", tile.x, tile.y, tile.zoom);
        }
    }
    Ok(())
}

fn encode(x: u32, y: u32, zoom: u8) -> Result<String, CliError> {
    validate_zoom(zoom)?;
    Ok(tile_to_quadkey(&TileCoord::new(x, y, zoom))?.to_string())
}
