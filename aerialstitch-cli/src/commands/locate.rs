//! Locate command - show where a geographic point falls in the tile system.

use aerialstitch::coord::{
    ground_resolution, lat_lon_to_pixel, map_scale, pixel_to_tile, tile_to_quadkey,
};

use super::common::validate_zoom;
use crate::error::CliError;

/// Screen resolution used for the printed map scale.
const SCREEN_DPI: f64 = 96.0;

/// Run the locate command.
pub fn run(lat: f64, lon: f64, zoom: u8) -> Result<(), CliError> {
    for line in describe(lat, lon, zoom)? {
        println!("{}", line);
    }
    Ok(())
}

fn describe(lat: f64, lon: f64, zoom: u8) -> Result<Vec<String>, CliError> {
    validate_zoom(zoom)?;

    let pixel = lat_lon_to_pixel(lat, lon, zoom)?;
    let tile = pixel_to_tile(&pixel);
    let quadkey = tile_to_quadkey(&tile)?;

    Ok(vec![
        format!("Location:          {}, {}", lat, lon),
        format!("Pixel:             x={} y={} (zoom {})", pixel.x, pixel.y, zoom),
        format!("Tile:              x={} y={}", tile.x, tile.y),
        format!("Quadkey:           {}", quadkey),
        format!(
            "Ground resolution: {:.4} m/px",
            ground_resolution(lat, zoom)?
        ),
        format!(
            "Map scale:         1:{:.0} at {} dpi",
            map_scale(lat, zoom, SCREEN_DPI)?,
            SCREEN_DPI
        ),
    ])
}
