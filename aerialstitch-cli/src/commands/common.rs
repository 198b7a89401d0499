//! Common argument types shared across CLI commands.

use aerialstitch::coord::{MAX_ZOOM, MIN_ZOOM};
use aerialstitch::grid::BoundingBox;
use aerialstitch::overlay::ResampleFilter;
use clap::{Args, ValueEnum};

use crate::error::CliError;

/// Geographic bounding box and zoom level.
#[derive(Debug, Clone, Args)]
pub struct BoundsArgs {
    /// Northern edge latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub north: f64,

    /// Southern edge latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub south: f64,

    /// Eastern edge longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub east: f64,

    /// Western edge longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub west: f64,

    /// Level of detail (0-23); tiles are 256 px, world is 256·2^zoom px wide
    #[arg(long)]
    pub zoom: u8,
}

impl BoundsArgs {
    /// Validate the zoom and build the bounding box.
    pub fn to_bbox(&self) -> Result<BoundingBox, CliError> {
        validate_zoom(self.zoom)?;
        Ok(BoundingBox::new(self.north, self.south, self.east, self.west)?)
    }
}

/// Resampling filter selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FilterArg {
    /// Nearest neighbour (blocky, fastest)
    Nearest,
    /// Bilinear
    Triangle,
}

impl From<FilterArg> for ResampleFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => ResampleFilter::Nearest,
            FilterArg::Triangle => ResampleFilter::Triangle,
        }
    }
}

/// Reject zoom levels outside the tile system's range before any work.
pub fn validate_zoom(zoom: u8) -> Result<(), CliError> {
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        return Err(CliError::InvalidArgument(format!(
            "zoom level {} must be between {} and {}",
            zoom, MIN_ZOOM, MAX_ZOOM
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        bounds: BoundsArgs,
    }

    fn parse(args: &[&str]) -> BoundsArgs {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).bounds
    }

    #[test]
    fn test_negative_coordinates_parse() {
        let bounds = parse(&[
            "--north", "42.062451", "--south", "42.049705", "--east", "-87.668189", "--west",
            "-87.686433", "--zoom", "18",
        ]);
        let bbox = bounds.to_bbox().unwrap();
        assert_eq!(bbox.west(), -87.686433);
        assert_eq!(bbox.north(), 42.062451);
    }

    #[test]
    fn test_inverted_box_rejected() {
        let bounds = parse(&[
            "--north", "40", "--south", "41", "--east", "10", "--west", "9", "--zoom", "5",
        ]);
        assert!(matches!(bounds.to_bbox(), Err(CliError::Grid(_))));
    }

    #[test]
    fn test_zoom_out_of_range() {
        assert!(validate_zoom(23).is_ok());
        assert!(matches!(validate_zoom(24), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_filter_conversion() {
        assert_eq!(ResampleFilter::from(FilterArg::Nearest), ResampleFilter::Nearest);
        assert_eq!(ResampleFilter::from(FilterArg::Triangle), ResampleFilter::Triangle);
    }
}
