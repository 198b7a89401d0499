//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`mosaic`] - Full pipeline: fetch, stitch, composite, write
//! - [`plan`] - Tile grid and crop window for a bounding box
//! - [`quadkey`] - Quadkey encode/decode
//! - [`locate`] - Pixel, tile and quadkey for a point

pub mod common;
pub mod locate;
pub mod mosaic;
pub mod plan;
pub mod quadkey;
