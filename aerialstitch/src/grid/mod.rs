//! Tile grid planning.
//!
//! Turns a geographic bounding box into the smallest rectangle of whole tiles
//! that covers it, plus the crop window that cuts the stitched tiles back
//! down to the exact box.
//!
//! ```text
//!  tile (x_min, y_min) origin
//!  ┌────────┬────────┬────────┐
//!  │   ┌────┼────────┼───┐    │  ◀─ crop.top
//!  │   │    │        │   │    │
//!  ├───┼────┼────────┼───┼────┤
//!  │   │    │        │   │    │
//!  │   └────┼────────┼───┘    │  ◀─ crop.bottom
//!  └────────┴────────┴────────┘
//!      ▲                 ▲
//!   crop.left        crop.right
//! ```

mod bbox;
mod planner;

pub use bbox::BoundingBox;
pub use planner::{plan_grid, CropWindow, TileGrid, TileGridIter};

use crate::coord::CoordError;
use thiserror::Error;

/// Errors raised while validating a bounding box or planning its grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The box has no area (north <= south, east <= west) or rounds to zero pixels
    #[error("degenerate bounding box: {0}")]
    DegenerateBoundingBox(String),

    /// A corner could not be projected
    #[error(transparent)]
    Coord(#[from] CoordError),
}
