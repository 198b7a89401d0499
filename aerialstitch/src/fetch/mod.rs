//! Bounded concurrent tile fetching.
//!
//! Every tile of a [`TileGrid`](crate::grid::TileGrid) is fetched through a
//! [`TileProvider`](crate::provider::TileProvider) on a Tokio `JoinSet`. A
//! shared [`FetchLimiter`] caps the number of in-flight requests and tasks
//! are only spawned once a permit is held, so queued tiles never count as
//! active requests.
//!
//! The grid is joined as a single barrier: [`fetch_grid`] returns only when
//! every tile has arrived, or fails on the first permanent error.

mod limiter;
mod stage;

pub use limiter::{FetchLimiter, FetchPermit, DEFAULT_MAX_CONCURRENT};
pub use stage::{fetch_grid, FetchStats, FetchedTiles};

use crate::coord::{CoordError, TileCoord};
use crate::provider::ProviderError;
use thiserror::Error;

/// Errors from the fetch stage.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A tile could not be fetched; the whole grid is abandoned.
    #[error("tile {tile} unavailable: {source}")]
    TileUnavailable {
        tile: TileCoord,
        #[source]
        source: ProviderError,
    },

    /// The cancellation token fired before the grid completed.
    #[error("fetch cancelled")]
    Cancelled,

    #[error(transparent)]
    Coord(#[from] CoordError),

    /// A fetch task panicked or the limiter closed.
    #[error("internal error: {0}")]
    Internal(String),
}
