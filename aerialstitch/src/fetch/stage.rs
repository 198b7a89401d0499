//! Permit-bounded fetch of a whole tile grid.

use super::{FetchError, FetchLimiter, FetchPermit};
use crate::coord::{tile_to_quadkey, TileCoord};
use crate::grid::TileGrid;
use crate::provider::{ProviderError, TileProvider};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

/// Counters for one grid fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Tiles fetched successfully
    pub tiles: usize,
    /// Total encoded bytes received
    pub bytes: u64,
    /// Highest number of this fetch's requests in flight at once
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

/// Encoded rasters for every tile of a grid, in row-major order.
#[derive(Debug, Clone)]
pub struct FetchedTiles {
    grid: TileGrid,
    tiles: Vec<Vec<u8>>,
    stats: FetchStats,
}

impl FetchedTiles {
    /// Builds a complete tile set.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Internal` if `tiles` does not hold exactly one
    /// entry per grid tile.
    pub fn new(grid: TileGrid, tiles: Vec<Vec<u8>>) -> Result<Self, FetchError> {
        if tiles.len() != grid.tile_count() {
            return Err(FetchError::Internal(format!(
                "expected {} tiles, got {}",
                grid.tile_count(),
                tiles.len()
            )));
        }
        let stats = FetchStats {
            tiles: tiles.len(),
            bytes: tiles.iter().map(|t| t.len() as u64).sum(),
            ..FetchStats::default()
        };
        Ok(Self { grid, tiles, stats })
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Encoded raster of the tile at a grid-relative column and row.
    pub fn get(&self, column: u32, row: u32) -> Option<&[u8]> {
        if column >= self.grid.columns() || row >= self.grid.rows() {
            return None;
        }
        let index = row as usize * self.grid.columns() as usize + column as usize;
        self.tiles.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

type TileOutcome = (usize, TileCoord, Result<Vec<u8>, ProviderError>);

/// Fetches every tile in `grid`.
///
/// Tasks are spawned one at a time as permits become available from
/// `limiter`. The first permanent failure cancels `cancellation_token`,
/// aborts the remaining tasks and is returned as
/// [`FetchError::TileUnavailable`]. Cancelling the token from outside stops
/// the fetch with [`FetchError::Cancelled`].
#[instrument(skip_all, fields(zoom = grid.zoom(), tiles = grid.tile_count(), provider = provider.name()))]
pub async fn fetch_grid<P>(
    grid: &TileGrid,
    provider: Arc<P>,
    limiter: Arc<FetchLimiter>,
    cancellation_token: CancellationToken,
) -> Result<FetchedTiles, FetchError>
where
    P: TileProvider + 'static,
{
    let started = Instant::now();
    let mut pending: VecDeque<(usize, TileCoord)> = grid.tiles().enumerate().collect();
    let mut slots: Vec<Option<Vec<u8>>> = vec![None; grid.tile_count()];
    let mut tasks: JoinSet<TileOutcome> = JoinSet::new();
    let mut bytes = 0u64;
    let mut peak_in_flight = 0usize;

    while !pending.is_empty() || !tasks.is_empty() {
        if cancellation_token.is_cancelled() {
            debug!(
                pending = pending.len(),
                active = tasks.len(),
                "Fetch cancelled, aborting remaining tiles"
            );
            tasks.abort_all();
            return Err(FetchError::Cancelled);
        }

        // Spawn as many tasks as there are free permits
        while let Some(&(index, tile)) = pending.front() {
            let Some(permit) = limiter.try_acquire() else {
                break;
            };
            pending.pop_front();
            spawn_fetch(&mut tasks, index, tile, &provider, permit)?;
        }
        peak_in_flight = peak_in_flight.max(tasks.len());

        if tasks.is_empty() {
            // Permits are all held elsewhere; wait for one
            let Some(&(index, tile)) = pending.front() else {
                continue;
            };
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => continue,

                permit = limiter.acquire() => {
                    pending.pop_front();
                    spawn_fetch(&mut tasks, index, tile, &provider, permit?)?;
                    peak_in_flight = peak_in_flight.max(tasks.len());
                }
            }
            continue;
        }

        tokio::select! {
            biased;

            _ = cancellation_token.cancelled() => continue,

            joined = tasks.join_next() => match joined {
                Some(Ok((index, tile, Ok(data)))) => {
                    trace!(tile = %tile, bytes = data.len(), "Tile fetched");
                    bytes += data.len() as u64;
                    slots[index] = Some(data);
                }
                Some(Ok((_, tile, Err(source)))) => {
                    warn!(tile = %tile, error = %source, "Tile fetch failed, abandoning grid");
                    cancellation_token.cancel();
                    tasks.abort_all();
                    return Err(FetchError::TileUnavailable { tile, source });
                }
                Some(Err(join_err)) => {
                    cancellation_token.cancel();
                    tasks.abort_all();
                    return Err(FetchError::Internal(format!(
                        "fetch task failed: {}",
                        join_err
                    )));
                }
                None => {}
            }
        }
    }

    let tiles = slots
        .into_iter()
        .zip(grid.tiles())
        .map(|(slot, tile)| {
            slot.ok_or_else(|| FetchError::Internal(format!("tile {} was never fetched", tile)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let stats = FetchStats {
        tiles: tiles.len(),
        bytes,
        peak_in_flight,
        elapsed: started.elapsed(),
    };

    debug!(
        tiles = stats.tiles,
        bytes = stats.bytes,
        peak_in_flight = stats.peak_in_flight,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "Grid fetch complete"
    );

    Ok(FetchedTiles {
        grid: *grid,
        tiles,
        stats,
    })
}

fn spawn_fetch<P>(
    tasks: &mut JoinSet<TileOutcome>,
    index: usize,
    tile: TileCoord,
    provider: &Arc<P>,
    permit: FetchPermit,
) -> Result<(), FetchError>
where
    P: TileProvider + 'static,
{
    let quadkey = tile_to_quadkey(&tile)?;
    let provider = Arc::clone(provider);

    tasks.spawn(async move {
        let _permit = permit;
        let result = provider.fetch(&quadkey).await;
        (index, tile, result)
    });

    Ok(())
}
