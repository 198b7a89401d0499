//! End-to-end mosaic building.
//!
//! ```text
//! BoundingBox ─plan_grid─▶ TileGrid ─fetch_grid─▶ FetchedTiles ─stitch─▶ aerial
//!                                                                          │
//!                                   layer.render ─▶ overlay ──merge_or─────┤
//!                                                                          ▼
//!                                                                   output file
//! ```
//!
//! ```ignore
//! use aerialstitch::mosaic::{MosaicRequest, MosaicService};
//! use aerialstitch::overlay::BlankLayer;
//!
//! let service = MosaicService::new(provider, 16);
//! let report = service.run(&request, Arc::new(BlankLayer), CancellationToken::new()).await?;
//! ```

mod error;
mod request;
mod service;

pub use error::MosaicError;
pub use request::{MosaicReport, MosaicRequest};
pub use service::MosaicService;
