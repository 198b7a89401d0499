//! Aerial imagery provider abstraction
//!
//! A [`TileProvider`] turns a quadkey into encoded raster bytes. The crate
//! ships an HTTP implementation driven by a URL template and a retry
//! decorator; tests and embedders can supply their own.
//!
//! ```ignore
//! use aerialstitch::provider::{AsyncReqwestClient, HttpTileProvider, RetryingProvider};
//!
//! let client = AsyncReqwestClient::new()?;
//! let provider = RetryingProvider::new(HttpTileProvider::new(client), 3);
//! ```

mod http;
mod retry;
mod template;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use retry::{RetryingProvider, DEFAULT_INITIAL_BACKOFF};
pub use template::{HttpTileProvider, DEFAULT_URL_TEMPLATE, QUADKEY_PLACEHOLDER};
pub use types::{ProviderError, TileProvider};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
