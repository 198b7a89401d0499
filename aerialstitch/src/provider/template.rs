//! URL-template tile provider

use super::http::AsyncHttpClient;
use super::types::{ProviderError, TileProvider};
use crate::coord::QuadKey;

/// Placeholder substituted with the tile's quadkey.
pub const QUADKEY_PLACEHOLDER: &str = "{quadkey}";

/// Default aerial imagery endpoint (Bing Maps aerial layer).
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://ecn.t0.tiles.virtualearth.net/tiles/a{quadkey}.jpeg?g=8549";

/// Tile provider that fetches over HTTP from a quadkey URL template.
///
/// Any server addressing tiles by Bing-style quadkeys works, as long as
/// the template contains a `{quadkey}` placeholder.
pub struct HttpTileProvider<C: AsyncHttpClient> {
    http_client: C,
    url_template: String,
}

impl<C: AsyncHttpClient> HttpTileProvider<C> {
    /// Creates a provider for the default aerial endpoint.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }

    /// Creates a provider with a custom URL template.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ProviderSpecific` if the template lacks the
    /// `{quadkey}` placeholder.
    pub fn with_url_template(
        http_client: C,
        url_template: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let url_template = url_template.into();
        if !url_template.contains(QUADKEY_PLACEHOLDER) {
            return Err(ProviderError::ProviderSpecific(format!(
                "URL template '{}' has no {} placeholder",
                url_template, QUADKEY_PLACEHOLDER
            )));
        }
        Ok(Self {
            http_client,
            url_template,
        })
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Constructs the download URL for a tile.
    fn build_url(&self, quadkey: &QuadKey) -> String {
        self.url_template
            .replace(QUADKEY_PLACEHOLDER, quadkey.as_str())
    }
}

impl<C: AsyncHttpClient> TileProvider for HttpTileProvider<C> {
    async fn fetch(&self, quadkey: &QuadKey) -> Result<Vec<u8>, ProviderError> {
        let url = self.build_url(quadkey);
        let data = self.http_client.get(&url).await?;

        if data.is_empty() {
            return Err(ProviderError::InvalidResponse(format!(
                "empty body for tile {}",
                quadkey
            )));
        }
        Ok(data)
    }

    fn name(&self) -> &str {
        "HTTP quadkey template"
    }
}
