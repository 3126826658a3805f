//! Museum Collection API Client
//!
//! Searches the public collection API and resolves full artwork records.
//!
//! ## API Endpoints
//!
//! - **Search**: `{base}/search?q={query}&hasImages=true`
//! - **Object**: `{base}/objects/{id}`
//!
//! ## Pipeline
//!
//! A search is one request for matching identifiers followed by one detail
//! request per identifier. Detail requests run concurrently and fail
//! independently: an identifier whose record cannot be fetched or decoded is
//! left out of the result instead of failing the search. Results are sorted by
//! title, so the order never depends on which request finished first.
//!
//! ## Usage
//!
//! ```ignore
//! use core_catalog::CatalogClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new(http_client);
//! let artworks = client.search("Monet", 20).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{CatalogError, Result};
use crate::models::{sort_by_title, Artwork, ArtworkId};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Public collection API base URL
pub const DEFAULT_BASE_URL: &str = "https://collectionapi.metmuseum.org/public/collection/v1";

/// Number of identifiers resolved per search unless the caller asks otherwise
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Search endpoint response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    #[allow(dead_code)]
    total: Option<u64>,
    #[serde(rename = "objectIDs", default)]
    object_ids: Option<Vec<i64>>,
}

/// Read access to the remote catalog
///
/// [`CatalogClient`] is the production implementation. The trait exists so
/// the service layer can be exercised without a network.
#[async_trait]
pub trait ArtworkCatalog: Send + Sync {
    /// Search for artworks with images matching `query`.
    ///
    /// Resolves at most `limit` identifiers and returns the records that
    /// could be fetched, sorted by title.
    ///
    /// # Errors
    ///
    /// Only the initial search request can fail the operation:
    /// - [`CatalogError::InvalidInput`] for a blank query
    /// - [`CatalogError::Network`] on transport failure, [`CatalogError::HttpStatus`]
    ///   on a non-2xx status
    /// - [`CatalogError::Decode`] for a malformed search body
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Artwork>>;

    /// Fetch a single artwork record.
    async fn fetch_artwork(&self, id: ArtworkId) -> Result<Artwork>;
}

/// Collection API client
///
/// Stateless apart from its configuration; build it once and share it behind
/// an `Arc`.
pub struct CatalogClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    max_concurrent_fetches: Option<usize>,
    request_timeout: Option<Duration>,
}

impl CatalogClient {
    /// Creates a client for the public collection API
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent_fetches: None,
            request_timeout: None,
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Cap the number of detail requests in flight at once
    ///
    /// `None` (the default) issues every detail request of a search at once.
    pub fn with_max_concurrent_fetches(mut self, max: Option<usize>) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    /// Per-request timeout; without it the transport default applies
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the search URL for `query`
    fn search_url(&self, query: &str) -> Result<String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidInput(
                "query contains no searchable characters".to_string(),
            ));
        }

        Ok(format!(
            "{}/search?q={}&hasImages=true",
            self.base_url,
            urlencoding::encode(trimmed)
        ))
    }

    fn object_url(&self, id: ArtworkId) -> String {
        format!("{}/objects/{}", self.base_url, id)
    }

    fn request(&self, url: String) -> HttpRequest {
        let request = HttpRequest::get(url).accept_json();
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    fn check_status(response: &HttpResponse) -> Result<()> {
        if response.is_success() {
            return Ok(());
        }

        Err(CatalogError::HttpStatus {
            status: response.status,
            body: response.text(),
        })
    }

    /// Resolves matching identifiers, in the order the API returned them
    async fn search_ids(&self, query: &str) -> Result<Vec<i64>> {
        let url = self.search_url(query)?;
        debug!("Searching catalog: {}", url);

        let response = self
            .http_client
            .execute(self.request(url))
            .await
            .map_err(|e| CatalogError::Network(format!("Catalog search failed: {}", e)))?;

        Self::check_status(&response)?;

        let result: SearchResponse = serde_json::from_slice(&response.body).map_err(|e| {
            CatalogError::Decode(format!("Failed to parse search results: {}", e))
        })?;

        Ok(result.object_ids.unwrap_or_default())
    }

    /// Detail fetch that never fails the surrounding search
    async fn fetch_detail(&self, id: ArtworkId) -> Option<Artwork> {
        match self.fetch_artwork(id).await {
            Ok(artwork) => Some(artwork),
            Err(e) => {
                warn!(artwork_id = %id, error = %e, "Dropping artwork from results");
                None
            }
        }
    }
}

#[async_trait]
impl ArtworkCatalog for CatalogClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Artwork>> {
        let mut ids = self.search_ids(query).await?;
        let matched = ids.len();

        ids.truncate(limit);
        if ids.is_empty() {
            info!(matched, "No artworks to load");
            return Ok(Vec::new());
        }

        let requested = ids.len();
        let width = self
            .max_concurrent_fetches
            .unwrap_or(requested)
            .clamp(1, requested);

        debug!(requested, width, "Fetching artwork details");

        let mut artworks: Vec<Artwork> = stream::iter(ids)
            .map(|id| self.fetch_detail(ArtworkId(id)))
            .buffer_unordered(width)
            .filter_map(|artwork| async move { artwork })
            .collect()
            .await;

        sort_by_title(&mut artworks);

        info!(
            matched,
            requested,
            loaded = artworks.len(),
            "Catalog search completed"
        );

        Ok(artworks)
    }

    async fn fetch_artwork(&self, id: ArtworkId) -> Result<Artwork> {
        let url = self.object_url(id);
        debug!("Fetching artwork: {}", url);

        let response = self
            .http_client
            .execute(self.request(url))
            .await
            .map_err(|e| CatalogError::Network(format!("Artwork fetch failed: {}", e)))?;

        Self::check_status(&response)?;

        serde_json::from_slice(&response.body).map_err(|e| {
            CatalogError::Decode(format!("Failed to parse artwork {}: {}", id, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;

    struct UnreachableHttpClient;

    #[async_trait]
    impl HttpClient for UnreachableHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            panic!("no request expected");
        }
    }

    fn client() -> CatalogClient {
        CatalogClient::new(Arc::new(UnreachableHttpClient))
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client().search_url("  van Gogh & friends ").unwrap();
        assert_eq!(
            url,
            "https://collectionapi.metmuseum.org/public/collection/v1/search?q=van%20Gogh%20%26%20friends&hasImages=true"
        );
    }

    #[test]
    fn test_search_url_encodes_non_ascii() {
        let url = client().search_url("Моне").unwrap();
        assert!(url.contains("q=%D0%9C%D0%BE%D0%BD%D0%B5&"));
    }

    #[test]
    fn test_blank_query_is_invalid() {
        assert!(matches!(
            client().search_url("   "),
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(matches!(
            client().search_url(""),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client().with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
        assert_eq!(
            client.object_url(ArtworkId(42)),
            "http://localhost:8080/v1/objects/42"
        );
    }

    #[test]
    fn test_request_timeout_applied() {
        let client = client().with_request_timeout(Some(Duration::from_secs(5)));
        let request = client.request("http://localhost/objects/1".to_string());
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
        assert_eq!(
            request.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_search_response_absent_ids() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"total": 0, "objectIDs": null}"#).unwrap();
        assert!(parsed.object_ids.is_none());

        let parsed: SearchResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(parsed.object_ids.is_none());
    }
}
