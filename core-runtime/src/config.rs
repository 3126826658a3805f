//! # Gallery Configuration Module
//!
//! Provides configuration management for the gallery core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `GalleryConfig` holding the bridges and tunables the search pipeline and
//! the favorites store need. It enforces fail-fast validation so that every
//! required bridge is present before the service starts.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - Catalog API requests
//! - `SettingsStore` - Favorites persistence
//!
//! When the `desktop-shims` feature is enabled, a reqwest-backed `HttpClient`
//! and a SQLite-backed `SettingsStore` are injected automatically if not
//! provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::GalleryConfig;
//! use std::sync::Arc;
//!
//! let config = GalleryConfig::builder()
//!     .search_limit(40)
//!     .max_concurrent_fetches(8)
//!     .http_client(Arc::new(MyHttpClient))
//!     .settings_store(Arc::new(MySettingsStore))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! Without the `desktop-shims` feature a missing bridge is reported as
//! [`Error::CapabilityMissing`](crate::error::Error::CapabilityMissing) with
//! an actionable message. Out-of-range values are reported as
//! [`Error::Config`](crate::error::Error::Config).

use crate::error::{Error, Result};
use bridge_traits::{HttpClient, SettingsStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub use core_catalog::{DEFAULT_BASE_URL, DEFAULT_SEARCH_LIMIT};
pub use core_favorites::DEFAULT_FAVORITES_KEY;

/// Upper bound accepted for `search_limit`
pub const MAX_SEARCH_LIMIT: usize = 500;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Core configuration for the gallery.
///
/// Use [`GalleryConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct GalleryConfig {
    /// Catalog API root, without a trailing slash
    pub base_url: String,

    /// Maximum identifiers fetched per search
    pub search_limit: usize,

    /// Settings key for the favorites blob
    pub favorites_key: String,

    /// Maximum detail fetches in flight per search (`None` = all at once)
    pub max_concurrent_fetches: Option<usize>,

    /// Per-request timeout applied to catalog calls
    pub request_timeout: Duration,

    /// Location of the default settings database
    pub settings_path: Option<PathBuf>,

    /// HTTP client for catalog requests
    pub http_client: Arc<dyn HttpClient>,

    /// Key-value storage for favorites
    pub settings_store: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for GalleryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryConfig")
            .field("base_url", &self.base_url)
            .field("search_limit", &self.search_limit)
            .field("favorites_key", &self.favorites_key)
            .field("max_concurrent_fetches", &self.max_concurrent_fetches)
            .field("request_timeout", &self.request_timeout)
            .field("settings_path", &self.settings_path)
            .field("http_client", &"HttpClient { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .finish()
    }
}

impl GalleryConfig {
    /// Creates a new builder for constructing a `GalleryConfig`.
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Base URL is an absolute http(s) URL
    /// - Search limit is within `1..=MAX_SEARCH_LIMIT`
    /// - Favorites key is not blank
    /// - Concurrency cap, if set, is greater than zero
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.search_limit == 0 {
            return Err(Error::Config(
                "Search limit must be greater than 0".to_string(),
            ));
        }

        if self.search_limit > MAX_SEARCH_LIMIT {
            return Err(Error::Config(format!(
                "Search limit exceeds maximum of {}",
                MAX_SEARCH_LIMIT
            )));
        }

        if self.favorites_key.trim().is_empty() {
            return Err(Error::Config("Favorites key cannot be empty".to_string()));
        }

        if self.max_concurrent_fetches == Some(0) {
            return Err(Error::Config(
                "Concurrent fetch limit must be greater than 0 when set".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for catalog requests. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Other hosts: inject a platform-native HTTP client."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for saved favorites. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default SqliteSettingsStore. \
                 Other hosts: inject platform-native key-value storage."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::bridge_init("HttpClient", e.to_string()))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_settings_store(settings_path: Option<&Path>) -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::SqliteSettingsStore;
    use std::thread;
    use tokio::runtime::{Handle, Runtime};

    let candidate = settings_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_settings_path);

    let init_store = |path: PathBuf| -> Result<_> {
        let runtime = Runtime::new()
            .map_err(|e| Error::bridge_init("SettingsStore", format!("no runtime: {}", e)))?;

        runtime
            .block_on(SqliteSettingsStore::new(path))
            .map_err(|e| Error::bridge_init("SettingsStore", e.to_string()))
    };

    // A runtime cannot be blocked on from inside another one
    let store = match Handle::try_current() {
        Ok(_) => {
            let path = candidate.clone();
            thread::spawn(move || init_store(path))
                .join()
                .map_err(|_| Error::bridge_init("SettingsStore", "worker thread panicked"))??
        }
        Err(_) => init_store(candidate)?,
    };

    let store: Arc<dyn SettingsStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_settings_store(_settings_path: Option<&Path>) -> Result<Arc<dyn SettingsStore>> {
    Err(settings_store_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn default_settings_path() -> PathBuf {
    std::env::temp_dir().join("gallery-core").join("settings.db")
}

/// Builder for constructing [`GalleryConfig`] instances.
///
/// Call [`build()`](GalleryConfigBuilder::build) to validate and create the
/// final config.
#[derive(Default)]
pub struct GalleryConfigBuilder {
    base_url: Option<String>,
    search_limit: Option<usize>,
    favorites_key: Option<String>,
    max_concurrent_fetches: Option<usize>,
    request_timeout: Option<Duration>,
    settings_path: Option<PathBuf>,
    http_client: Option<Arc<dyn HttpClient>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
}

impl GalleryConfigBuilder {
    /// Sets the catalog API root.
    ///
    /// Default: [`DEFAULT_BASE_URL`]. A trailing slash is removed.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets how many identifiers are taken from each search response.
    ///
    /// Default: 20
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::GalleryConfig;
    ///
    /// let builder = GalleryConfig::builder().search_limit(50);
    /// ```
    pub fn search_limit(mut self, limit: usize) -> Self {
        self.search_limit = Some(limit);
        self
    }

    /// Sets the settings key favorites are persisted under.
    ///
    /// Default: `saved_art_v1`
    pub fn favorites_key(mut self, key: impl Into<String>) -> Self {
        self.favorites_key = Some(key.into());
        self
    }

    /// Caps how many detail fetches run at once.
    ///
    /// Unset by default, meaning every detail fetch of a search is in flight
    /// at the same time.
    pub fn max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = Some(limit);
        self
    }

    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets where the default SQLite settings store keeps its file.
    ///
    /// Ignored when a settings store is injected.
    pub fn settings_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Builds the configuration, validating all dependencies.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if a bridge is absent and no default
    ///   exists for this build
    /// - [`Error::Config`] if a value is out of range
    /// - [`Error::BridgeInit`] if a default bridge fails to initialize
    pub fn build(self) -> Result<GalleryConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let settings_store = match self.settings_store {
            Some(store) => store,
            None => provide_default_settings_store(self.settings_path.as_deref())?,
        };

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = GalleryConfig {
            base_url,
            search_limit: self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            favorites_key: self
                .favorites_key
                .unwrap_or_else(|| DEFAULT_FAVORITES_KEY.to_string()),
            max_concurrent_fetches: self.max_concurrent_fetches,
            request_timeout,
            settings_path: self.settings_path,
            http_client,
            settings_store,
        };

        config.validate()?;

        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpRequest, HttpResponse};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    // Mock implementations for testing
    struct MockHttpClient;

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse::new(200, "{}"))
        }
    }

    #[derive(Default)]
    struct MockSettingsStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl SettingsStore for MockSettingsStore {
        async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
            self.values
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
            Ok(self.values.lock().await.get(key).cloned())
        }
    }

    fn with_mocks() -> GalleryConfigBuilder {
        GalleryConfig::builder()
            .http_client(Arc::new(MockHttpClient))
            .settings_store(Arc::new(MockSettingsStore::default()))
    }

    #[test]
    fn test_defaults() {
        let config = with_mocks().build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.search_limit, 20);
        assert_eq!(config.favorites_key, "saved_art_v1");
        assert_eq!(config.max_concurrent_fetches, None);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.settings_path.is_none());
    }

    #[test]
    fn test_defaults_match_catalog_and_favorites() {
        let config = with_mocks().build().unwrap();
        let catalog = core_catalog::CatalogClient::new(Arc::clone(&config.http_client));

        assert_eq!(config.base_url, catalog.base_url());
        assert_eq!(config.search_limit, core_catalog::DEFAULT_SEARCH_LIMIT);
        assert_eq!(config.favorites_key, core_favorites::DEFAULT_FAVORITES_KEY);
    }

    #[test]
    fn test_custom_values() {
        let config = with_mocks()
            .base_url("http://localhost:8080/v1/")
            .search_limit(5)
            .favorites_key("saved_art_test")
            .max_concurrent_fetches(3)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.search_limit, 5);
        assert_eq!(config.favorites_key, "saved_art_test");
        assert_eq!(config.max_concurrent_fetches, Some(3));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_search_limit_rejected() {
        let result = with_mocks().search_limit(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_search_limit_upper_bound() {
        assert!(with_mocks().search_limit(MAX_SEARCH_LIMIT).build().is_ok());

        let result = with_mocks().search_limit(MAX_SEARCH_LIMIT + 1).build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("maximum")));
    }

    #[test]
    fn test_blank_favorites_key_rejected() {
        let result = with_mocks().favorites_key("   ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_concurrency_cap_rejected() {
        let result = with_mocks().max_concurrent_fetches(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = with_mocks().request_timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let result = with_mocks().base_url("ftp://example.org").build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("http")));
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = with_mocks().build().unwrap();
        let debug = format!("{:?}", config);

        assert!(debug.contains("HttpClient { ... }"));
        assert!(debug.contains("saved_art_v1"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_http_client_is_capability_error() {
        let result = GalleryConfig::builder()
            .settings_store(Arc::new(MockSettingsStore::default()))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, message }) => {
                assert_eq!(capability, "HttpClient");
                assert!(message.contains("desktop-shims"));
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_settings_store_is_capability_error() {
        let result = GalleryConfig::builder()
            .http_client(Arc::new(MockHttpClient))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "SettingsStore"
        ));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_defaults() {
        use tokio::runtime::Runtime;
        use uuid::Uuid;

        let base = std::env::temp_dir().join(format!("core-runtime-test-{}", Uuid::new_v4()));
        let settings_path = base.join("settings.db");

        let config = GalleryConfig::builder()
            .settings_path(&settings_path)
            .build()
            .unwrap();
        assert!(settings_path.exists());

        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let settings = config.settings_store.clone();
            settings.set_string("saved_art_v1", "[]").await.unwrap();
            let value = settings.get_string("saved_art_v1").await.unwrap();
            assert_eq!(value.as_deref(), Some("[]"));
        });

        let _ = std::fs::remove_dir_all(base);
    }

    #[cfg(feature = "desktop-shims")]
    #[tokio::test]
    async fn test_build_with_desktop_defaults_inside_runtime() {
        use uuid::Uuid;

        let base = std::env::temp_dir().join(format!("core-runtime-test-{}", Uuid::new_v4()));
        let config = GalleryConfig::builder()
            .settings_path(base.join("settings.db"))
            .build()
            .unwrap();

        assert_eq!(
            config.settings_store.get_string("saved_art_v1").await.unwrap(),
            None
        );

        let _ = std::fs::remove_dir_all(base);
    }
}
