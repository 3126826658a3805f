//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, settings)
//! into the catalog search pipeline and the favorites store, and exposes the
//! result as a single [`GalleryService`] handle. Desktop apps typically enable
//! the `desktop-shims` feature (which depends on `bridge-desktop`) so the
//! default reqwest client and SQLite settings store are injected.
//!
//! Presentation code either polls [`GalleryService::state`] or listens on
//! [`GalleryService::subscribe`] and re-renders on each [`CoreEvent`].
//!
//! ```ignore
//! use core_runtime::config::GalleryConfig;
//! use core_service::{GalleryService, SearchOutcome};
//!
//! let gallery = GalleryService::bootstrap(GalleryConfig::builder()).await?;
//! if let SearchOutcome::Found(count) = gallery.search("Monet").await {
//!     println!("{} artworks", count);
//! }
//! ```

pub mod error;
pub mod state;

pub use error::{CoreError, Result};
pub use core_favorites::FavoriteChange;
pub use state::{GalleryState, SearchOutcome, FAILED_TO_LOAD_MESSAGE, NOTHING_FOUND_MESSAGE};

use std::sync::Arc;

use core_catalog::{Artwork, ArtworkCatalog, ArtworkId, CatalogClient};
use core_favorites::FavoritesStore;
use core_runtime::config::{GalleryConfig, GalleryConfigBuilder};
use core_runtime::events::{CoreEvent, EventBus, EventStream, FavoritesEvent, SearchEvent};
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Search-side state guarded by a single lock.
///
/// `generation` increases with every accepted search; only the search that
/// owns the current generation may write results.
#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<Artwork>,
    is_loading: bool,
    error_message: Option<String>,
    generation: u64,
    cancel: CancellationToken,
}

struct ServiceInner {
    catalog: Arc<dyn ArtworkCatalog>,
    favorites: FavoritesStore,
    events: EventBus,
    search_limit: usize,
    search: Mutex<SearchState>,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct GalleryService {
    inner: Arc<ServiceInner>,
}

impl GalleryService {
    /// Build the catalog client from `config` and load saved favorites.
    pub async fn new(config: GalleryConfig) -> Self {
        let catalog = CatalogClient::new(Arc::clone(&config.http_client))
            .with_base_url(config.base_url.clone())
            .with_max_concurrent_fetches(config.max_concurrent_fetches)
            .with_request_timeout(Some(config.request_timeout));

        let favorites =
            FavoritesStore::load(Arc::clone(&config.settings_store), config.favorites_key.clone())
                .await;

        info!(
            base_url = %config.base_url,
            search_limit = config.search_limit,
            "Gallery service initialized"
        );

        Self::from_parts(Arc::new(catalog), favorites, config.search_limit)
    }

    /// Finish `builder`, falling back to platform defaults for absent
    /// bridges, then start the service.
    pub async fn bootstrap(builder: GalleryConfigBuilder) -> Result<Self> {
        let config = builder.build()?;
        Ok(Self::new(config).await)
    }

    /// Assemble a service from an already-loaded favorites store and any
    /// catalog implementation.
    pub fn from_parts(
        catalog: Arc<dyn ArtworkCatalog>,
        favorites: FavoritesStore,
        search_limit: usize,
    ) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                catalog,
                favorites,
                events: EventBus::default(),
                search_limit,
                search: Mutex::new(SearchState::default()),
            }),
        }
    }

    /// Search with the configured result limit.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        self.search_with_limit(query, self.inner.search_limit).await
    }

    /// Run one search, replacing the visible results.
    ///
    /// A blank query is ignored. Starting a search cancels any search still in
    /// flight; the cancelled call returns [`SearchOutcome::Superseded`] and
    /// leaves state to the newer one.
    #[instrument(skip(self), fields(generation = tracing::field::Empty))]
    pub async fn search_with_limit(&self, query: &str, limit: usize) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank query");
            return SearchOutcome::Skipped;
        }

        let (generation, cancel) = {
            let mut state = self.inner.search.lock().await;
            state.cancel.cancel();
            state.cancel = CancellationToken::new();
            state.generation += 1;
            state.query = query.to_string();
            state.is_loading = true;
            state.error_message = None;
            state.results.clear();
            (state.generation, state.cancel.clone())
        };
        tracing::Span::current().record("generation", generation);

        self.emit(CoreEvent::Search(SearchEvent::Started {
            query: query.to_string(),
        }));

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.inner.catalog.search(query, limit) => Some(result),
        };

        let mut state = self.inner.search.lock().await;
        let result = match result {
            Some(result) if state.generation == generation => result,
            _ => {
                drop(state);
                debug!("Search superseded by a newer query");
                self.emit(CoreEvent::Search(SearchEvent::Superseded {
                    query: query.to_string(),
                }));
                return SearchOutcome::Superseded;
            }
        };

        let (outcome, event) = match result {
            Ok(artworks) if artworks.is_empty() => {
                state.error_message = Some(NOTHING_FOUND_MESSAGE.to_string());
                (
                    SearchOutcome::NothingFound,
                    SearchEvent::NothingFound {
                        query: query.to_string(),
                    },
                )
            }
            Ok(artworks) => {
                let count = artworks.len();
                state.results = artworks;
                (
                    SearchOutcome::Found(count),
                    SearchEvent::Completed {
                        query: query.to_string(),
                        result_count: count,
                    },
                )
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Search failed");
                state.error_message = Some(FAILED_TO_LOAD_MESSAGE.to_string());
                (
                    SearchOutcome::Failed(FAILED_TO_LOAD_MESSAGE.to_string()),
                    SearchEvent::Failed {
                        query: query.to_string(),
                        message: e.to_string(),
                    },
                )
            }
        };
        state.is_loading = false;
        drop(state);

        self.emit(CoreEvent::Search(event));
        outcome
    }

    /// Add or remove `artwork` from favorites and persist the list.
    pub async fn toggle_favorite(&self, artwork: &Artwork) -> FavoriteChange {
        let change = self.inner.favorites.toggle_favorite(artwork).await;
        let artwork_id = artwork.id.0;
        let event = match change {
            FavoriteChange::Added => FavoritesEvent::Added { artwork_id },
            FavoriteChange::Removed => FavoritesEvent::Removed { artwork_id },
        };
        self.emit(CoreEvent::Favorites(event));
        change
    }

    pub async fn is_favorite(&self, artwork: &Artwork) -> bool {
        self.inner.favorites.is_favorite(artwork).await
    }

    pub async fn is_favorite_id(&self, id: ArtworkId) -> bool {
        self.inner.favorites.contains(id).await
    }

    /// Saved artworks in the order they were added.
    pub async fn favorites(&self) -> Vec<Artwork> {
        self.inner.favorites.favorites().await
    }

    /// Re-read favorites from storage.
    pub async fn reload_favorites(&self) -> usize {
        let count = self.inner.favorites.reload().await;
        self.emit(CoreEvent::Favorites(FavoritesEvent::Loaded { count }));
        count
    }

    /// Snapshot of the query, results, loading flag, error message and
    /// favorites.
    pub async fn state(&self) -> GalleryState {
        let favorites = self.inner.favorites.favorites().await;
        let state = self.inner.search.lock().await;
        GalleryState {
            query: state.query.clone(),
            results: state.results.clone(),
            is_loading: state.is_loading,
            error_message: state.error_message.clone(),
            favorites,
        }
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.inner.events.subscribe()
    }

    /// Search lifecycle events only
    pub fn search_events(&self) -> EventStream {
        self.inner
            .events
            .stream()
            .filter(|event| matches!(event, CoreEvent::Search(_)))
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.events
    }

    fn emit(&self, event: CoreEvent) {
        // No subscribers is not an error for the service
        let _ = self.inner.events.emit(event);
    }
}

impl std::fmt::Debug for GalleryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryService")
            .field("favorites", &self.inner.favorites)
            .field("events", &self.inner.events)
            .field("search_limit", &self.inner.search_limit)
            .finish()
    }
}
