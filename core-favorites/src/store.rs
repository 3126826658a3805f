//! Favorites persistence
//!
//! The favorites list lives in memory and is mirrored into a single
//! [`SettingsStore`] slot as a JSON array of [`Artwork`] records. The slot is
//! rewritten wholesale after every mutation.
//!
//! Persistence is best-effort. A missing or unreadable blob loads as an empty
//! list, and a failed write leaves the previously persisted value in place.
//! Neither case is reported to the caller; both are logged.

use bridge_traits::storage::SettingsStore;
use core_catalog::{Artwork, ArtworkId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Settings key the favorites blob is stored under
pub const DEFAULT_FAVORITES_KEY: &str = "saved_art_v1";

/// Result of [`FavoritesStore::toggle_favorite`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

/// Insertion-ordered list of saved artworks, unique by id
///
/// A store only exists in its loaded state: [`FavoritesStore::load`] is the
/// sole constructor. The list and its persisted copy are updated under one
/// lock, so the store can be shared across tasks.
pub struct FavoritesStore {
    settings: Arc<dyn SettingsStore>,
    key: String,
    favorites: Mutex<Vec<Artwork>>,
}

impl FavoritesStore {
    /// Build a store from whatever is persisted under `key`
    pub async fn load(settings: Arc<dyn SettingsStore>, key: impl Into<String>) -> Self {
        let store = Self {
            settings,
            key: key.into(),
            favorites: Mutex::new(Vec::new()),
        };
        store.reload().await;
        store
    }

    /// Replace the in-memory list with the persisted one
    ///
    /// Returns the number of favorites loaded.
    pub async fn reload(&self) -> usize {
        let mut favorites = self.favorites.lock().await;
        *favorites = self.read_persisted().await;
        info!(key = %self.key, count = favorites.len(), "Loaded favorites");
        favorites.len()
    }

    async fn read_persisted(&self) -> Vec<Artwork> {
        let blob = match self.settings.get_string(&self.key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = %self.key, "No persisted favorites");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read favorites, starting empty");
                return Vec::new();
            }
        };

        let decoded: Vec<Artwork> = match serde_json::from_str(&blob) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to decode favorites, starting empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let total = decoded.len();
        let unique: Vec<Artwork> = decoded
            .into_iter()
            .filter(|artwork| seen.insert(artwork.id))
            .collect();

        if unique.len() != total {
            warn!(
                key = %self.key,
                dropped = total - unique.len(),
                "Persisted favorites contained duplicate ids"
            );
        }

        unique
    }

    /// Add `artwork` if no entry shares its id, otherwise remove that entry
    ///
    /// The resulting list is always persisted.
    pub async fn toggle_favorite(&self, artwork: &Artwork) -> FavoriteChange {
        let mut favorites = self.favorites.lock().await;

        let change = match favorites.iter().position(|saved| saved.id == artwork.id) {
            Some(index) => {
                favorites.remove(index);
                FavoriteChange::Removed
            }
            None => {
                favorites.push(artwork.clone());
                FavoriteChange::Added
            }
        };

        debug!(artwork_id = %artwork.id, ?change, "Toggled favorite");
        self.persist(&favorites).await;
        change
    }

    /// Whether an entry with the same id is saved
    pub async fn is_favorite(&self, artwork: &Artwork) -> bool {
        self.contains(artwork.id).await
    }

    pub async fn contains(&self, id: ArtworkId) -> bool {
        self.favorites.lock().await.iter().any(|saved| saved.id == id)
    }

    /// Snapshot of the saved artworks, in insertion order
    pub async fn favorites(&self) -> Vec<Artwork> {
        self.favorites.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.favorites.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.favorites.lock().await.is_empty()
    }

    /// Write the current list to the settings slot
    pub async fn save_favorites(&self) {
        let favorites = self.favorites.lock().await;
        self.persist(&favorites).await;
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn persist(&self, favorites: &[Artwork]) {
        let blob = match serde_json::to_string(favorites) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to encode favorites, skipping save");
                return;
            }
        };

        match self.settings.set_string(&self.key, &blob).await {
            Ok(()) => debug!(key = %self.key, count = favorites.len(), "Saved favorites"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to save favorites"),
        }
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("key", &self.key)
            .field("settings", &"SettingsStore { ... }")
            .finish()
    }
}
