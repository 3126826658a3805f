//! # Favorites Module
//!
//! Locally saved artworks, persisted through the host's
//! [`SettingsStore`](bridge_traits::storage::SettingsStore).

pub mod store;

pub use store::{FavoriteChange, FavoritesStore, DEFAULT_FAVORITES_KEY};
