//! Key-value settings storage
//!
//! The favorites list is persisted as one string value under a single key.

use async_trait::async_trait;

use crate::error::Result;

/// Durable key-value store owned by the host
///
/// Hosts back this with whatever preference storage the platform offers
/// (UserDefaults, DataStore, a SQLite table on desktop). Writes must be
/// durable by the time the returned future resolves; reads of a key that
/// was never written return `Ok(None)`.
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn saved_blob(store: &dyn SettingsStore) -> Result<String> {
///     Ok(store.get_string("saved_art_v1").await?.unwrap_or_else(|| "[]".into()))
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Replace whatever `key` held before
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    async fn get_string(&self, key: &str) -> Result<Option<String>>;
}
