//! Bridges for desktop hosts
//!
//! [`ReqwestHttpClient`] talks to the catalog over rustls and
//! [`SqliteSettingsStore`] keeps settings (the saved favorites among them) in
//! a local SQLite file. `core-runtime` picks both up as defaults when built
//! with its `desktop-shims` feature.
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteSettingsStore};
//! use std::time::Duration;
//!
//! let http = ReqwestHttpClient::with_timeout(Duration::from_secs(10))?;
//! let settings = SqliteSettingsStore::new(data_dir.join("settings.db")).await?;
//! ```

mod http;
mod settings;

pub use http::ReqwestHttpClient;
pub use settings::SqliteSettingsStore;
