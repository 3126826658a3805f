//! # Host Bridge Traits
//!
//! Capabilities the gallery core needs from its host but never implements
//! itself. The core only ever holds them as `Arc<dyn Trait>`, so every trait
//! is `Send + Sync` and one instance serves all concurrent detail fetches.
//!
//! | Trait | Used for | Desktop implementation |
//! |-------|----------|------------------------|
//! | [`HttpClient`](http::HttpClient) | catalog search and object requests | `bridge_desktop::ReqwestHttpClient` |
//! | [`SettingsStore`](storage::SettingsStore) | the saved favorites blob | `bridge_desktop::SqliteSettingsStore` |
//! | [`LoggerSink`](logging::LoggerSink) | mirroring `tracing` events to the host | [`ConsoleLogger`](logging::ConsoleLogger) |
//!
//! Implementations map their native failures onto
//! [`BridgeError`](error::BridgeError), keeping the URL or key in the message.

pub mod error;
pub mod http;
pub mod storage;
pub mod logging;

pub use error::BridgeError;

pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use storage::SettingsStore;
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
