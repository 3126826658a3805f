//! Shared plumbing for the gallery crates
//!
//! - [`config`]: `GalleryConfig` and its builder, including bridge defaults
//! - [`events`]: broadcast bus for search and favorites notifications
//! - [`logging`]: global `tracing` subscriber with an optional host sink
//! - [`error`]: failures raised while putting the above together

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
