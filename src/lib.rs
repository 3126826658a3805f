//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `gallery-workspace` and
//! enable `desktop-shims` to get [`core_service::GalleryService`] with the
//! reqwest and SQLite bridges wired in.

#[cfg(feature = "desktop-shims")]
pub use core_service;
