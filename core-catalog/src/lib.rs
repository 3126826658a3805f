//! # Catalog Module
//!
//! Search pipeline over the remote museum collection API.
//!
//! ## Overview
//!
//! This module handles:
//! - Building search and object requests against the collection API
//! - Concurrent detail fetches with per-item failure isolation
//! - Deterministic title ordering of results
//! - The [`Artwork`] record shared with the favorites store

pub mod client;
pub mod error;
pub mod models;

pub use client::{ArtworkCatalog, CatalogClient, DEFAULT_BASE_URL, DEFAULT_SEARCH_LIMIT};
pub use error::{CatalogError, CatalogErrorKind, Result};
pub use models::{sort_by_title, Artwork, ArtworkId};
