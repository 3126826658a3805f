//! Observable gallery state

use core_catalog::Artwork;
use serde::Serialize;

/// Shown when the search call itself fails
pub const FAILED_TO_LOAD_MESSAGE: &str = "Failed to load. Check your internet connection.";

/// Shown when a search succeeds with zero matches
pub const NOTHING_FOUND_MESSAGE: &str = "Nothing found";

/// How a single `search` call settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank after trimming; state was left untouched.
    Skipped,
    /// At least one artwork was loaded.
    Found(usize),
    NothingFound,
    /// The initial search call failed; carries the user-facing message.
    Failed(String),
    /// A newer search started first; this call did not write state.
    Superseded,
}

/// Point-in-time copy of everything a presentation layer renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryState {
    pub query: String,
    pub results: Vec<Artwork>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub favorites: Vec<Artwork>,
}
