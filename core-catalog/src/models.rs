//! Domain models for the remote catalog
//!
//! The field names match the catalog's wire format so the same shape is used
//! for decoding API responses and for the persisted favorites blob.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// ID Types
// =============================================================================

/// Catalog identifier of an artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkId(pub i64);

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ArtworkId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// =============================================================================
// Artwork
// =============================================================================

/// A single catalog record
///
/// Equality and hashing consider only [`Artwork::id`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    #[serde(rename = "objectID")]
    pub id: ArtworkId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist_display_name: Option<String>,
    #[serde(default)]
    pub object_date: Option<String>,
    #[serde(default)]
    pub primary_image_small: Option<String>,
    #[serde(default)]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl Artwork {
    /// Create a record with only an identifier
    pub fn new(id: impl Into<ArtworkId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            artist_display_name: None,
            object_date: None,
            primary_image_small: None,
            primary_image: None,
            medium: None,
            department: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist_display_name = Some(artist.into());
        self
    }

    /// Title used for ordering; missing titles sort as the empty string
    pub fn sort_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

impl PartialEq for Artwork {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Artwork {}

impl Hash for Artwork {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Order by title ascending, then by id.
pub fn compare_by_title(a: &Artwork, b: &Artwork) -> Ordering {
    a.sort_title()
        .cmp(b.sort_title())
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort artworks into their display order.
pub fn sort_by_title(artworks: &mut [Artwork]) {
    artworks.sort_by(compare_by_title);
}
