//! Gallery image catalog.
//!
//! Each entry carries a 400x300 thumbnail for the grid and a 1200x900
//! rendition for the modal viewer.

use serde::{Deserialize, Serialize};

const THUMB_PARAMS: &str = "w=400&h=300&fit=crop";
const FULL_PARAMS: &str = "w=1200&h=900&fit=crop";
const UNSPLASH_BASE: &str = "https://images.unsplash.com";

/// `(photo id, title)` pairs in display order.
const CATALOG: &[(&str, &str)] = &[
    ("photo-1506905925346-21bda4d32df4", "Mountain Landscape"),
    ("photo-1469474968028-56623f02e42e", "Nature Scene"),
    ("photo-1470071459604-3b5ec3a7fe05", "Foggy Forest"),
    ("photo-1501785888041-af3ef285b470", "Sunset Road"),
    ("photo-1472214103451-9374bd1c798e", "Lake View"),
    ("photo-1433086966358-54859d0ed716", "Ocean Waves"),
    ("photo-1441974231531-c6227db76b6e", "Green Forest"),
    ("photo-1426604966848-d7adac402bff", "Mountain Peak"),
    ("photo-1506905925346-21bda4d32df4", "Alpine Valley"),
];

/// One gallery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Thumbnail shown in the grid.
    pub url: String,
    /// High resolution image shown in the modal.
    #[serde(rename = "fullUrl")]
    pub full_url: String,
    pub title: String,
}

impl GalleryImage {
    fn from_photo(photo_id: &str, title: &str) -> Self {
        Self {
            url: format!("{UNSPLASH_BASE}/{photo_id}?{THUMB_PARAMS}"),
            full_url: format!("{UNSPLASH_BASE}/{photo_id}?{FULL_PARAMS}"),
            title: title.to_string(),
        }
    }
}

/// Returns the built-in landscape catalog.
pub fn default_catalog() -> Vec<GalleryImage> {
    CATALOG
        .iter()
        .map(|(photo_id, title)| GalleryImage::from_photo(photo_id, title))
        .collect()
}
