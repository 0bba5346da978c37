//! Gallery widget service: catalog plus modal viewer state.

use crate::model::gallery::{default_catalog, GalleryImage};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Gallery use-case errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for GalleryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "gallery index {index} out of range (0..{len})")
            }
        }
    }
}

impl Error for GalleryError {}

/// What the modal viewer shows while open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub image_url: String,
    pub caption: String,
}

/// Image grid with a single modal viewer.
#[derive(Debug, Clone)]
pub struct GalleryService {
    images: Vec<GalleryImage>,
    open_index: Option<usize>,
}

impl Default for GalleryService {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

impl GalleryService {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            images,
            open_index: None,
        }
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    /// Opens the modal on the full-size rendition of image `index`.
    pub fn open(&mut self, index: usize) -> Result<ModalView, GalleryError> {
        let image = self
            .images
            .get(index)
            .ok_or(GalleryError::IndexOutOfRange {
                index,
                len: self.images.len(),
            })?;
        let view = ModalView {
            image_url: image.full_url.clone(),
            caption: image.title.clone(),
        };

        self.open_index = Some(index);
        debug!("event=gallery_open module=gallery index={index}");
        Ok(view)
    }

    /// Hides the modal. Closing an already hidden modal is a no-op.
    pub fn close(&mut self) {
        self.open_index = None;
    }

    /// Current modal content, `None` while hidden.
    pub fn modal(&self) -> Option<ModalView> {
        let image = self.images.get(self.open_index?)?;
        Some(ModalView {
            image_url: image.full_url.clone(),
            caption: image.title.clone(),
        })
    }
}
