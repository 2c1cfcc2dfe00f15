//! PDF backend abstraction layer.
//!
//! The extraction pipeline never touches a concrete PDF library. It consumes
//! a [`PdfBackend`] that hands out one [`RawPage`] at a time, and each raw page
//! gives up its text blocks, images and tables as owned lists so the caller
//! can drop each list as soon as the records derived from it exist.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BoundingBox, TableGrid};

/// A text block as laid out by the backend, before any filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub bbox: BoundingBox,
    /// Unnormalized text, lines separated by `\n`
    pub text: String,
}

impl RawBlock {
    pub fn new(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }
}

/// An image placement on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawImage {
    pub bbox: BoundingBox,
}

impl RawImage {
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox }
    }

    /// Top edge used for paragraph association.
    pub fn top(&self) -> f32 {
        self.bbox.top
    }
}

/// A detected table and its cell grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub bbox: BoundingBox,
    cells: TableGrid,
}

impl RawTable {
    pub fn new(bbox: BoundingBox, cells: TableGrid) -> Self {
        Self { bbox, cells }
    }

    /// Top edge used for paragraph association.
    pub fn top(&self) -> f32 {
        self.bbox.top
    }

    /// Take the cell grid out of the table.
    pub fn extract(self) -> TableGrid {
        self.cells
    }
}

/// One decoded page.
///
/// Each accessor moves its list out of the page; calling it a second time
/// yields an empty list.
pub trait RawPage {
    /// Page height in page-space units.
    fn height(&self) -> f32;

    /// Text blocks in the backend's discovery order.
    fn text_blocks(&mut self) -> Vec<RawBlock>;

    /// Image placements in discovery order.
    fn images(&mut self) -> Vec<RawImage>;

    /// Tables in discovery order.
    fn tables(&mut self) -> Vec<RawTable>;
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Page type handed out by [`PdfBackend::load_page`].
    type Page: RawPage;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Decode the page at `page_index` (0-based).
    fn load_page(&self, page_index: usize) -> Result<Self::Page>;

    /// PDF version declared by the document, if the backend knows it.
    fn pdf_version(&self) -> Option<String> {
        None
    }
}
