//! Extracted content types.
//!
//! These are the records the extraction pipeline produces: paragraphs of body
//! text, images and tables described by their nearest preceding paragraph,
//! and the per-page and per-document containers that hold them.

mod document;
mod geometry;
mod paragraph;
mod record;

pub use document::{DocumentInfo, ExtractedDocument, PageContent};
pub use geometry::BoundingBox;
pub use paragraph::Paragraph;
pub use record::{ImageRecord, TableGrid, TableRecord, NO_DESCRIPTION};
