//! Content extraction: body-text filtering, spatial association, and
//! page/document aggregation.

mod associate;
mod document;
mod filter;
mod options;
mod page;

pub use associate::{nearest_preceding, SpatialAssociator};
pub use document::{extract_document, DocumentAggregator};
pub use filter::{normalize_whitespace, PageContentFilter};
pub use options::{BottomOrder, ExtractMode, ExtractOptions, DEFAULT_MARGIN_RATIO};
pub use page::PageExtractor;
