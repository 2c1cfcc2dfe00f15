//! PDF parsing module.

mod backend;
mod layout;
mod lopdf_backend;
mod memory;
mod table_detector;

pub use backend::{PdfBackend, RawBlock, RawImage, RawPage, RawTable};
pub use layout::{layout_blocks, PageScan, TextSpan};
pub use lopdf_backend::{LopdfBackend, LopdfPage};
pub use memory::{MemoryBackend, MemoryPage};
pub use table_detector::{TableDetector, TableDetectorConfig};
