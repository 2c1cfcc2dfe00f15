//! # pdfcontext
//!
//! Extract body paragraphs, images and tables from PDF documents, and give
//! every image and table a textual description: the paragraph immediately
//! above it on the same page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfcontext::{extract_file, render};
//!
//! fn main() -> pdfcontext::Result<()> {
//!     let doc = extract_file("document.pdf")?;
//!
//!     for image in &doc.images {
//!         println!("page {}: {}", image.page_index + 1, image.description);
//!     }
//!
//!     println!("{}", render::to_text(&doc)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Filtering**: blocks in the top and bottom 5% of the page are treated as
//!   header/footer; the rest are whitespace-normalized and numbered top to
//!   bottom
//! - **Association**: each image and table is matched to the nearest
//!   paragraph above it with a binary search over paragraph bottoms
//! - **Aggregation**: per-page results are concatenated in page order,
//!   optionally extracting pages in parallel with Rayon
//! - **Retrieval**: the three content streams can be indexed and queried

pub mod detect;
pub mod error;
pub mod extract;
pub mod index;
pub mod model;
pub mod parser;
pub mod render;

pub use detect::{is_pdf_bytes, sniff_version, sniff_version_from_path};
pub use error::{Error, Result};
pub use extract::{extract_document, BottomOrder, ExtractMode, ExtractOptions};
pub use index::{answer, build_index, ContentIndex, ContentKind, MemoryIndex, SearchHit};
pub use model::{
    BoundingBox, DocumentInfo, ExtractedDocument, ImageRecord, PageContent, Paragraph,
    TableRecord, NO_DESCRIPTION,
};
pub use parser::{LopdfBackend, MemoryBackend, MemoryPage, PdfBackend};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Extract content from a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfcontext::extract_file;
///
/// let doc = extract_file("document.pdf").unwrap();
/// println!("Paragraphs: {}", doc.texts.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractedDocument> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Extract content from a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfcontext::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().sorted_bottoms().with_parallel(true);
/// let doc = extract_file_with_options("document.pdf", &options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<ExtractedDocument> {
    options.validate()?;
    let backend = LopdfBackend::open(path)?;
    extract_document(&backend, options)
}

/// Extract content from PDF bytes.
pub fn extract_bytes(data: &[u8]) -> Result<ExtractedDocument> {
    extract_bytes_with_options(data, &ExtractOptions::default())
}

/// Extract content from PDF bytes with custom options.
pub fn extract_bytes_with_options(
    data: &[u8],
    options: &ExtractOptions,
) -> Result<ExtractedDocument> {
    options.validate()?;
    let backend = LopdfBackend::from_bytes(data)?;
    extract_document(&backend, options)
}

/// Extract content from a reader.
///
/// # Example
///
/// ```no_run
/// use pdfcontext::extract_reader;
/// use std::fs::File;
///
/// let file = File::open("document.pdf").unwrap();
/// let doc = extract_reader(file).unwrap();
/// ```
pub fn extract_reader<R: Read>(reader: R) -> Result<ExtractedDocument> {
    let backend = LopdfBackend::from_reader(reader)?;
    extract_document(&backend, &ExtractOptions::default())
}

/// Extract plain paragraph text from a PDF file, one paragraph per line.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let options = ExtractOptions::new().text_only();
    Ok(extract_file_with_options(path, &options)?.plain_text())
}

/// Builder for extracting, rendering and querying PDF content.
///
/// # Example
///
/// ```no_run
/// use pdfcontext::{ContentKind, Pdfcontext};
///
/// let message = Pdfcontext::new()
///     .sorted_bottoms()
///     .parallel()
///     .extract("document.pdf")?
///     .answer(ContentKind::Table, "quarterly revenue")?;
/// println!("{}", message);
/// # Ok::<(), pdfcontext::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdfcontext {
    options: ExtractOptions,
}

impl Pdfcontext {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header/footer band ratio.
    pub fn with_margin_ratio(mut self, ratio: f32) -> Self {
        self.options = self.options.with_margin_ratio(ratio);
        self
    }

    /// Associate against bottoms sorted ascending.
    pub fn sorted_bottoms(mut self) -> Self {
        self.options = self.options.sorted_bottoms();
        self
    }

    /// Extract paragraphs only.
    pub fn text_only(mut self) -> Self {
        self.options = self.options.text_only();
        self
    }

    /// Extract pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// Options the builder will extract with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract a PDF file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<Extraction> {
        let document = extract_file_with_options(path, &self.options)?;
        Ok(Extraction { document })
    }

    /// Extract PDF bytes.
    pub fn extract_bytes(self, data: &[u8]) -> Result<Extraction> {
        let document = extract_bytes_with_options(data, &self.options)?;
        Ok(Extraction { document })
    }

    /// Extract from any backend.
    pub fn extract_with<B>(self, backend: &B) -> Result<Extraction>
    where
        B: PdfBackend + Sync,
        B::Page: Send,
    {
        let document = extract_document(backend, &self.options)?;
        Ok(Extraction { document })
    }
}

/// Result of extracting a PDF document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The extracted content
    pub document: ExtractedDocument,
}

impl Extraction {
    /// Render the sectioned text report.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Build an in-memory index over all three content streams.
    pub fn index(&self) -> Result<MemoryIndex> {
        let mut index = MemoryIndex::new();
        build_index(&self.document, &mut index)?;
        Ok(index)
    }

    /// Index the document and answer a single query.
    pub fn answer(&self, kind: ContentKind, query: &str) -> Result<String> {
        answer(&self.index()?, kind, query)
    }

    /// Get the document.
    pub fn document(&self) -> &ExtractedDocument {
        &self.document
    }
}
