//! Error types for pdfcontext.

use std::io;
use thiserror::Error;

use crate::index::ContentKind;

/// Result type alias for pdfcontext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting or querying PDF content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the source file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header names a version outside 1.0..=2.0.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The parsing backend could not open or decode the document.
    #[error("PDF parsing error: {0}")]
    DocumentParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// An input violated a documented precondition.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// A query targeted a content kind that was never indexed.
    #[error("No {0} collection has been indexed")]
    CollectionNotFound(ContentKind),

    /// A query produced no result.
    #[error("No {0} matched the query")]
    NoMatch(ContentKind),

    /// The search index failed to build or query a collection.
    #[error("Index error: {0}")]
    Index(String),

    /// Error while rendering output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::DocumentParse(err.to_string()),
        }
    }
}

impl From<tantivy::TantivyError> for Error {
    fn from(err: tantivy::TantivyError) -> Self {
        Error::Index(err.to_string())
    }
}
