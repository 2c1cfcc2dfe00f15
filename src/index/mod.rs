//! Indexing and retrieval over extracted content.
//!
//! Each content kind goes into its own collection. A query against a kind
//! returns the single best-matching entry.

mod entry;
mod memory;

pub use entry::{entries, ContentKind, EntryMetadata, IndexEntry};
pub use memory::MemoryIndex;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::ExtractedDocument;

/// The best entry for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub entry: IndexEntry,
    /// Backend-specific relevance, higher is better
    pub score: f32,
}

impl SearchHit {
    pub fn new(entry: IndexEntry, score: f32) -> Self {
        Self { entry, score }
    }
}

/// A searchable store with one collection per [`ContentKind`].
pub trait ContentIndex {
    /// Add entries to the collection for `kind`, creating it if needed.
    fn add(&mut self, kind: ContentKind, entries: Vec<IndexEntry>) -> Result<()>;

    /// Best match in the collection for `kind`.
    ///
    /// Fails with [`Error::CollectionNotFound`] if nothing was ever added for
    /// `kind`; an empty collection yields `Ok(None)`.
    fn query(&self, kind: ContentKind, text: &str) -> Result<Option<SearchHit>>;
}

/// Index all three content streams of `doc`.
pub fn build_index<I: ContentIndex + ?Sized>(doc: &ExtractedDocument, index: &mut I) -> Result<()> {
    for kind in ContentKind::ALL {
        index.add(kind, entries(kind, doc))?;
    }
    Ok(())
}

/// Format a hit as an answer message.
pub fn format_answer(kind: ContentKind, hit: &SearchHit) -> String {
    format!(
        "Found the following information for you, on page {}, {} number {}:\n{}\n",
        hit.entry.metadata.page_index + 1,
        kind.display_name(),
        hit.entry.metadata.local_index + 1,
        hit.entry.document
    )
}

/// Query `index` and format the best match.
pub fn answer<I: ContentIndex + ?Sized>(index: &I, kind: ContentKind, query: &str) -> Result<String> {
    let hit = index.query(kind, query)?.ok_or(Error::NoMatch(kind))?;
    Ok(format_answer(kind, &hit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Paragraph, TableRecord};

    fn sample_doc() -> ExtractedDocument {
        let mut doc = ExtractedDocument::default();
        let para = Paragraph::new(BoundingBox::default(), "Quarterly revenue by region", 1, 2);
        doc.tables.push(TableRecord::new(
            vec![vec!["EU".into(), "10".into()]],
            0,
            2,
            BoundingBox::default(),
            Some(&para),
        ));
        doc.texts.push(para);
        doc
    }

    #[test]
    fn test_answer_message() {
        let mut index = MemoryIndex::new();
        build_index(&sample_doc(), &mut index).unwrap();

        let message = answer(&index, ContentKind::Table, "revenue").unwrap();
        assert_eq!(
            message,
            "Found the following information for you, on page 3, table number 1:\nQuarterly revenue by region\n"
        );

        let message = answer(&index, ContentKind::Text, "revenue").unwrap();
        assert!(message.contains("text paragraph number 2"));
    }

    #[test]
    fn test_empty_result_is_no_match() {
        let mut index = MemoryIndex::new();
        build_index(&sample_doc(), &mut index).unwrap();

        let err = answer(&index, ContentKind::Image, "anything").unwrap_err();
        assert!(matches!(err, Error::NoMatch(ContentKind::Image)));
        assert_eq!(err.to_string(), "No image matched the query");
    }

    #[test]
    fn test_unindexed_kind() {
        let index = MemoryIndex::new();
        assert!(matches!(
            answer(&index, ContentKind::Text, "q"),
            Err(Error::CollectionNotFound(ContentKind::Text))
        ));
    }
}
