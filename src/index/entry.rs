//! Index entries derived from an extracted document.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::ExtractedDocument;

/// The three content streams of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "txt")]
    Text,
    #[serde(rename = "img")]
    Image,
    #[serde(rename = "tbl")]
    Table,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Text, ContentKind::Image, ContentKind::Table];

    /// Short name (`txt`, `img`, `tbl`).
    pub fn short_name(self) -> &'static str {
        match self {
            ContentKind::Text => "txt",
            ContentKind::Image => "img",
            ContentKind::Table => "tbl",
        }
    }

    /// Name of the collection holding this kind.
    pub fn collection_name(self) -> String {
        format!("{}_collection", self.short_name())
    }

    /// Human-readable name used in answers.
    pub fn display_name(self) -> &'static str {
        match self {
            ContentKind::Text => "text paragraph",
            ContentKind::Image => "image",
            ContentKind::Table => "table",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ContentKind::Text),
            "img" | "image" => Ok(ContentKind::Image),
            "tbl" | "table" => Ok(ContentKind::Table),
            other => Err(Error::Precondition(format!(
                "unknown content kind '{}' (expected txt, img or tbl)",
                other
            ))),
        }
    }
}

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Page index (0-based)
    pub page_index: usize,
    /// Paragraph, image or table index on that page
    pub local_index: usize,
}

/// One searchable document string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Position in the collection, `0..n`
    pub id: usize,
    /// Paragraph text, or the description of an image or table
    pub document: Arc<str>,
    pub metadata: EntryMetadata,
}

/// Build the entries of one kind, in document order.
pub fn entries(kind: ContentKind, doc: &ExtractedDocument) -> Vec<IndexEntry> {
    let rows: Vec<(Arc<str>, usize, usize)> = match kind {
        ContentKind::Text => doc
            .texts
            .iter()
            .map(|p| (Arc::clone(&p.text), p.page_index, p.paragraph_index))
            .collect(),
        ContentKind::Image => doc
            .images
            .iter()
            .map(|i| (Arc::clone(&i.description), i.page_index, i.image_index))
            .collect(),
        ContentKind::Table => doc
            .tables
            .iter()
            .map(|t| (Arc::clone(&t.description), t.page_index, t.table_index))
            .collect(),
    };

    rows.into_iter()
        .enumerate()
        .map(|(id, (document, page_index, local_index))| IndexEntry {
            id,
            document,
            metadata: EntryMetadata {
                page_index,
                local_index,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, ImageRecord, Paragraph};

    #[test]
    fn test_kind_names() {
        assert_eq!(ContentKind::Image.short_name(), "img");
        assert_eq!(ContentKind::Table.collection_name(), "tbl_collection");
        assert_eq!(ContentKind::Text.to_string(), "text paragraph");
        assert_eq!("TBL".parse::<ContentKind>().unwrap(), ContentKind::Table);
        assert!("pic".parse::<ContentKind>().is_err());
        assert_eq!(serde_json::to_string(&ContentKind::Text).unwrap(), "\"txt\"");
    }

    #[test]
    fn test_entries_follow_document_order() {
        let mut doc = ExtractedDocument::default();
        let p0 = Paragraph::new(BoundingBox::default(), "first", 0, 0);
        let p1 = Paragraph::new(BoundingBox::default(), "second", 0, 1);
        doc.images.push(ImageRecord::new(0, 1, BoundingBox::default(), Some(&p1)));
        doc.texts = vec![p0, p1];

        let texts = entries(ContentKind::Text, &doc);
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[1].id, 1);
        assert_eq!(
            texts[1].metadata,
            EntryMetadata {
                page_index: 1,
                local_index: 0
            }
        );

        let images = entries(ContentKind::Image, &doc);
        assert_eq!(&*images[0].document, "second");
        assert!(entries(ContentKind::Table, &doc).is_empty());
    }
}
