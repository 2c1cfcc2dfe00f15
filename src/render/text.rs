//! Sectioned plain-text report.
//!
//! Prints paragraphs, then tables, then images. Every record is one compact
//! JSON object on its own line.

use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{ExtractedDocument, TableGrid};

use super::json::{serialize, JsonFormat};

#[derive(Serialize)]
struct TextLine<'a> {
    text: &'a str,
    page: usize,
    paragraph: usize,
}

#[derive(Serialize)]
struct TableLine<'a> {
    table: &'a TableGrid,
    description: &'a str,
    page: usize,
    table_no: usize,
}

#[derive(Serialize)]
struct ImageLine<'a> {
    description: &'a str,
    page: usize,
    image_no: usize,
}

/// Section header for `kind` ("Text", "Table", "Image").
pub fn section_header(kind: &str) -> String {
    format!("_____________{} Result_______________\n", kind)
}

fn push_section<T: Serialize>(out: &mut String, kind: &str, lines: impl Iterator<Item = T>) -> Result<()> {
    writeln!(out, "{}", section_header(kind)).map_err(|e| Error::Render(e.to_string()))?;
    for line in lines {
        out.push_str(&serialize(&line, JsonFormat::Compact)?);
        out.push('\n');
    }
    Ok(())
}

/// Render the report.
pub fn to_text(doc: &ExtractedDocument) -> Result<String> {
    let mut out = String::new();

    push_section(
        &mut out,
        "Text",
        doc.texts.iter().map(|p| TextLine {
            text: p.text(),
            page: p.page_index,
            paragraph: p.paragraph_index,
        }),
    )?;
    push_section(
        &mut out,
        "Table",
        doc.tables.iter().map(|t| TableLine {
            table: &t.content,
            description: &t.description,
            page: t.page_index,
            table_no: t.table_index,
        }),
    )?;
    push_section(
        &mut out,
        "Image",
        doc.images.iter().map(|i| ImageLine {
            description: &i.description,
            page: i.page_index,
            image_no: i.image_index,
        }),
    )?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, ImageRecord, Paragraph, TableRecord};

    #[test]
    fn test_sections_in_order() {
        let mut doc = ExtractedDocument::default();
        let para = Paragraph::new(BoundingBox::default(), "Intro \"quoted\"", 0, 0);
        doc.images
            .push(ImageRecord::new(0, 0, BoundingBox::default(), Some(&para)));
        doc.tables.push(TableRecord::new(
            vec![vec!["a".into(), "b".into()]],
            0,
            0,
            BoundingBox::default(),
            Some(&para),
        ));
        doc.texts.push(para);

        let text = to_text(&doc).unwrap();
        let expected = "\
_____________Text Result_______________

{\"text\":\"Intro \\\"quoted\\\"\",\"page\":0,\"paragraph\":0}
_____________Table Result_______________

{\"table\":[[\"a\",\"b\"]],\"description\":\"Intro \\\"quoted\\\"\",\"page\":0,\"table_no\":0}
_____________Image Result_______________

{\"description\":\"Intro \\\"quoted\\\"\",\"page\":0,\"image_no\":0}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_document_has_headers_only() {
        let text = to_text(&ExtractedDocument::default()).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("____")).count(), 3);
        assert!(!text.contains('{'));
    }
}
