//! PDF backend built on lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{sniff_version, sniff_version_from_path};
use crate::error::{Error, Result};
use crate::model::BoundingBox;

use super::backend::{PdfBackend, RawBlock, RawImage, RawPage, RawTable};
use super::layout::{layout_blocks, resolve_dict, ContentScanner, Matrix, TextSpan};
use super::table_detector::TableDetector;

/// US Letter, used when a page declares no MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Limit on `/Parent` hops when looking up inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A PDF document opened with lopdf.
pub struct LopdfBackend {
    doc: LopdfDocument,
    page_ids: Vec<ObjectId>,
    version: String,
    detector: TableDetector,
}

impl LopdfBackend {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let version = sniff_version_from_path(path)?;
        let doc = LopdfDocument::load(path)?;
        log::info!("Opened {} (PDF {})", path.display(), version);
        Ok(Self::from_document(doc, version))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let version = sniff_version(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc, version))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument, version: String) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self {
            doc,
            page_ids,
            version,
            detector: TableDetector::new(),
        }
    }

    /// Replace the table detector.
    pub fn with_table_detector(mut self, detector: TableDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Look up a page attribute, following `/Parent` for inheritable keys.
    fn inherited<'a>(&'a self, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut dict = page;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn rect(&self, page: &Dictionary, key: &[u8]) -> Option<[f32; 4]> {
        let values: Vec<f32> = self
            .inherited(page, key)
            .and_then(|obj| match obj {
                Object::Reference(r) => self.doc.get_object(*r).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_array().ok())?
            .iter()
            .filter_map(|o| o.as_float().ok())
            .collect();

        match values.as_slice() {
            [x0, y0, x1, y1, ..] => Some([x0.min(*x1), y0.min(*y1), x0.max(*x1), y0.max(*y1)]),
            _ => None,
        }
    }

    /// Visible area: the CropBox clipped to the MediaBox.
    fn crop_box(&self, page: &Dictionary) -> [f32; 4] {
        let media = self.rect(page, b"MediaBox").unwrap_or(DEFAULT_MEDIA_BOX);
        let Some(crop) = self.rect(page, b"CropBox") else {
            return media;
        };

        let clipped = [
            crop[0].max(media[0]),
            crop[1].max(media[1]),
            crop[2].min(media[2]),
            crop[3].min(media[3]),
        ];
        if clipped[0] < clipped[2] && clipped[1] < clipped[3] {
            clipped
        } else {
            log::warn!("CropBox {:?} lies outside MediaBox {:?}, using MediaBox", crop, media);
            media
        }
    }

    /// Clockwise page rotation in degrees, one of 0, 90, 180 or 270.
    fn rotation(&self, page: &Dictionary) -> u16 {
        let degrees = match self.inherited(page, b"Rotate") {
            Some(Object::Integer(n)) => *n,
            Some(Object::Real(r)) => *r as i64,
            _ => 0,
        };
        match degrees.rem_euclid(360) {
            r @ (0 | 90 | 180 | 270) => r as u16,
            other => {
                log::warn!("Ignoring /Rotate {}, not a multiple of 90", other);
                0
            }
        }
    }
}

impl PdfBackend for LopdfBackend {
    type Page = LopdfPage;

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn load_page(&self, page_index: usize) -> Result<LopdfPage> {
        let page_id = *self
            .page_ids
            .get(page_index)
            .ok_or(Error::PageOutOfRange(page_index, self.page_ids.len()))?;
        let page = self.doc.get_dictionary(page_id)?;

        let crop = self.crop_box(page);
        let rotate = self.rotation(page);
        let [x0, y0, x1, y1] = crop;
        let height = if rotate % 180 == 0 { y1 - y0 } else { x1 - x0 };
        let resources = self
            .inherited(page, b"Resources")
            .and_then(|r| resolve_dict(&self.doc, r));
        let content = self.doc.get_page_content(page_id)?;

        let scan = ContentScanner::new(&self.doc).scan(
            &content,
            resources,
            Matrix::page_space(crop, rotate),
        )?;

        log::debug!(
            "Page {} (rotated {}): {} spans, {} images",
            page_index,
            rotate,
            scan.spans.len(),
            scan.images.len()
        );

        Ok(LopdfPage {
            height,
            spans: scan.spans,
            images: scan.images,
            detector: self.detector.clone(),
        })
    }

    fn pdf_version(&self) -> Option<String> {
        Some(self.version.clone())
    }
}

/// A page decoded by [`LopdfBackend`].
///
/// Blocks are laid out on demand. The spans are released once tables have
/// been detected from them.
#[derive(Debug, Clone)]
pub struct LopdfPage {
    height: f32,
    spans: Vec<TextSpan>,
    images: Vec<BoundingBox>,
    detector: TableDetector,
}

impl LopdfPage {
    /// Positioned text runs found on the page.
    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }
}

impl RawPage for LopdfPage {
    fn height(&self) -> f32 {
        self.height
    }

    fn text_blocks(&mut self) -> Vec<RawBlock> {
        layout_blocks(&self.spans)
    }

    fn images(&mut self) -> Vec<RawImage> {
        std::mem::take(&mut self.images)
            .into_iter()
            .map(RawImage::new)
            .collect()
    }

    fn tables(&mut self) -> Vec<RawTable> {
        let spans = std::mem::take(&mut self.spans);
        self.detector.detect(&spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract_document, ExtractOptions};
    use lopdf::{dictionary, Stream};

    fn build_pdf(content: &[u8]) -> Vec<u8> {
        build_pdf_with(content, Dictionary::new())
    }

    /// Like `build_pdf`, with extra entries on the page dictionary.
    fn build_pdf_with(content: &[u8], page_attrs: Dictionary) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(1),
                "Height" => Object::Integer(1),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => Object::Integer(8),
            },
            vec![0u8],
        ));
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Contents" => Object::Reference(content_id),
        };
        for (key, value) in page_attrs.iter() {
            page.set(key.clone(), value.clone());
        }
        let page_id = doc.add_object(page);
        // Resources and MediaBox live on the page tree node and are inherited.
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(600),
                Object::Integer(800),
            ],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                "XObject" => dictionary! { "Im1" => Object::Reference(image_id) },
            },
        });
        if let Ok(dict) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
            dict.set("Parent", Object::Reference(pages_id));
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_text_positions_are_top_down() {
        let pdf = build_pdf(
            b"BT /F1 12 Tf 72 700 Td (Upper line) Tj ET \
              BT /F1 12 Tf 72 200 Td (Lower line) Tj ET",
        );
        let backend = LopdfBackend::from_bytes(&pdf).unwrap();

        assert_eq!(backend.page_count(), 1);
        assert_eq!(backend.pdf_version().as_deref(), Some("1.5"));

        let mut page = backend.load_page(0).unwrap();
        assert_eq!(page.height(), 800.0);

        let blocks = page.text_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text, "Upper line");
        assert!((blocks[0].bbox.bottom - 102.4).abs() < 0.5);
        assert!(blocks[0].bbox.top < blocks[1].bbox.top);
    }

    #[test]
    fn test_image_placement_through_ctm() {
        let pdf = build_pdf(b"q 200 0 0 100 50 500 cm /Im1 Do Q");
        let backend = LopdfBackend::from_bytes(&pdf).unwrap();
        let mut page = backend.load_page(0).unwrap();

        let images = page.images();
        assert_eq!(images.len(), 1);
        let bbox = images[0].bbox;
        assert_eq!(
            (bbox.left, bbox.top, bbox.right, bbox.bottom),
            (50.0, 200.0, 250.0, 300.0)
        );
        assert!(page.images().is_empty());
    }

    #[test]
    fn test_tables_consume_spans() {
        let pdf = build_pdf(
            b"BT /F1 10 Tf 50 700 Td (Name) Tj ET BT /F1 10 Tf 200 700 Td (Age) Tj ET \
              BT /F1 10 Tf 50 685 Td (Alice) Tj ET BT /F1 10 Tf 200 685 Td (30) Tj ET \
              BT /F1 10 Tf 50 670 Td (Bob) Tj ET BT /F1 10 Tf 200 670 Td (25) Tj ET",
        );
        let backend = LopdfBackend::from_bytes(&pdf).unwrap();
        let mut page = backend.load_page(0).unwrap();
        assert_eq!(page.spans().len(), 6);

        let tables = page.tables();
        assert_eq!(tables.len(), 1);
        assert!(page.spans().is_empty());
        assert_eq!(tables[0].clone().extract()[1], vec!["Alice", "30"]);
    }

    fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> Object {
        Object::Array(vec![
            Object::Integer(x0),
            Object::Integer(y0),
            Object::Integer(x1),
            Object::Integer(y1),
        ])
    }

    #[test]
    fn test_crop_box_sets_height_and_origin() {
        // 600x800 media, 600x600 visible. The header sits 20pt below the
        // visible top, inside the 5% band of the cropped page.
        let pdf = build_pdf_with(
            b"BT /F1 10 Tf 72 680 Td (Running header) Tj ET \
              BT /F1 12 Tf 72 400 Td (Body) Tj ET",
            dictionary! { "CropBox" => rect(0, 100, 600, 700) },
        );
        let backend = LopdfBackend::from_bytes(&pdf).unwrap();

        let mut page = backend.load_page(0).unwrap();
        assert_eq!(page.height(), 600.0);
        let blocks = page.text_blocks();
        assert_eq!(blocks[0].text, "Running header");
        assert!((blocks[0].bbox.top - 12.0).abs() < 1e-3);

        let doc = extract_document(&backend, &ExtractOptions::default()).unwrap();
        let texts: Vec<&str> = doc.texts.iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["Body"]);
    }

    #[test]
    fn test_crop_box_clipped_to_media_box() {
        let pdf = build_pdf_with(b"", dictionary! { "CropBox" => rect(-50, -50, 700, 900) });
        let backend = LopdfBackend::from_bytes(&pdf).unwrap();
        assert_eq!(backend.load_page(0).unwrap().height(), 800.0);
    }

    #[test]
    fn test_rotated_page() {
        let pdf = build_pdf_with(
            b"q 200 0 0 100 50 500 cm /Im1 Do Q",
            dictionary! { "Rotate" => Object::Integer(90) },
        );
        let backend = LopdfBackend::from_bytes(&pdf).unwrap();
        let mut page = backend.load_page(0).unwrap();

        // A quarter turn shows the 600x800 page landscape.
        assert_eq!(page.height(), 600.0);
        let bbox = page.images()[0].bbox;
        assert_eq!(
            (bbox.left, bbox.top, bbox.right, bbox.bottom),
            (500.0, 50.0, 600.0, 250.0)
        );
    }

    #[test]
    fn test_negative_rotation_normalized() {
        let pdf = build_pdf_with(b"", dictionary! { "Rotate" => Object::Integer(-90) });
        let backend = LopdfBackend::from_bytes(&pdf).unwrap();
        assert_eq!(backend.load_page(0).unwrap().height(), 600.0);
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert!(matches!(
            LopdfBackend::from_bytes(b"<html></html>"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_page_out_of_range() {
        let backend = LopdfBackend::from_bytes(&build_pdf(b"")).unwrap();
        assert!(matches!(
            backend.load_page(3),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }
}
