//! Document-level aggregation.

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{DocumentInfo, ExtractedDocument, PageContent};
use crate::parser::PdfBackend;

use super::options::ExtractOptions;
use super::page::PageExtractor;

/// Runs the page extractor over every page and concatenates the results in
/// page order.
#[derive(Debug, Clone, Default)]
pub struct DocumentAggregator {
    options: ExtractOptions,
}

impl DocumentAggregator {
    /// Create an aggregator, rejecting invalid options up front.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    fn info<B: PdfBackend>(backend: &B) -> DocumentInfo {
        DocumentInfo {
            pdf_version: backend.pdf_version(),
            page_count: backend.page_count(),
        }
    }

    /// Extract pages one at a time. The first failing page aborts the run.
    pub fn run<B: PdfBackend>(&self, backend: &B) -> Result<ExtractedDocument> {
        let extractor = PageExtractor::new(&self.options);
        let mut document = ExtractedDocument::new(Self::info(backend));

        for page_index in 0..backend.page_count() {
            let page = backend.load_page(page_index)?;
            document.append_page(extractor.extract(page, page_index));
        }

        log::info!(
            "Extracted {} paragraphs, {} images, {} tables from {} pages",
            document.texts.len(),
            document.images.len(),
            document.tables.len(),
            document.info.page_count
        );
        Ok(document)
    }

    /// Extract pages on the rayon pool. Output is identical to [`run`].
    ///
    /// [`run`]: DocumentAggregator::run
    pub fn run_parallel<B>(&self, backend: &B) -> Result<ExtractedDocument>
    where
        B: PdfBackend + Sync,
        B::Page: Send,
    {
        let extractor = PageExtractor::new(&self.options);
        let pages: Vec<PageContent> = (0..backend.page_count())
            .into_par_iter()
            .map(|page_index| -> Result<PageContent> {
                let page = backend.load_page(page_index)?;
                Ok(extractor.extract(page, page_index))
            })
            .collect::<Result<_>>()?;

        let mut document = ExtractedDocument::new(Self::info(backend));
        for page in pages {
            document.append_page(page);
        }

        log::info!(
            "Extracted {} paragraphs, {} images, {} tables from {} pages (parallel)",
            document.texts.len(),
            document.images.len(),
            document.tables.len(),
            document.info.page_count
        );
        Ok(document)
    }
}

/// Extract every page of `backend`, sequentially or in parallel as the
/// options ask.
pub fn extract_document<B>(backend: &B, options: &ExtractOptions) -> Result<ExtractedDocument>
where
    B: PdfBackend + Sync,
    B::Page: Send,
{
    let aggregator = DocumentAggregator::new(options.clone())?;
    if options.parallel {
        aggregator.run_parallel(backend)
    } else {
        aggregator.run(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::BoundingBox;
    use crate::parser::{MemoryBackend, MemoryPage, RawBlock, RawImage};

    fn page(n: usize) -> MemoryPage {
        MemoryPage::new(1000.0)
            .with_block(RawBlock::new(
                BoundingBox::new(0.0, 100.0, 500.0, 120.0),
                format!("Page {} text", n),
            ))
            .with_image(RawImage::new(BoundingBox::new(0.0, 300.0, 100.0, 400.0)))
    }

    fn backend(pages: usize) -> MemoryBackend {
        MemoryBackend::new((0..pages).map(page).collect())
    }

    #[test]
    fn test_pages_concatenated_in_order() {
        let doc = DocumentAggregator::default().run(&backend(4)).unwrap();
        assert_eq!(doc.info.page_count, 4);

        let pages: Vec<usize> = doc.images.iter().map(|i| i.page_index).collect();
        assert_eq!(pages, vec![0, 1, 2, 3]);
        assert!(doc.images.iter().all(|i| i.image_index == 0));
        assert_eq!(&*doc.images[2].description, "Page 2 text");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let backend = backend(16);
        let aggregator = DocumentAggregator::default();
        let sequential = aggregator.run(&backend).unwrap();
        let parallel = aggregator.run_parallel(&backend).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ExtractOptions::new().with_margin_ratio(0.7);
        assert!(matches!(
            extract_document(&backend(1), &options),
            Err(Error::Precondition(_))
        ));
    }

    struct FailingBackend;

    impl PdfBackend for FailingBackend {
        type Page = MemoryPage;

        fn page_count(&self) -> usize {
            3
        }

        fn load_page(&self, page_index: usize) -> Result<MemoryPage> {
            if page_index == 1 {
                Err(Error::DocumentParse("broken content stream".into()))
            } else {
                Ok(page(page_index))
            }
        }
    }

    #[test]
    fn test_page_failure_aborts_document() {
        let result = DocumentAggregator::default().run(&FailingBackend);
        assert!(matches!(result, Err(Error::DocumentParse(_))));

        let result = DocumentAggregator::default().run_parallel(&FailingBackend);
        assert!(result.is_err());
    }
}
