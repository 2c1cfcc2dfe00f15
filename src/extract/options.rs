//! Extraction options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default header/footer band, as a fraction of page height.
pub const DEFAULT_MARGIN_RATIO: f32 = 0.05;

/// Options for extracting PDF content.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Fraction of the page height treated as header (top) and footer (bottom)
    pub margin_ratio: f32,

    /// How paragraph bottoms are ordered for association lookups
    pub bottom_order: BottomOrder,

    /// What to extract from the document
    pub extract_mode: ExtractMode,

    /// Whether to extract pages in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header/footer band ratio.
    pub fn with_margin_ratio(mut self, ratio: f32) -> Self {
        self.margin_ratio = ratio;
        self
    }

    /// Set the bottom ordering used for association.
    pub fn with_bottom_order(mut self, order: BottomOrder) -> Self {
        self.bottom_order = order;
        self
    }

    /// Associate against bottoms sorted ascending.
    pub fn sorted_bottoms(mut self) -> Self {
        self.bottom_order = BottomOrder::Sorted;
        self
    }

    /// Set extract mode.
    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.extract_mode = mode;
        self
    }

    /// Extract paragraphs only.
    pub fn text_only(mut self) -> Self {
        self.extract_mode = ExtractMode::TextOnly;
        self
    }

    /// Enable or disable parallel page extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the options before any page is touched.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.margin_ratio) {
            return Err(Error::Precondition(format!(
                "margin ratio must be in [0.0, 0.5), got {}",
                self.margin_ratio
            )));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            margin_ratio: DEFAULT_MARGIN_RATIO,
            bottom_order: BottomOrder::AsSorted,
            extract_mode: ExtractMode::Full,
            parallel: false,
        }
    }
}

/// Order of the paragraph bottoms that images and tables are searched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BottomOrder {
    /// Bottoms in paragraph order (ascending top), searched as-is even when
    /// a tall paragraph makes them non-monotonic
    #[default]
    AsSorted,
    /// Bottoms sorted ascending; paragraph numbering is unaffected
    Sorted,
}

/// What content to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtractMode {
    /// Paragraphs, images and tables
    #[default]
    Full,
    /// Paragraphs only
    TextOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.margin_ratio, 0.05);
        assert_eq!(options.bottom_order, BottomOrder::AsSorted);
        assert_eq!(options.extract_mode, ExtractMode::Full);
        assert!(!options.parallel);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let options = ExtractOptions::new()
            .with_margin_ratio(0.1)
            .sorted_bottoms()
            .text_only()
            .with_parallel(true);

        assert_eq!(options.margin_ratio, 0.1);
        assert_eq!(options.bottom_order, BottomOrder::Sorted);
        assert_eq!(options.extract_mode, ExtractMode::TextOnly);
        assert!(options.parallel);
    }

    #[test]
    fn test_margin_ratio_bounds() {
        assert!(ExtractOptions::new().with_margin_ratio(0.0).validate().is_ok());
        assert!(matches!(
            ExtractOptions::new().with_margin_ratio(0.5).validate(),
            Err(Error::Precondition(_))
        ));
        assert!(ExtractOptions::new().with_margin_ratio(-0.01).validate().is_err());
        assert!(ExtractOptions::new().with_margin_ratio(f32::NAN).validate().is_err());
    }
}
