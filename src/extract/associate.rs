//! Nearest-preceding paragraph lookup.

use crate::model::Paragraph;

use super::options::BottomOrder;

/// Binary search over `bottoms` for the paragraph immediately above `top`.
///
/// Returns the position of the last bottom that is `<= top`, position 0 when
/// every bottom lies below `top`, and `None` when `bottoms` is empty. The
/// search is a plain partition point: on a non-monotonic slice it returns
/// whatever the bisection lands on.
pub fn nearest_preceding(bottoms: &[f32], top: f32) -> Option<usize> {
    if bottoms.is_empty() {
        return None;
    }
    let idx = bottoms.partition_point(|&bottom| bottom <= top);
    Some(idx.saturating_sub(1))
}

/// Maps image and table tops to describing paragraphs on one page.
#[derive(Debug, Clone)]
pub struct SpatialAssociator {
    bottoms: Vec<f32>,
    /// Paragraph position for each entry of `bottoms`; empty when the two
    /// orders coincide
    positions: Vec<usize>,
}

impl SpatialAssociator {
    /// Build the lookup for paragraphs already in top-to-bottom order.
    pub fn new(paragraphs: &[Paragraph], order: BottomOrder) -> Self {
        match order {
            BottomOrder::AsSorted => Self {
                bottoms: paragraphs.iter().map(Paragraph::bottom).collect(),
                positions: Vec::new(),
            },
            BottomOrder::Sorted => {
                let mut pairs: Vec<(f32, usize)> = paragraphs
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (p.bottom(), i))
                    .collect();
                pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
                let (bottoms, positions) = pairs.into_iter().unzip();
                Self { bottoms, positions }
            }
        }
    }

    /// Position (in paragraph order) of the paragraph describing an element
    /// whose top edge is `top`. Falls back to the first paragraph, and
    /// returns `None` only when the page has no paragraphs.
    pub fn locate(&self, top: f32) -> Option<usize> {
        let found = nearest_preceding(&self.bottoms, top)?;
        if self.positions.is_empty() {
            return Some(found);
        }
        if self.bottoms[found] > top {
            return Some(0);
        }
        Some(self.positions[found])
    }

    pub fn is_empty(&self) -> bool {
        self.bottoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn para(top: f32, bottom: f32, index: usize) -> Paragraph {
        Paragraph::new(BoundingBox::new(0.0, top, 100.0, bottom), "p", index, 0)
    }

    #[test]
    fn test_nearest_preceding() {
        let bottoms = [120.0, 520.0, 800.0];
        assert_eq!(nearest_preceding(&bottoms, 50.0), Some(0));
        assert_eq!(nearest_preceding(&bottoms, 119.9), Some(0));
        assert_eq!(nearest_preceding(&bottoms, 120.0), Some(0));
        assert_eq!(nearest_preceding(&bottoms, 530.0), Some(1));
        assert_eq!(nearest_preceding(&bottoms, 800.0), Some(2));
        assert_eq!(nearest_preceding(&bottoms, 10_000.0), Some(2));
        assert_eq!(nearest_preceding(&[], 10.0), None);
    }

    #[test]
    fn test_last_bottom_maps_to_last_paragraph() {
        let bottoms = [10.0, 10.0, 30.0, 30.0];
        assert_eq!(nearest_preceding(&bottoms, 30.0), Some(3));
        assert_eq!(nearest_preceding(&bottoms, 10.0), Some(1));
    }

    #[test]
    fn test_as_sorted_searches_raw_bottoms() {
        // A tall first paragraph ends below the second one.
        let paragraphs = vec![para(100.0, 600.0, 0), para(200.0, 220.0, 1), para(700.0, 720.0, 2)];
        let raw = SpatialAssociator::new(&paragraphs, BottomOrder::AsSorted);
        let sorted = SpatialAssociator::new(&paragraphs, BottomOrder::Sorted);

        // Bottoms [600, 220, 720]: the bisection probes 220 first.
        assert_eq!(raw.locate(300.0), Some(1));
        assert_eq!(sorted.locate(300.0), Some(1));

        // Sorted bottoms [220, 600, 720] find the tall paragraph.
        assert_eq!(raw.locate(650.0), Some(1));
        assert_eq!(sorted.locate(650.0), Some(0));

        assert_eq!(sorted.locate(800.0), Some(2));
    }

    #[test]
    fn test_sorted_fallback_is_first_paragraph() {
        let paragraphs = vec![para(100.0, 600.0, 0), para(200.0, 220.0, 1)];
        let sorted = SpatialAssociator::new(&paragraphs, BottomOrder::Sorted);
        assert_eq!(sorted.locate(150.0), Some(0));
    }

    #[test]
    fn test_empty_page() {
        let assoc = SpatialAssociator::new(&[], BottomOrder::Sorted);
        assert!(assoc.is_empty());
        assert_eq!(assoc.locate(100.0), None);
    }
}
