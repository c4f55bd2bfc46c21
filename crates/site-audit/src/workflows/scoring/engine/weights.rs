use super::super::domain::PageAnalysis;

/// Importance retained per link hop away from the entry page.
pub const DEPTH_DECAY: f64 = 0.7;

/// Structural importance of a single page.
///
/// The weight is the product of a depth discount, a page-type multiplier and a
/// slowly growing bonus for inbound internal links. Every factor is strictly
/// positive, so every page contributes something to the run's total weight.
pub fn page_weight(page: &PageAnalysis) -> f64 {
    let depth_factor = DEPTH_DECAY.powf(f64::from(page.depth));
    let type_factor = page.kind().multiplier();
    let link_factor = (f64::from(page.internal_links_count) + 10.0).log10() / 2.0;

    // 0.7^depth underflows to zero past a few thousand hops.
    (depth_factor * type_factor * link_factor).max(f64::MIN_POSITIVE)
}

/// A page paired with its derived weight.
#[derive(Debug, Clone, Copy)]
pub struct PageWeight<'a> {
    pub page: &'a PageAnalysis,
    pub weight: f64,
}

/// Weighted view over every page of a run, with the total computed once.
#[derive(Debug, Clone)]
pub struct WeightedPages<'a> {
    entries: Vec<PageWeight<'a>>,
    total_weight: f64,
}

impl<'a> WeightedPages<'a> {
    pub fn new(pages: &'a [PageAnalysis]) -> Self {
        let entries: Vec<PageWeight<'a>> = pages
            .iter()
            .map(|page| PageWeight {
                page,
                weight: page_weight(page),
            })
            .collect();
        let total_weight = entries.iter().map(|entry| entry.weight).sum();

        Self {
            entries,
            total_weight,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageWeight<'a>> {
        self.entries.iter()
    }
}
