use super::super::domain::PageAnalysis;
use super::weights::WeightedPages;

/// Result of applying one penalty rule to a weighted page set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPenalty {
    pub affected_pages: usize,
    pub affected_weight: f64,
    /// Share of the run's total weight carried by affected pages, in [0, 1].
    pub weighted_impact: f64,
    pub points: u32,
}

impl WeightedPenalty {
    const NONE: Self = Self {
        affected_pages: 0,
        affected_weight: 0.0,
        weighted_impact: 0.0,
        points: 0,
    };
}

/// Scales `base_penalty` by the weight share of pages matching `predicate`.
pub fn weighted_penalty<F>(pages: &WeightedPages<'_>, predicate: F, base_penalty: u32) -> WeightedPenalty
where
    F: Fn(&PageAnalysis) -> bool,
{
    let (affected_pages, affected_weight) = pages
        .iter()
        .filter(|entry| predicate(entry.page))
        .fold((0usize, 0.0f64), |(count, weight), entry| {
            (count + 1, weight + entry.weight)
        });

    let total_weight = pages.total_weight();
    if affected_pages == 0 || total_weight <= 0.0 {
        return WeightedPenalty::NONE;
    }

    let weighted_impact = affected_weight / total_weight;
    let points = (f64::from(base_penalty) * weighted_impact).round() as u32;

    WeightedPenalty {
        affected_pages,
        affected_weight,
        weighted_impact,
        points,
    }
}
