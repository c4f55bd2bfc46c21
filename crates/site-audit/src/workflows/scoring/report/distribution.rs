use super::super::domain::PageAnalysis;
use super::super::engine::{IssueKind, IssueSeverity, ISSUE_RULES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unweighted issue counts per severity bucket.
///
/// Counts are summed per rule, so a page matching two critical rules adds two
/// to `critical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub important: usize,
    pub minor: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.critical + self.important + self.minor
    }

    fn bump(&mut self, severity: IssueSeverity, by: usize) {
        match severity {
            IssueSeverity::Critical => self.critical += by,
            IssueSeverity::Important => self.important += by,
            IssueSeverity::Minor => self.minor += by,
        }
    }
}

pub(crate) fn affected_count(pages: &[PageAnalysis], issue: IssueKind) -> usize {
    pages.iter().filter(|page| issue.matches(page)).count()
}

/// Share of pages (by count, not weight) affected by each issue, rounded to two decimals.
pub fn issue_percentages(pages: &[PageAnalysis]) -> BTreeMap<IssueKind, f64> {
    ISSUE_RULES
        .iter()
        .map(|rule| {
            let affected = affected_count(pages, rule.issue);
            (rule.issue, percentage(affected, pages.len()))
        })
        .collect()
}

pub fn pages_by_depth(pages: &[PageAnalysis]) -> BTreeMap<String, usize> {
    let mut histogram = BTreeMap::new();
    for page in pages {
        *histogram.entry(format!("depth_{}", page.depth)).or_insert(0) += 1;
    }
    histogram
}

pub fn pages_by_type(pages: &[PageAnalysis]) -> BTreeMap<String, usize> {
    let mut histogram = BTreeMap::new();
    for page in pages {
        *histogram.entry(page.page_type.clone()).or_insert(0) += 1;
    }
    histogram
}

pub fn issues_by_severity(pages: &[PageAnalysis]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for rule in &ISSUE_RULES {
        if let Some(severity) = rule.severity {
            counts.bump(severity, affected_count(pages, rule.issue));
        }
    }
    counts
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
