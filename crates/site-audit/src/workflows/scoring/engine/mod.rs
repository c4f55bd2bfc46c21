mod config;
mod penalty;
mod rules;
mod weights;

pub use config::{ScoringConfig, DEFAULT_COMPLETION_THRESHOLD};
pub use penalty::{weighted_penalty, WeightedPenalty};
pub use rules::{rules_for, IssueKind, IssueRule, IssueSeverity, ScoreCategory, ISSUE_RULES};
pub use weights::{page_weight, PageWeight, WeightedPages, DEPTH_DECAY};

use super::breakdown::ScoreBreakdown;
use super::domain::PageAnalysis;
use super::report::{self, CrawlProgress};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no page analyses to score")]
pub struct EmptyCrawl;

/// Points a single rule removed from its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDeduction {
    pub issue: IssueKind,
    pub category: ScoreCategory,
    pub base_penalty: u32,
    pub affected_pages: usize,
    pub weighted_impact: f64,
    pub points: u32,
}

/// The four clamped category scores of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub seo: u8,
    pub technical: u8,
    pub content: u8,
    pub performance: u8,
}

impl CategoryScores {
    pub fn get(&self, category: ScoreCategory) -> u8 {
        match category {
            ScoreCategory::Seo => self.seo,
            ScoreCategory::Technical => self.technical,
            ScoreCategory::Content => self.content,
            ScoreCategory::Performance => self.performance,
        }
    }

    /// Convex combination of the category scores, rounded to the nearest point.
    pub fn global(&self) -> u8 {
        let weighted: f64 = ScoreCategory::ordered()
            .into_iter()
            .map(|category| category.global_weight() * f64::from(self.get(category)))
            .sum();
        weighted.round().clamp(0.0, 100.0) as u8
    }
}

/// Stateless scorer turning page analyses into a [`ScoreBreakdown`].
///
/// No I/O and no logging happen here; identical inputs give identical output.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Applies every rule of the penalty table, keeping those that matched at least one page.
    pub fn deductions(&self, pages: &WeightedPages<'_>) -> Vec<RuleDeduction> {
        ISSUE_RULES
            .iter()
            .filter_map(|rule| {
                let penalty = weighted_penalty(pages, |page| rule.matches(page), rule.base_penalty);
                (penalty.affected_pages > 0).then(|| RuleDeduction {
                    issue: rule.issue,
                    category: rule.category,
                    base_penalty: rule.base_penalty,
                    affected_pages: penalty.affected_pages,
                    weighted_impact: penalty.weighted_impact,
                    points: penalty.points,
                })
            })
            .collect()
    }

    pub fn category_scores(&self, deductions: &[RuleDeduction]) -> CategoryScores {
        let compose = |category: ScoreCategory| -> u8 {
            let total: u32 = deductions
                .iter()
                .filter(|deduction| deduction.category == category)
                .map(|deduction| deduction.points)
                .sum();
            100u32.saturating_sub(total) as u8
        };

        CategoryScores {
            seo: compose(ScoreCategory::Seo),
            technical: compose(ScoreCategory::Technical),
            content: compose(ScoreCategory::Content),
            performance: compose(ScoreCategory::Performance),
        }
    }

    /// Scores one crawl. An empty page set is rejected rather than reported as a perfect site.
    pub fn score(
        &self,
        pages: &[PageAnalysis],
        progress: &CrawlProgress,
    ) -> Result<ScoreBreakdown, EmptyCrawl> {
        if pages.is_empty() {
            return Err(EmptyCrawl);
        }

        let weighted = WeightedPages::new(pages);
        let deductions = self.deductions(&weighted);
        let scores = self.category_scores(&deductions);
        let completion =
            report::assess_completion(progress, pages.len(), self.config.completion_threshold);

        Ok(ScoreBreakdown {
            seo_score: scores.seo,
            technical_score: scores.technical,
            content_score: scores.content,
            performance_score: scores.performance,
            global_score: scores.global(),
            issue_percentages: report::issue_percentages(pages),
            pages_by_depth: report::pages_by_depth(pages),
            pages_by_type: report::pages_by_type(pages),
            issues_by_severity: report::issues_by_severity(pages),
            deductions,
            page_count: pages.len(),
            is_partial: completion.is_partial,
            completion_percentage: completion.completion_percentage,
            partial_data_note: completion.partial_data_note,
        })
    }
}
