use super::super::domain::PageAnalysis;
use serde::{Deserialize, Serialize};

/// Score category a rule deducts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Seo,
    Technical,
    Content,
    Performance,
}

impl ScoreCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::Seo, Self::Technical, Self::Content, Self::Performance]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Seo => "SEO",
            Self::Technical => "Technical",
            Self::Content => "Content",
            Self::Performance => "Performance",
        }
    }

    /// Coefficient of the category in the global score.
    pub const fn global_weight(self) -> f64 {
        match self {
            Self::Seo => 0.35,
            Self::Technical => 0.25,
            Self::Content => 0.25,
            Self::Performance => 0.15,
        }
    }
}

/// Reporting bucket for issue counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Critical,
    Important,
    Minor,
}

/// Quality problem a page can exhibit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingTitle,
    MissingMetaDescription,
    InvalidH1,
    NotIndexable,
    MissingCanonical,
    ErrorStatus,
    MissingViewport,
    NonSelfCanonical,
    Redirected,
    LongRedirectChain,
    ThinContent,
    MissingAltText,
    LowWordCount,
    SlowLoad,
    SlowTtfb,
}

impl IssueKind {
    pub fn matches(self, page: &PageAnalysis) -> bool {
        match self {
            Self::MissingTitle => page.title_missing(),
            Self::MissingMetaDescription => page.meta_description_missing(),
            Self::InvalidH1 => page.h1_count != 1,
            Self::NotIndexable => !page.is_indexable,
            Self::MissingCanonical => !page.has_canonical,
            Self::ErrorStatus => page.status_code >= 400,
            Self::MissingViewport => !page.has_viewport,
            Self::NonSelfCanonical => {
                page.has_canonical && page.canonical_points_to_self == Some(false)
            }
            Self::Redirected => page.redirect_chain_length > 0,
            Self::LongRedirectChain => page.redirect_chain_length >= 3,
            Self::ThinContent => page.has_thin_content,
            Self::MissingAltText => page.missing_alt_images_count > 0,
            Self::LowWordCount => page.word_count < 50,
            Self::SlowLoad => page.load_time > 3.0,
            Self::SlowTtfb => page.ttfb.map(|ttfb| ttfb > 1.0).unwrap_or(false),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MissingTitle => "Missing title",
            Self::MissingMetaDescription => "Missing meta description",
            Self::InvalidH1 => "Missing or multiple H1",
            Self::NotIndexable => "Not indexable",
            Self::MissingCanonical => "Missing canonical",
            Self::ErrorStatus => "4xx/5xx status",
            Self::MissingViewport => "Missing viewport",
            Self::NonSelfCanonical => "Canonical points elsewhere",
            Self::Redirected => "Redirected",
            Self::LongRedirectChain => "Redirect chain of 3+ hops",
            Self::ThinContent => "Thin content",
            Self::MissingAltText => "Images missing alt text",
            Self::LowWordCount => "Fewer than 50 words",
            Self::SlowLoad => "Load time over 3s",
            Self::SlowTtfb => "TTFB over 1s",
        }
    }
}

/// One row of the penalty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueRule {
    pub issue: IssueKind,
    pub category: ScoreCategory,
    pub base_penalty: u32,
    pub severity: Option<IssueSeverity>,
}

impl IssueRule {
    const fn new(
        issue: IssueKind,
        category: ScoreCategory,
        base_penalty: u32,
        severity: Option<IssueSeverity>,
    ) -> Self {
        Self {
            issue,
            category,
            base_penalty,
            severity,
        }
    }

    pub fn matches(&self, page: &PageAnalysis) -> bool {
        self.issue.matches(page)
    }
}

use IssueKind::*;
use IssueSeverity::{Critical, Important, Minor};
use ScoreCategory::{Content, Performance, Seo, Technical};

/// Every rule evaluated by a scoring run.
///
/// The two redirect rules overlap on purpose: a chain of three or more hops is
/// penalised under both.
pub const ISSUE_RULES: [IssueRule; 15] = [
    IssueRule::new(MissingTitle, Seo, 25, Some(Critical)),
    IssueRule::new(MissingMetaDescription, Seo, 15, Some(Important)),
    IssueRule::new(InvalidH1, Seo, 20, Some(Important)),
    IssueRule::new(NotIndexable, Seo, 30, Some(Critical)),
    IssueRule::new(MissingCanonical, Seo, 10, Some(Minor)),
    IssueRule::new(ErrorStatus, Technical, 40, Some(Critical)),
    IssueRule::new(MissingViewport, Technical, 20, Some(Important)),
    IssueRule::new(NonSelfCanonical, Technical, 15, Some(Minor)),
    IssueRule::new(Redirected, Technical, 30, None),
    IssueRule::new(LongRedirectChain, Technical, 80, None),
    IssueRule::new(ThinContent, Content, 25, Some(Important)),
    IssueRule::new(MissingAltText, Content, 15, Some(Minor)),
    IssueRule::new(LowWordCount, Content, 30, Some(Critical)),
    IssueRule::new(SlowLoad, Performance, 30, Some(Important)),
    IssueRule::new(SlowTtfb, Performance, 20, Some(Minor)),
];

pub fn rules_for(category: ScoreCategory) -> impl Iterator<Item = &'static IssueRule> {
    ISSUE_RULES
        .iter()
        .filter(move |rule| rule.category == category)
}
