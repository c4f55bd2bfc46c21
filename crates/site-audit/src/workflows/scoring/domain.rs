use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a crawl task; every scoring run is keyed by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Coarse structural role of a page inside the audited site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Home,
    Category,
    Product,
    Article,
    Other,
}

impl PageType {
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Self::Home,
            "category" => Self::Category,
            "product" => Self::Product,
            "article" => Self::Article,
            _ => Self::Other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Category => "category",
            Self::Product => "product",
            Self::Article => "article",
            Self::Other => "other",
        }
    }

    /// Importance multiplier applied on top of the depth discount.
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Home => 5.0,
            Self::Category => 2.5,
            Self::Product | Self::Article => 1.2,
            Self::Other => 1.0,
        }
    }
}

/// Per-URL crawl analysis produced upstream by the crawler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub url: String,
    pub depth: u32,
    /// Raw type label as reported by the crawler; kept verbatim for histograms.
    pub page_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    pub h1_count: u32,
    #[serde(default)]
    pub h1_text: Option<String>,
    pub word_count: u32,
    pub load_time: f64,
    pub status_code: u16,
    pub is_indexable: bool,
    pub has_canonical: bool,
    #[serde(default)]
    pub canonical_points_to_self: Option<bool>,
    pub has_thin_content: bool,
    pub missing_alt_images_count: u32,
    pub internal_links_count: u32,
    pub has_viewport: bool,
    #[serde(default)]
    pub ttfb: Option<f64>,
    pub redirect_chain_length: u32,
}

impl PageAnalysis {
    pub fn kind(&self) -> PageType {
        PageType::from_label(&self.page_type)
    }

    pub fn title_missing(&self) -> bool {
        is_blank(self.title.as_deref())
    }

    pub fn meta_description_missing(&self) -> bool {
        is_blank(self.meta_description.as_deref())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|text| text.trim().is_empty()).unwrap_or(true)
}

/// Lifecycle status reported by the crawl task owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Partial,
    Failed,
    #[serde(untagged)]
    Unknown(String),
}

impl TaskStatus {
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "completed" => Self::Completed,
            "partial" => Self::Partial,
            "failed" => Self::Failed,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Task metadata read alongside the page records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMetadata {
    pub status: TaskStatus,
    pub total_urls: u32,
    pub pages_scanned: u32,
    pub audit_id: String,
    pub user_id: String,
    pub url: String,
}
