use super::domain::TaskId;
use super::engine::{IssueKind, RuleDeduction};
use super::report::SeverityCounts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full result of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub seo_score: u8,
    pub technical_score: u8,
    pub content_score: u8,
    pub performance_score: u8,
    pub global_score: u8,
    pub issue_percentages: BTreeMap<IssueKind, f64>,
    pub pages_by_depth: BTreeMap<String, usize>,
    pub pages_by_type: BTreeMap<String, usize>,
    pub issues_by_severity: SeverityCounts,
    pub deductions: Vec<RuleDeduction>,
    pub page_count: usize,
    pub is_partial: bool,
    pub completion_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_data_note: Option<String>,
}

impl ScoreBreakdown {
    pub fn issue_count(&self) -> usize {
        self.issues_by_severity.total()
    }
}

/// Persisted form of a breakdown; replaced wholesale on every run of the same task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub task_id: TaskId,
    pub breakdown: ScoreBreakdown,
    pub calculated_at: DateTime<Utc>,
}
