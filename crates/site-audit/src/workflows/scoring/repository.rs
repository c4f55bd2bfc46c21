use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::breakdown::ScoreRecord;
use super::domain::{PageAnalysis, TaskId, TaskMetadata};

/// Storage abstraction over the hosted audit database.
pub trait AuditStore: Send + Sync {
    fn fetch_pages(&self, task_id: &TaskId) -> Result<Vec<PageAnalysis>, RepositoryError>;
    fn fetch_task(&self, task_id: &TaskId) -> Result<Option<TaskMetadata>, RepositoryError>;
    /// Inserts or replaces the breakdown keyed by the record's task id.
    fn upsert_breakdown(&self, record: ScoreRecord) -> Result<(), RepositoryError>;
    fn update_audit_status(
        &self,
        audit_id: &str,
        update: AuditStatusUpdate,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("store rejected the request: {0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Completed,
    Partial,
}

/// Status write applied to the audit that owns a scored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStatusUpdate {
    pub status: AuditStatus,
    pub pages_scanned: usize,
    pub seo_score: u8,
    pub completed_at: DateTime<Utc>,
}

/// Hook that asks the cost/optimization service to recompute its estimates.
pub trait OptimizationTrigger: Send + Sync {
    fn recalculate(&self, task_id: &TaskId) -> Result<(), CollaboratorError>;
}

/// Outbound notification channel for the audit owner.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: ScoreNotification) -> Result<(), CollaboratorError>;
}

/// Payload announcing a finished scoring run to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreNotification {
    pub user_id: String,
    pub task_id: TaskId,
    pub url: String,
    pub global_score: u8,
    pub seo_score: u8,
    pub page_count: usize,
    pub issue_count: usize,
    pub is_partial: bool,
}

impl ScoreNotification {
    pub fn title(&self) -> String {
        if self.is_partial {
            format!("Partial audit ready for {}", self.url)
        } else {
            format!("Audit complete for {}", self.url)
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Global score {}/100 (SEO {}/100) across {} pages with {} issues found.",
            self.global_score, self.seo_score, self.page_count, self.issue_count
        )
    }
}

/// Downstream collaborator failure.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("collaborator transport unavailable: {0}")]
    Transport(String),
    #[error("collaborator rejected the request: {0}")]
    Rejected(String),
}
