use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, info_span, warn};

use super::breakdown::{ScoreBreakdown, ScoreRecord};
use super::dispatch::{SideEffect, SideEffectDispatcher};
use super::domain::{PageAnalysis, TaskId, TaskMetadata};
use super::engine::{EmptyCrawl, ScoringConfig, ScoringEngine};
use super::report::CrawlProgress;
use super::repository::{
    AuditStatus, AuditStatusUpdate, AuditStore, RepositoryError, ScoreNotification,
};

/// Service composing the store, the scoring engine, and the follow-up queue.
pub struct ScoringService<S> {
    store: Arc<S>,
    engine: ScoringEngine,
    side_effects: SideEffectDispatcher,
}

impl<S> ScoringService<S>
where
    S: AuditStore + 'static,
{
    pub fn new(store: Arc<S>, side_effects: SideEffectDispatcher, config: ScoringConfig) -> Self {
        Self {
            store,
            engine: ScoringEngine::new(config),
            side_effects,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score every page analysis of a task, persist the breakdown, and queue follow-ups.
    ///
    /// Only reading inputs and writing the breakdown can fail the run; the
    /// audit status update and the queued follow-ups are logged on failure.
    pub fn score_task(&self, task_id: &TaskId) -> Result<ScoreBreakdown, ScoringError> {
        let span = info_span!("score_task", %task_id);
        let _entered = span.enter();

        let pages = self
            .store
            .fetch_pages(task_id)
            .map_err(|source| ScoringError::Read {
                task_id: task_id.clone(),
                what: "page analyses",
                source,
            })?;
        if pages.is_empty() {
            return Err(ScoringError::NoPages(task_id.clone()));
        }

        let task = self
            .store
            .fetch_task(task_id)
            .map_err(|source| ScoringError::Read {
                task_id: task_id.clone(),
                what: "task metadata",
                source,
            })?
            .ok_or_else(|| ScoringError::TaskNotFound(task_id.clone()))?;

        let breakdown = self
            .calculate(&pages, &task)
            .map_err(|EmptyCrawl| ScoringError::NoPages(task_id.clone()))?;
        let calculated_at = Utc::now();

        self.store
            .upsert_breakdown(ScoreRecord {
                task_id: task_id.clone(),
                breakdown: breakdown.clone(),
                calculated_at,
            })
            .map_err(|source| ScoringError::Write {
                task_id: task_id.clone(),
                source,
            })?;

        info!(
            global_score = breakdown.global_score,
            seo_score = breakdown.seo_score,
            technical_score = breakdown.technical_score,
            content_score = breakdown.content_score,
            performance_score = breakdown.performance_score,
            page_count = breakdown.page_count,
            is_partial = breakdown.is_partial,
            "score breakdown saved"
        );

        self.update_audit_status(&task, &breakdown, calculated_at);
        self.queue_follow_ups(task_id, &task, &breakdown);

        Ok(breakdown)
    }

    /// Pure scoring step, exposed for offline use.
    pub fn calculate(
        &self,
        pages: &[PageAnalysis],
        task: &TaskMetadata,
    ) -> Result<ScoreBreakdown, EmptyCrawl> {
        self.engine.score(pages, &CrawlProgress::from(task))
    }

    /// Reports the number of pages actually scored as `pages_scanned`, which may
    /// differ from the crawler's own `pages_scanned` in the task metadata.
    fn update_audit_status(
        &self,
        task: &TaskMetadata,
        breakdown: &ScoreBreakdown,
        calculated_at: DateTime<Utc>,
    ) {
        let status = if breakdown.is_partial {
            AuditStatus::Partial
        } else {
            AuditStatus::Completed
        };
        let update = AuditStatusUpdate {
            status,
            pages_scanned: breakdown.page_count,
            seo_score: breakdown.seo_score,
            completed_at: calculated_at,
        };

        if let Err(err) = self.store.update_audit_status(&task.audit_id, update) {
            warn!(audit_id = %task.audit_id, error = %err, "failed to update audit status");
        }
    }

    fn queue_follow_ups(&self, task_id: &TaskId, task: &TaskMetadata, breakdown: &ScoreBreakdown) {
        let notification = ScoreNotification {
            user_id: task.user_id.clone(),
            task_id: task_id.clone(),
            url: task.url.clone(),
            global_score: breakdown.global_score,
            seo_score: breakdown.seo_score,
            page_count: breakdown.page_count,
            issue_count: breakdown.issue_count(),
            is_partial: breakdown.is_partial,
        };

        for effect in [
            SideEffect::RecalculateOptimizations(task_id.clone()),
            SideEffect::Notify(notification),
        ] {
            if let Err(err) = self.side_effects.dispatch(effect) {
                warn!(error = %err, "follow-up not queued");
            }
        }
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("no page analyses found for task {0}")]
    NoPages(TaskId),
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("failed to read {what} for task {task_id}")]
    Read {
        task_id: TaskId,
        what: &'static str,
        #[source]
        source: RepositoryError,
    },
    #[error("failed to save score breakdown for task {task_id}")]
    Write {
        task_id: TaskId,
        #[source]
        source: RepositoryError,
    },
}

impl ScoringError {
    /// Lower-level store message, when the failure came from the store.
    pub fn details(&self) -> Option<String> {
        match self {
            ScoringError::Read { source, .. } | ScoringError::Write { source, .. } => {
                Some(source.to_string())
            }
            ScoringError::NoPages(_) | ScoringError::TaskNotFound(_) => None,
        }
    }
}
