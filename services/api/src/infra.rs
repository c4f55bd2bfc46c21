use metrics_exporter_prometheus::PrometheusHandle;
use site_audit::workflows::scoring::{
    AuditStatusUpdate, AuditStore, CollaboratorError, NotificationPublisher, OptimizationTrigger,
    PageAnalysis, RepositoryError, ScoreNotification, ScoreRecord, TaskId, TaskMetadata,
    TaskStatus,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the audit database.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditStore {
    pages: Arc<Mutex<HashMap<TaskId, Vec<PageAnalysis>>>>,
    tasks: Arc<Mutex<HashMap<TaskId, TaskMetadata>>>,
    records: Arc<Mutex<HashMap<TaskId, ScoreRecord>>>,
    audits: Arc<Mutex<HashMap<String, AuditStatusUpdate>>>,
}

impl InMemoryAuditStore {
    /// Stores a finished crawl so it can be scored through the HTTP endpoint.
    pub(crate) fn load_crawl(&self, task_id: TaskId, pages: Vec<PageAnalysis>) {
        let scanned = u32::try_from(pages.len()).unwrap_or(u32::MAX);
        let task = TaskMetadata {
            status: TaskStatus::Completed,
            total_urls: scanned,
            pages_scanned: scanned,
            audit_id: format!("audit-{task_id}"),
            user_id: "local".to_string(),
            url: pages.first().map(|page| page.url.clone()).unwrap_or_default(),
        };

        self.pages
            .lock()
            .expect("store mutex poisoned")
            .insert(task_id.clone(), pages);
        self.tasks
            .lock()
            .expect("store mutex poisoned")
            .insert(task_id, task);
    }

    #[cfg(test)]
    pub(crate) fn record(&self, task_id: &TaskId) -> Option<ScoreRecord> {
        let guard = self.records.lock().expect("store mutex poisoned");
        guard.get(task_id).cloned()
    }

    fn knows_audit(&self, audit_id: &str) -> bool {
        let guard = self.tasks.lock().expect("store mutex poisoned");
        guard.values().any(|task| task.audit_id == audit_id)
    }

    #[cfg(test)]
    pub(crate) fn audit(&self, audit_id: &str) -> Option<AuditStatusUpdate> {
        let guard = self.audits.lock().expect("store mutex poisoned");
        guard.get(audit_id).cloned()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn fetch_pages(&self, task_id: &TaskId) -> Result<Vec<PageAnalysis>, RepositoryError> {
        let guard = self.pages.lock().expect("store mutex poisoned");
        Ok(guard.get(task_id).cloned().unwrap_or_default())
    }

    fn fetch_task(&self, task_id: &TaskId) -> Result<Option<TaskMetadata>, RepositoryError> {
        let guard = self.tasks.lock().expect("store mutex poisoned");
        Ok(guard.get(task_id).cloned())
    }

    fn upsert_breakdown(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.insert(record.task_id.clone(), record);
        Ok(())
    }

    fn update_audit_status(
        &self,
        audit_id: &str,
        update: AuditStatusUpdate,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.audits.lock().expect("store mutex poisoned");
        if !guard.contains_key(audit_id) && !self.knows_audit(audit_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(audit_id.to_string(), update);
        Ok(())
    }
}

/// Optimization recalculation is owned by another service; here it is only logged.
#[derive(Default, Clone)]
pub(crate) struct LoggingOptimizationTrigger;

impl OptimizationTrigger for LoggingOptimizationTrigger {
    fn recalculate(&self, task_id: &TaskId) -> Result<(), CollaboratorError> {
        info!(%task_id, "optimization recalculation requested");
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<ScoreNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: ScoreNotification) -> Result<(), CollaboratorError> {
        info!(
            user_id = %notification.user_id,
            task_id = %notification.task_id,
            title = %notification.title(),
            "score notification queued"
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<ScoreNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}
