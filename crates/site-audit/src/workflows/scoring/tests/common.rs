use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::scoring::breakdown::ScoreRecord;
use crate::workflows::scoring::dispatch::{
    spawn_side_effect_worker, SideEffectDispatcher, SideEffectWorker,
};
use crate::workflows::scoring::domain::{PageAnalysis, TaskId, TaskMetadata, TaskStatus};
use crate::workflows::scoring::engine::ScoringConfig;
use crate::workflows::scoring::repository::{
    AuditStatusUpdate, AuditStore, CollaboratorError, NotificationPublisher, OptimizationTrigger,
    RepositoryError, ScoreNotification,
};
use crate::workflows::scoring::service::ScoringService;

/// A page that trips none of the penalty rules.
pub(crate) fn clean_page(url: &str, depth: u32, page_type: &str) -> PageAnalysis {
    PageAnalysis {
        url: url.to_string(),
        depth,
        page_type: page_type.to_string(),
        title: Some("Handmade leather goods".to_string()),
        meta_description: Some("Wallets, belts and bags made to order.".to_string()),
        h1_count: 1,
        h1_text: Some("Leather goods".to_string()),
        word_count: 420,
        load_time: 1.2,
        status_code: 200,
        is_indexable: true,
        has_canonical: true,
        canonical_points_to_self: Some(true),
        has_thin_content: false,
        missing_alt_images_count: 0,
        internal_links_count: 10,
        has_viewport: true,
        ttfb: Some(0.3),
        redirect_chain_length: 0,
    }
}

/// Homepage from the reference example: 50 inbound links and no title.
pub(crate) fn untitled_home() -> PageAnalysis {
    let mut page = clean_page("https://example.com/", 0, "home");
    page.internal_links_count = 50;
    page.title = None;
    page
}

/// Depth-4 page with no inbound links; weight 0.2401 * 0.5.
pub(crate) fn deep_orphan(index: usize) -> PageAnalysis {
    let mut page = clean_page(&format!("https://example.com/a/b/c/{index}"), 4, "other");
    page.internal_links_count = 0;
    page
}

pub(crate) fn completed_task(total_urls: u32, pages_scanned: u32) -> TaskMetadata {
    TaskMetadata {
        status: TaskStatus::Completed,
        total_urls,
        pages_scanned,
        audit_id: "audit-1".to_string(),
        user_id: "user-1".to_string(),
        url: "https://example.com".to_string(),
    }
}

pub(crate) fn sample_notification(task_id: &str) -> ScoreNotification {
    ScoreNotification {
        user_id: "user-1".to_string(),
        task_id: TaskId::from(task_id),
        url: "https://example.com".to_string(),
        global_score: 91,
        seo_score: 75,
        page_count: 1,
        issue_count: 1,
        is_partial: false,
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    pub(crate) pages: Mutex<HashMap<TaskId, Vec<PageAnalysis>>>,
    pub(crate) tasks: Mutex<HashMap<TaskId, TaskMetadata>>,
    pub(crate) records: Mutex<HashMap<TaskId, ScoreRecord>>,
    pub(crate) audit_updates: Mutex<Vec<(String, AuditStatusUpdate)>>,
    pub(crate) upserts: AtomicUsize,
}

impl MemoryStore {
    pub(crate) fn with_task(task_id: &str, pages: Vec<PageAnalysis>, task: TaskMetadata) -> Self {
        let store = Self::default();
        store.insert(task_id, pages, task);
        store
    }

    pub(crate) fn insert(&self, task_id: &str, pages: Vec<PageAnalysis>, task: TaskMetadata) {
        let task_id = TaskId::from(task_id);
        self.pages
            .lock()
            .expect("store mutex poisoned")
            .insert(task_id.clone(), pages);
        self.tasks
            .lock()
            .expect("store mutex poisoned")
            .insert(task_id, task);
    }

    pub(crate) fn record(&self, task_id: &str) -> Option<ScoreRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(&TaskId::from(task_id))
            .cloned()
    }

    pub(crate) fn record_count(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    pub(crate) fn audit_updates(&self) -> Vec<(String, AuditStatusUpdate)> {
        self.audit_updates
            .lock()
            .expect("store mutex poisoned")
            .clone()
    }
}

impl AuditStore for MemoryStore {
    fn fetch_pages(&self, task_id: &TaskId) -> Result<Vec<PageAnalysis>, RepositoryError> {
        let guard = self.pages.lock().expect("store mutex poisoned");
        Ok(guard.get(task_id).cloned().unwrap_or_default())
    }

    fn fetch_task(&self, task_id: &TaskId) -> Result<Option<TaskMetadata>, RepositoryError> {
        let guard = self.tasks.lock().expect("store mutex poisoned");
        Ok(guard.get(task_id).cloned())
    }

    fn upsert_breakdown(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        self.upserts.fetch_add(1, Ordering::Relaxed);
        self.records
            .lock()
            .expect("store mutex poisoned")
            .insert(record.task_id.clone(), record);
        Ok(())
    }

    fn update_audit_status(
        &self,
        audit_id: &str,
        update: AuditStatusUpdate,
    ) -> Result<(), RepositoryError> {
        self.audit_updates
            .lock()
            .expect("store mutex poisoned")
            .push((audit_id.to_string(), update));
        Ok(())
    }
}

/// Store whose reads succeed but whose writes are refused.
pub(crate) struct ReadOnlyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) reject_breakdown: bool,
}

impl AuditStore for ReadOnlyStore {
    fn fetch_pages(&self, task_id: &TaskId) -> Result<Vec<PageAnalysis>, RepositoryError> {
        self.inner.fetch_pages(task_id)
    }

    fn fetch_task(&self, task_id: &TaskId) -> Result<Option<TaskMetadata>, RepositoryError> {
        self.inner.fetch_task(task_id)
    }

    fn upsert_breakdown(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        if self.reject_breakdown {
            return Err(RepositoryError::Rejected("permission denied".to_string()));
        }
        self.inner.upsert_breakdown(record)
    }

    fn update_audit_status(
        &self,
        _audit_id: &str,
        _update: AuditStatusUpdate,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Rejected("audits table is read only".to_string()))
    }
}

pub(crate) struct UnavailableStore;

impl AuditStore for UnavailableStore {
    fn fetch_pages(&self, _task_id: &TaskId) -> Result<Vec<PageAnalysis>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_task(&self, _task_id: &TaskId) -> Result<Option<TaskMetadata>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_breakdown(&self, _record: ScoreRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_audit_status(
        &self,
        _audit_id: &str,
        _update: AuditStatusUpdate,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(crate) struct RecordingCollaborators {
    recalculations: Mutex<Vec<TaskId>>,
    notifications: Mutex<Vec<ScoreNotification>>,
}

impl RecordingCollaborators {
    pub(crate) fn recalculations(&self) -> Vec<TaskId> {
        self.recalculations
            .lock()
            .expect("collaborator mutex poisoned")
            .clone()
    }

    pub(crate) fn notifications(&self) -> Vec<ScoreNotification> {
        self.notifications
            .lock()
            .expect("collaborator mutex poisoned")
            .clone()
    }
}

impl OptimizationTrigger for RecordingCollaborators {
    fn recalculate(&self, task_id: &TaskId) -> Result<(), CollaboratorError> {
        self.recalculations
            .lock()
            .expect("collaborator mutex poisoned")
            .push(task_id.clone());
        Ok(())
    }
}

impl NotificationPublisher for RecordingCollaborators {
    fn publish(&self, notification: ScoreNotification) -> Result<(), CollaboratorError> {
        self.notifications
            .lock()
            .expect("collaborator mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FailingCollaborators {
    attempts: AtomicUsize,
}

impl FailingCollaborators {
    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

impl OptimizationTrigger for FailingCollaborators {
    fn recalculate(&self, _task_id: &TaskId) -> Result<(), CollaboratorError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(CollaboratorError::Transport("optimizer timed out".to_string()))
    }
}

impl NotificationPublisher for FailingCollaborators {
    fn publish(&self, _notification: ScoreNotification) -> Result<(), CollaboratorError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(CollaboratorError::Rejected("unknown user".to_string()))
    }
}

/// Must be called from inside a tokio runtime.
pub(crate) fn build_service<S>(
    store: Arc<S>,
    collaborators: Arc<RecordingCollaborators>,
) -> (ScoringService<S>, SideEffectWorker)
where
    S: AuditStore + 'static,
{
    let (dispatcher, worker) =
        spawn_side_effect_worker(collaborators.clone(), collaborators, 16);
    (
        ScoringService::new(store, dispatcher, ScoringConfig::default()),
        worker,
    )
}

pub(crate) fn service_with_dispatcher<S>(
    store: Arc<S>,
    dispatcher: SideEffectDispatcher,
) -> ScoringService<S>
where
    S: AuditStore + 'static,
{
    ScoringService::new(store, dispatcher, ScoringConfig::default())
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
