//! Background worker for best-effort follow-ups after a breakdown is saved.
//!
//! Jobs are queued on a bounded channel and executed one at a time on the
//! blocking pool. Failures are logged here and never reach the scoring caller.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::domain::TaskId;
use super::repository::{
    CollaboratorError, NotificationPublisher, OptimizationTrigger, ScoreNotification,
};

/// Follow-up job queued after a scoring run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    RecalculateOptimizations(TaskId),
    Notify(ScoreNotification),
}

impl SideEffect {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RecalculateOptimizations(_) => "optimization_recalculation",
            Self::Notify(_) => "score_notification",
        }
    }

    pub fn task_id(&self) -> &TaskId {
        match self {
            Self::RecalculateOptimizations(task_id) => task_id,
            Self::Notify(notification) => &notification.task_id,
        }
    }

    fn apply(
        self,
        optimizer: &dyn OptimizationTrigger,
        notifier: &dyn NotificationPublisher,
    ) -> Result<(), CollaboratorError> {
        match self {
            Self::RecalculateOptimizations(task_id) => optimizer.recalculate(&task_id),
            Self::Notify(notification) => notifier.publish(notification),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("side effect queue is full; dropped {0}")]
    QueueFull(&'static str),
    #[error("side effect worker has stopped; dropped {0}")]
    WorkerStopped(&'static str),
}

/// Cloneable handle used to queue side effects without waiting on them.
#[derive(Debug, Clone)]
pub struct SideEffectDispatcher {
    sender: mpsc::Sender<SideEffect>,
}

impl SideEffectDispatcher {
    pub fn dispatch(&self, effect: SideEffect) -> Result<(), DispatchError> {
        self.sender.try_send(effect).map_err(|err| match err {
            TrySendError::Full(effect) => DispatchError::QueueFull(effect.label()),
            TrySendError::Closed(effect) => DispatchError::WorkerStopped(effect.label()),
        })
    }
}

/// Owner of the running worker task.
#[derive(Debug)]
pub struct SideEffectWorker {
    handle: JoinHandle<()>,
}

impl SideEffectWorker {
    /// Resolves once every dispatcher has been dropped and the queue is drained.
    pub async fn shutdown(self) {
        if let Err(err) = self.handle.await {
            warn!(error = %err, "side effect worker terminated abnormally");
        }
    }

    #[cfg(test)]
    pub(crate) async fn abort_for_tests(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

/// Starts the worker on the current tokio runtime.
pub fn spawn_side_effect_worker<O, N>(
    optimizer: Arc<O>,
    notifier: Arc<N>,
    capacity: usize,
) -> (SideEffectDispatcher, SideEffectWorker)
where
    O: OptimizationTrigger + 'static,
    N: NotificationPublisher + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(run_worker(receiver, optimizer, notifier));

    (SideEffectDispatcher { sender }, SideEffectWorker { handle })
}

async fn run_worker<O, N>(
    mut receiver: mpsc::Receiver<SideEffect>,
    optimizer: Arc<O>,
    notifier: Arc<N>,
) where
    O: OptimizationTrigger + 'static,
    N: NotificationPublisher + 'static,
{
    while let Some(effect) = receiver.recv().await {
        let label = effect.label();
        let task_id = effect.task_id().clone();
        let optimizer = Arc::clone(&optimizer);
        let notifier = Arc::clone(&notifier);

        let outcome =
            tokio::task::spawn_blocking(move || effect.apply(optimizer.as_ref(), notifier.as_ref()))
                .await;

        match outcome {
            Ok(Ok(())) => debug!(%task_id, effect = label, "side effect delivered"),
            Ok(Err(err)) => warn!(%task_id, effect = label, error = %err, "side effect failed"),
            Err(err) => warn!(%task_id, effect = label, error = %err, "side effect panicked"),
        }
    }

    debug!("side effect queue closed");
}
