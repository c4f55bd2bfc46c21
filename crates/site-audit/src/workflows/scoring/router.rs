use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::breakdown::ScoreBreakdown;
use super::domain::TaskId;
use super::repository::AuditStore;
use super::service::ScoringService;

/// The only accepted request shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculateScoresRequest {
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateScoresResponse {
    pub success: bool,
    pub task_id: TaskId,
    pub scores: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Router builder exposing the score calculation endpoint.
pub fn scoring_router<S>(service: Arc<ScoringService<S>>) -> Router
where
    S: AuditStore + 'static,
{
    Router::new()
        .route("/api/v1/scoring/calculate", post(calculate_handler::<S>))
        .with_state(service)
}

pub(crate) async fn calculate_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    payload: Result<Json<CalculateScoresRequest>, JsonRejection>,
) -> Response
where
    S: AuditStore + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(
                status = %rejection.status(),
                reason = %rejection.body_text(),
                "calculate request rejected"
            );
            let payload = ScoringFailure {
                error: "invalid request body".to_string(),
                details: Some(rejection.body_text()),
            };
            return (rejection.status(), Json(payload)).into_response();
        }
    };

    let task_id = request.task_id.trim();
    if task_id.is_empty() {
        let payload = ScoringFailure {
            error: "task_id is required".to_string(),
            details: None,
        };
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let task_id = TaskId::from(task_id);
    match service.score_task(&task_id) {
        Ok(scores) => {
            let payload = CalculateScoresResponse {
                success: true,
                task_id,
                scores,
            };
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            let details = err.details();
            error!(%task_id, error = %err, details = details.as_deref(), "score calculation failed");
            let payload = ScoringFailure {
                error: err.to_string(),
                details,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
