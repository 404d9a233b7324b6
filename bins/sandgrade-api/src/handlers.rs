// HTTP route handlers for the Sandgrade API

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use sandgrade_common::types::{ExecutionRequest, GradeReport};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::metrics;
use crate::AppState;

/// Submissions above this size are rejected before any process is spawned
pub const MAX_SOURCE_CODE_BYTES: usize = 1024 * 1024;

/// POST /grade - Grade a submission and return the verdict with public feedback
pub async fn grade(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecutionRequest>,
) -> Response {
    let request_id = Uuid::new_v4();

    if request.source_code.len() > MAX_SOURCE_CODE_BYTES {
        warn!(
            request_id = %request_id,
            source_size = request.source_code.len(),
            "Rejected oversized submission"
        );
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(serde_json::json!({
                "error": format!("Source code exceeds maximum size of {} bytes", MAX_SOURCE_CODE_BYTES)
            })),
        )
            .into_response();
    }

    let permit = match state.permits.acquire().await {
        Ok(permit) => permit,
        Err(_) => {
            error!(request_id = %request_id, "Grading permits closed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": "Grader is shutting down" })),
            )
                .into_response();
        }
    };

    let timer = metrics::GRADING_DURATION.start_timer();
    let (kind, verdict) = state
        .grader
        .grade_with_kind(&request)
        .instrument(info_span!("grade", request_id = %request_id))
        .await;
    timer.observe_duration();
    drop(permit);

    metrics::GRADINGS_TOTAL.with_label_values(&[kind.label()]).inc();

    info!(
        request_id = %request_id,
        outcome = kind.label(),
        passed = verdict.passed,
        "Submission graded"
    );

    (StatusCode::OK, Json(GradeReport::new(&request.suite, verdict))).into_response()
}

/// GET /status - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus scrape endpoint
pub async fn metrics_export() -> Response {
    match metrics::render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render metrics").into_response()
        }
    }
}
