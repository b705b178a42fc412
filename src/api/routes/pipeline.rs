//! Pipeline control endpoints.
//!
//! - `POST /start` — begin a recording session
//! - `POST /stop`  — finalize and process the active recording
//! - `GET  /status` — current pipeline phase, summary or failure

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::error::PipelineError;
use crate::pipeline::{PipelineMachine, PipelineState};

#[derive(Clone)]
pub struct ControlState {
    pub machine: Arc<PipelineMachine>,
}

pub fn router(state: ControlState) -> Router {
    Router::new()
        .route("/start", post(start_pipeline))
        .route("/stop", post(stop_pipeline))
        .route("/status", get(pipeline_status))
        .with_state(state)
}

/// Starting while recording or while a pipeline is in flight is rejected
/// with 409; the in-flight work is never silently abandoned.
async fn start_pipeline(State(state): State<ControlState>) -> ApiResult<Json<Value>> {
    info!("Start command received via API");

    match state.machine.start().await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "phase": "recording",
        }))),
        Err(PipelineError::Rejected(rejected)) => Err(ApiError::conflict(rejected.to_string())),
        Err(PipelineError::Capture(e)) => Err(ApiError::internal(e.to_string())),
    }
}

async fn stop_pipeline(State(state): State<ControlState>) -> ApiResult<Json<Value>> {
    info!("Stop command received via API");

    match state.machine.stop().await {
        Ok(new_state) => Ok(Json(json!({
            "success": true,
            "phase": new_state.phase_str(),
        }))),
        Err(PipelineError::Rejected(rejected)) => Err(ApiError::conflict(rejected.to_string())),
        Err(PipelineError::Capture(e)) => Err(ApiError::internal(e.to_string())),
    }
}

async fn pipeline_status(State(state): State<ControlState>) -> Json<Value> {
    Json(render_status(&state.machine.status().get().await))
}

fn render_status(state: &PipelineState) -> Value {
    let mut body = json!({
        "phase": state.phase_str(),
        "recording": matches!(state, PipelineState::Recording),
    });

    match state {
        PipelineState::Ready(summary) => {
            body["summary"] = json!(summary.text);
            body["session_id"] = json!(summary.source_session.to_string());
        }
        PipelineState::Failed { stage, message } => {
            body["error"] = json!({
                "stage": stage.as_str(),
                "message": message,
            });
        }
        _ => {}
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FailureStage;
    use crate::summary::SummaryResult;
    use uuid::Uuid;

    #[test]
    fn ready_status_carries_summary() {
        let state = PipelineState::Ready(SummaryResult {
            text: "Summary: short.".to_string(),
            source_session: Uuid::new_v4(),
        });

        let body = render_status(&state);
        assert_eq!(body["phase"], "ready");
        assert_eq!(body["summary"], "Summary: short.");
    }

    #[test]
    fn failed_status_names_the_stage() {
        let state = PipelineState::Failed {
            stage: FailureStage::Summarization,
            message: "summarization relay returned status 500".to_string(),
        };

        let body = render_status(&state);
        assert_eq!(body["phase"], "failed");
        assert_eq!(body["error"]["stage"], "summarization");
    }

    #[test]
    fn idle_status_is_bare() {
        let body = render_status(&PipelineState::Idle);
        assert_eq!(body["phase"], "idle");
        assert_eq!(body["recording"], false);
        assert!(body.get("summary").is_none());
        assert!(body.get("error").is_none());
    }
}
