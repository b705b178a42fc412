//! Summarization relay.
//!
//! The relay is the only process holding the generative-provider credential.
//! It accepts a transcript, injects the fixed prompt template, forwards the
//! request to the provider and returns the summary. CORS is open to all
//! origins: the caller is an isolated extension context whose origin is not
//! a stable string.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::summary::GenerativeSummaryProvider;

/// Environment variable holding the provider credential. Read once at
/// startup; never part of the config file.
pub const SUMMARY_API_KEY_ENV: &str = "BRIEFLY_SUMMARY_API_KEY";

#[derive(Clone)]
pub struct RelayState {
    provider: Arc<GenerativeSummaryProvider>,
}

/// Request body for `POST /transcribe`. The route historically carried raw
/// audio and its clients still send the transcript under `audio`; the
/// canonical field is `transcript`.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(alias = "audio")]
    pub transcript: String,
}

pub struct RelayServer {
    port: u16,
    state: RelayState,
}

impl RelayServer {
    pub fn from_config(config: &RelayConfig, port_override: Option<u16>) -> Result<Self> {
        let api_key = std::env::var(SUMMARY_API_KEY_ENV).with_context(|| {
            format!("{SUMMARY_API_KEY_ENV} must be set to run the summarization relay")
        })?;

        let provider =
            GenerativeSummaryProvider::new(api_key, config.provider_endpoint.clone());

        Ok(Self {
            port: port_override.unwrap_or(config.port),
            state: RelayState {
                provider: Arc::new(provider),
            },
        })
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.state);

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!(
            "Summarization relay listening on http://127.0.0.1:{}",
            self.port
        );
        info!("  POST /transcribe - Summarize a transcript");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

pub fn router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(relay_info))
        .route("/transcribe", post(summarize_transcript))
        .layer(cors)
        .with_state(state)
}

async fn relay_info() -> Json<Value> {
    Json(json!({
        "service": "briefly-relay",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn summarize_transcript(
    State(state): State<RelayState>,
    Json(request): Json<SummarizeRequest>,
) -> ApiResult<Json<Value>> {
    let transcript = request.transcript.trim();
    if transcript.is_empty() {
        return Err(ApiError::bad_request("transcript is empty"));
    }

    info!("Relay received transcript ({} chars)", transcript.len());

    match state.provider.summarize_transcript(transcript).await {
        Ok(summary) => Ok(Json(json!({ "summary": summary }))),
        Err(e) => {
            error!("Relay forwarding failed: {:?}", e);
            Err(relay_error_response(e))
        }
    }
}

fn relay_error_response(err: RelayError) -> ApiError {
    match err {
        RelayError::MissingCredential => ApiError::internal(err.to_string()),
        // Upstream detail stays in the logs; the caller learns the stage
        // failed, not the provider's response body.
        RelayError::Network(_) | RelayError::Upstream { .. } | RelayError::MalformedResponse => {
            ApiError::bad_gateway(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_canonical_field() {
        let parsed: SummarizeRequest =
            serde_json::from_str(r#"{"transcript": "Alice proposed X."}"#).unwrap();
        assert_eq!(parsed.transcript, "Alice proposed X.");
    }

    #[test]
    fn request_accepts_legacy_audio_alias() {
        let parsed: SummarizeRequest =
            serde_json::from_str(r#"{"audio": "Alice proposed X."}"#).unwrap();
        assert_eq!(parsed.transcript, "Alice proposed X.");
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected_before_forwarding() {
        use axum::response::IntoResponse;

        // Provider pointed at an unroutable endpoint: reaching it would
        // produce a bad-gateway error, so a 400 proves no forwarding.
        let state = RelayState {
            provider: Arc::new(GenerativeSummaryProvider::new(
                "test-key".to_string(),
                Some("http://127.0.0.1:1/generate".to_string()),
            )),
        };

        let result = summarize_transcript(
            State(state),
            Json(SummarizeRequest {
                transcript: "   ".to_string(),
            }),
        )
        .await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
