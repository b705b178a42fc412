//! Service wiring: build the capture stack and serve the control API.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::ApiServer;
use crate::capture::{CaptureController, MicChunkSource};
use crate::config::Config;
use crate::pipeline::{PipelineMachine, PipelineStatusHandle};
use crate::summary::RelaySummaryClient;
use crate::transcription::WhisperApiProvider;

const TRANSCRIPTION_API_KEY_ENV: &str = "BRIEFLY_TRANSCRIPTION_API_KEY";

pub async fn run_service() -> Result<()> {
    info!("Starting briefly service");

    let config = Config::load()?;

    let api_key = config
        .transcription
        .api_key
        .clone()
        .or_else(|| std::env::var(TRANSCRIPTION_API_KEY_ENV).ok())
        .with_context(|| {
            format!(
                "transcription api_key missing: set it in the config file or via {}",
                TRANSCRIPTION_API_KEY_ENV
            )
        })?;

    let source = MicChunkSource::new(config.capture.sample_rate);
    let controller = CaptureController::new(Box::new(source));

    let transcriber = Arc::new(WhisperApiProvider::new(
        api_key,
        config.transcription.endpoint.clone(),
        config.transcription.model.clone(),
    ));
    let summarizer = Arc::new(RelaySummaryClient::new(config.summary.relay_url.clone()));

    let machine = Arc::new(PipelineMachine::new(
        controller,
        transcriber,
        summarizer,
        PipelineStatusHandle::default(),
    ));

    info!("Briefly is ready!");
    info!(
        "Start a recording: curl -X POST http://127.0.0.1:{}/start",
        config.api.port
    );
    info!(
        "Stop and summarize: curl -X POST http://127.0.0.1:{}/stop",
        config.api.port
    );

    ApiServer::new(machine, config.api.port).start().await
}
