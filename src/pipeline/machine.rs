//! Pipeline orchestrator: capture → transcribe → summarize.
//!
//! One session at a time. `start` is only honored from a terminal state;
//! `stop` hands the finalized blob to a spawned processing task and the
//! state machine tracks its progress. Failures surface as a stage-tagged
//! `Failed` state; full diagnostics go to the logs.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::state::{PipelineEvent, PipelineState, PipelineStatusHandle, TransitionRejected};
use crate::capture::{CaptureController, FinishedRecording};
use crate::error::PipelineError;
use crate::summary::SummaryService;
use crate::transcription::TranscriptionProvider;

pub struct PipelineMachine {
    controller: Mutex<CaptureController>,
    transcriber: Arc<dyn TranscriptionProvider>,
    summarizer: Arc<dyn SummaryService>,
    status: PipelineStatusHandle,
}

impl PipelineMachine {
    pub fn new(
        controller: CaptureController,
        transcriber: Arc<dyn TranscriptionProvider>,
        summarizer: Arc<dyn SummaryService>,
        status: PipelineStatusHandle,
    ) -> Self {
        Self {
            controller: Mutex::new(controller),
            transcriber,
            summarizer,
            status,
        }
    }

    pub fn status(&self) -> &PipelineStatusHandle {
        &self.status
    }

    /// Begin a new recording session.
    ///
    /// Valid from `Idle`, `Ready` and `Failed`; rejected while recording or
    /// while a pipeline is in flight. A device failure returns the error and
    /// leaves the previous state in place.
    pub async fn start(&self) -> Result<(), PipelineError> {
        let mut controller = self.controller.lock().await;

        // Check the transition before touching the device, so a busy
        // pipeline never opens the microphone.
        let current = self.status.get().await;
        peek(&current, PipelineEvent::Start)?;

        controller.start()?;

        match self.status.apply(PipelineEvent::Start).await {
            Ok(_) => {
                info!("Pipeline recording");
                Ok(())
            }
            Err(rejected) => {
                // State moved between check and commit; give the device back.
                let _ = controller.stop();
                Err(rejected.into())
            }
        }
    }

    /// Stop the active recording and kick off transcription + summarization.
    ///
    /// A no-op returning the current state when nothing is recording.
    pub async fn stop(&self) -> Result<PipelineState, PipelineError> {
        let mut controller = self.controller.lock().await;

        let current = self.status.get().await;
        if !matches!(&current, PipelineState::Recording) {
            return Ok(current);
        }

        let finished = match controller.stop() {
            Ok(Some(finished)) => finished,
            Ok(None) => {
                warn!("State said recording but no capture session was active");
                let state = self
                    .status
                    .apply(PipelineEvent::CaptureFailed(
                        "no active capture session".to_string(),
                    ))
                    .await?;
                return Ok(state);
            }
            Err(e) => {
                error!("Failed to finalize recording: {:?}", e);
                let state = self
                    .status
                    .apply(PipelineEvent::CaptureFailed(e.to_string()))
                    .await?;
                return Ok(state);
            }
        };
        drop(controller);

        let state = self.status.apply(PipelineEvent::Stop).await?;
        info!(
            "Recording stopped, processing session {} ({} bytes)",
            finished.session_id,
            finished.blob.len()
        );

        let transcriber = Arc::clone(&self.transcriber);
        let summarizer = Arc::clone(&self.summarizer);
        let status = self.status.clone();
        tokio::spawn(async move {
            run_processing(finished, transcriber, summarizer, status).await;
        });

        Ok(state)
    }
}

/// Transcribe then summarize, advancing the shared state at each step.
async fn run_processing(
    recording: FinishedRecording,
    transcriber: Arc<dyn TranscriptionProvider>,
    summarizer: Arc<dyn SummaryService>,
    status: PipelineStatusHandle,
) {
    let session = recording.session_id;

    let transcript = match transcriber.transcribe(&recording).await {
        Ok(transcript) => transcript,
        Err(e) => {
            error!("Transcription failed for session {}: {:?}", session, e);
            apply_or_warn(&status, PipelineEvent::TranscriptFailed(e.to_string())).await;
            return;
        }
    };

    apply_or_warn(&status, PipelineEvent::TranscriptReady).await;

    match summarizer.summarize(&transcript).await {
        Ok(summary) => {
            info!("Pipeline ready for session {}", session);
            apply_or_warn(&status, PipelineEvent::SummaryReady(summary)).await;
        }
        Err(e) => {
            error!("Summarization failed for session {}: {:?}", session, e);
            apply_or_warn(&status, PipelineEvent::SummaryFailed(e.to_string())).await;
        }
    }
}

async fn apply_or_warn(status: &PipelineStatusHandle, event: PipelineEvent) {
    if let Err(rejected) = status.apply(event).await {
        warn!("Unexpected pipeline transition rejection: {}", rejected);
    }
}

fn peek(state: &PipelineState, event: PipelineEvent) -> Result<(), TransitionRejected> {
    super::state::transition(state, event).map(|_| ())
}
