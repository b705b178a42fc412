//! Pipeline states, events and the pure transition function.
//!
//! All state mutation goes through [`transition`]; the shared handle just
//! applies it under a lock. Rejected transitions are errors, not silent
//! no-ops, so a `start()` during an in-flight pipeline surfaces to the
//! caller instead of abandoning the in-flight call.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::summary::SummaryResult;

/// Stage a failure is attributed to. User-visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Capture,
    Transcription,
    Summarization,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Transcription => "transcription",
            Self::Summarization => "summarization",
        }
    }
}

#[derive(Debug, Clone)]
pub enum PipelineState {
    Idle,
    Recording,
    Transcribing,
    Summarizing,
    Ready(SummaryResult),
    Failed {
        stage: FailureStage,
        message: String,
    },
}

impl PipelineState {
    pub fn phase_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Transcribing => "transcribing",
            Self::Summarizing => "summarizing",
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug)]
pub enum PipelineEvent {
    Start,
    Stop,
    CaptureFailed(String),
    TranscriptReady,
    TranscriptFailed(String),
    SummaryReady(SummaryResult),
    SummaryFailed(String),
}

impl PipelineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::CaptureFailed(_) => "capture failure",
            Self::TranscriptReady => "transcript",
            Self::TranscriptFailed(_) => "transcription failure",
            Self::SummaryReady(_) => "summary",
            Self::SummaryFailed(_) => "summarization failure",
        }
    }
}

/// A transition the table does not allow.
#[derive(Debug, Clone, Error)]
#[error("cannot {event} while {phase}")]
pub struct TransitionRejected {
    pub phase: &'static str,
    pub event: &'static str,
}

/// The transition table. Pure: no side effects, no hidden state.
pub fn transition(
    state: &PipelineState,
    event: PipelineEvent,
) -> Result<PipelineState, TransitionRejected> {
    use PipelineEvent as E;
    use PipelineState as S;

    let next = match (state, event) {
        // Starting anew from a terminal state discards the previous
        // summary or error; errors are not sticky.
        (S::Idle | S::Ready(_) | S::Failed { .. }, E::Start) => S::Recording,

        (S::Recording, E::Stop) => S::Transcribing,
        (S::Recording, E::CaptureFailed(message)) => S::Failed {
            stage: FailureStage::Capture,
            message,
        },

        (S::Transcribing, E::TranscriptReady) => S::Summarizing,
        (S::Transcribing, E::TranscriptFailed(message)) => S::Failed {
            stage: FailureStage::Transcription,
            message,
        },

        (S::Summarizing, E::SummaryReady(summary)) => S::Ready(summary),
        (S::Summarizing, E::SummaryFailed(message)) => S::Failed {
            stage: FailureStage::Summarization,
            message,
        },

        (state, event) => {
            return Err(TransitionRejected {
                phase: state.phase_str(),
                event: event.name(),
            })
        }
    };

    Ok(next)
}

/// Shared pipeline state, readable by API handlers and advanced only via
/// [`transition`].
#[derive(Clone)]
pub struct PipelineStatusHandle {
    inner: Arc<Mutex<PipelineState>>,
}

impl Default for PipelineStatusHandle {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineState::Idle)),
        }
    }
}

impl PipelineStatusHandle {
    pub async fn get(&self) -> PipelineState {
        self.inner.lock().await.clone()
    }

    /// Apply one event atomically. On success the committed state is
    /// returned; on rejection the state is untouched.
    pub async fn apply(&self, event: PipelineEvent) -> Result<PipelineState, TransitionRejected> {
        let mut state = self.inner.lock().await;
        let next = transition(&state, event)?;
        debug!("Pipeline {} -> {}", state.phase_str(), next.phase_str());
        *state = next.clone();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn summary(text: &str) -> SummaryResult {
        SummaryResult {
            text: text.to_string(),
            source_session: Uuid::new_v4(),
        }
    }

    #[test]
    fn happy_path_reaches_ready() {
        let state = PipelineState::Idle;
        let state = transition(&state, PipelineEvent::Start).unwrap();
        assert!(matches!(state, PipelineState::Recording));

        let state = transition(&state, PipelineEvent::Stop).unwrap();
        assert!(matches!(state, PipelineState::Transcribing));

        let state = transition(&state, PipelineEvent::TranscriptReady).unwrap();
        assert!(matches!(state, PipelineState::Summarizing));

        let state =
            transition(&state, PipelineEvent::SummaryReady(summary("Summary: done"))).unwrap();
        match state {
            PipelineState::Ready(s) => assert_eq!(s.text, "Summary: done"),
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn start_is_rejected_while_busy() {
        for state in [
            PipelineState::Recording,
            PipelineState::Transcribing,
            PipelineState::Summarizing,
        ] {
            let err = transition(&state, PipelineEvent::Start).unwrap_err();
            assert_eq!(err.event, "start");
        }
    }

    #[test]
    fn start_from_ready_discards_summary() {
        let state = PipelineState::Ready(summary("old"));
        let state = transition(&state, PipelineEvent::Start).unwrap();
        assert!(matches!(state, PipelineState::Recording));
    }

    #[test]
    fn start_from_failed_clears_error() {
        let state = PipelineState::Failed {
            stage: FailureStage::Transcription,
            message: "boom".to_string(),
        };
        let state = transition(&state, PipelineEvent::Start).unwrap();
        assert!(matches!(state, PipelineState::Recording));
    }

    #[test]
    fn failures_carry_their_stage() {
        let state = transition(
            &PipelineState::Transcribing,
            PipelineEvent::TranscriptFailed("no text".to_string()),
        )
        .unwrap();
        match state {
            PipelineState::Failed { stage, .. } => {
                assert_eq!(stage, FailureStage::Transcription)
            }
            other => panic!("expected Failed, got {other:?}"),
        }

        let state = transition(
            &PipelineState::Summarizing,
            PipelineEvent::SummaryFailed("relay down".to_string()),
        )
        .unwrap();
        match state {
            PipelineState::Failed { stage, .. } => {
                assert_eq!(stage, FailureStage::Summarization)
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn stop_outside_recording_is_rejected_by_the_table() {
        // The machine treats this as a no-op; the table itself knows no
        // such transition.
        assert!(transition(&PipelineState::Idle, PipelineEvent::Stop).is_err());
        assert!(transition(&PipelineState::Summarizing, PipelineEvent::Stop).is_err());
    }

    #[tokio::test]
    async fn handle_applies_and_rejects() {
        let handle = PipelineStatusHandle::default();

        handle.apply(PipelineEvent::Start).await.unwrap();
        assert_eq!(handle.get().await.phase_str(), "recording");

        let err = handle.apply(PipelineEvent::Start).await.unwrap_err();
        assert_eq!(err.phase, "recording");
        // Rejection leaves the state untouched.
        assert_eq!(handle.get().await.phase_str(), "recording");
    }
}
