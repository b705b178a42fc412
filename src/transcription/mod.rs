//! Speech-to-text provider seam and the whisper-over-HTTP implementation.

mod whisper_api;

pub use whisper_api::WhisperApiProvider;

use async_trait::async_trait;
use uuid::Uuid;

use crate::capture::FinishedRecording;
use crate::error::TranscribeError;

/// Transcript produced from one finished recording. Immutable once created.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    pub text: String,
    pub source_session: Uuid,
}

/// A service that turns a finished recording into text.
///
/// Implementations make at most one outbound attempt per call; there is no
/// retry and no local persistence.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(
        &self,
        recording: &FinishedRecording,
    ) -> Result<TranscriptionResult, TranscribeError>;
}
