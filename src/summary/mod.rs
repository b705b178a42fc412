//! Summarization: the service seam used by the pipeline, the relay-backed
//! client implementation, and the generative-provider call the relay makes.

mod prompt;
mod provider;
mod relay_client;

pub use prompt::SUMMARY_PROMPT;
pub use provider::GenerativeSummaryProvider;
pub use relay_client::RelaySummaryClient;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SummarizeError;
use crate::transcription::TranscriptionResult;

/// Structured meeting summary. Immutable; held by the presentation state
/// for display until the next recording starts.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    pub text: String,
    pub source_session: Uuid,
}

/// A service that turns a transcript into a summary.
///
/// Single attempt per call. An empty transcript must fail with
/// [`SummarizeError::EmptyInput`] before any outbound call is made.
#[async_trait]
pub trait SummaryService: Send + Sync {
    fn name(&self) -> &'static str;

    async fn summarize(
        &self,
        transcript: &TranscriptionResult,
    ) -> Result<SummaryResult, SummarizeError>;
}
