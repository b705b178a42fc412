//! Domain error taxonomy for the capture → transcribe → summarize pipeline.
//!
//! Display strings are safe to surface to a user; provider response bodies
//! stay in struct fields and only reach the logs via `Debug` formatting.

use thiserror::Error;

/// Failures owned by the capture controller and its chunk source.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("audio device failure: {0}")]
    Device(String),

    #[error("a recording is already in progress")]
    AlreadyRecording,
}

/// Failures from the speech-to-text call.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transcription provider returned status {status}")]
    Provider { status: u16, body: String },

    #[error("transcription response carries no text field")]
    MissingText,

    #[error("failed to package recording as WAV: {0}")]
    Encode(#[from] hound::Error),
}

/// Failures from the summarization call made by the capture side.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("nothing to summarize: transcript is empty")]
    EmptyInput,

    #[error("summarization relay unreachable: {0}")]
    Relay(String),

    #[error("summarization relay returned status {status}")]
    Provider { status: u16, body: String },

    #[error("summarization response carries no summary text")]
    MalformedResponse,
}

/// Failures inside the relay process while forwarding to the generative
/// provider.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("summarization provider credential is not configured")]
    MissingCredential,

    #[error("failed to reach summarization provider: {0}")]
    Network(String),

    #[error("summarization provider returned status {status}")]
    Upstream { status: u16, body: String },

    #[error("summarization provider response carries no candidate text")]
    MalformedResponse,
}

/// Errors returned by the pipeline machine's control operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Rejected(#[from] crate::pipeline::TransitionRejected),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_body_stays_out_of_display() {
        let err = TranscribeError::Provider {
            status: 500,
            body: "secret diagnostic payload".to_string(),
        };
        let shown = err.to_string();
        assert!(shown.contains("500"));
        assert!(!shown.contains("secret diagnostic payload"));

        let err = SummarizeError::Provider {
            status: 502,
            body: "upstream stack trace".to_string(),
        };
        assert!(!err.to_string().contains("upstream stack trace"));
    }

    #[test]
    fn empty_input_names_the_problem() {
        let err = SummarizeError::EmptyInput;
        assert!(err.to_string().contains("empty"));
    }
}
