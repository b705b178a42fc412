//! Client for the summarization relay.
//!
//! The relay holds the generative-provider credential and the prompt
//! template; this client only ships the transcript text. One attempt per
//! call, no retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{SummaryResult, SummaryService};
use crate::error::SummarizeError;
use crate::transcription::TranscriptionResult;

const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787/transcribe";

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    transcript: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    summary: String,
}

pub struct RelaySummaryClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelaySummaryClient {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());
        info!("Initialized summary relay client for {}", endpoint);

        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl SummaryService for RelaySummaryClient {
    fn name(&self) -> &'static str {
        "Summary relay"
    }

    async fn summarize(
        &self,
        transcript: &TranscriptionResult,
    ) -> Result<SummaryResult, SummarizeError> {
        let text = transcript.text.trim();
        if text.is_empty() {
            // Local validation: no outbound call for an empty transcript.
            return Err(SummarizeError::EmptyInput);
        }

        info!(
            "Requesting summary for session {} ({} chars)",
            transcript.source_session,
            text.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RelayRequest { transcript: text })
            .send()
            .await
            .map_err(|e| SummarizeError::Relay(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SummarizeError::Relay(e.to_string()))?;

        if !status.is_success() {
            error!(
                "Summarization relay returned status {}: {}",
                status, body
            );
            return Err(SummarizeError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        // Canonical deployments answer JSON `{"summary": …}`; the legacy
        // echo variant answers plain text. Tolerate both.
        let summary = match serde_json::from_str::<RelayResponse>(&body) {
            Ok(parsed) => parsed.summary,
            Err(_) => body.trim().to_string(),
        };

        if summary.is_empty() {
            return Err(SummarizeError::MalformedResponse);
        }

        info!("Summary received: {} chars", summary.len());
        debug!("Raw summary: {}", summary);

        Ok(SummaryResult {
            text: summary,
            source_session: transcript.source_session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn transcript(text: &str) -> TranscriptionResult {
        TranscriptionResult {
            text: text.to_string(),
            source_session: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn empty_transcript_fails_without_network() {
        // An unroutable endpoint: any outbound attempt would surface as a
        // Relay error, so an EmptyInput result proves no call was made.
        let client = RelaySummaryClient::new(Some("http://127.0.0.1:1/transcribe".to_string()));

        let err = client.summarize(&transcript("")).await.unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyInput));

        let err = client.summarize(&transcript("   ")).await.unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyInput));
    }

    #[test]
    fn json_response_is_preferred_over_plain_text() {
        let body = r#"{"summary": "Summary: short."}"#;
        let parsed: RelayResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.summary, "Summary: short.");
    }

    #[test]
    fn request_body_uses_transcript_field() {
        let body = serde_json::to_value(RelayRequest {
            transcript: "Alice proposed X.",
        })
        .unwrap();
        assert_eq!(body["transcript"], "Alice proposed X.");
    }
}
