//! Generative-text provider call made by the relay process.
//!
//! Request and response shapes follow the `generateContent` contract: a
//! `system_instruction` block carrying the prompt template and a `contents`
//! block wrapping the transcript. The service credential travels as a query
//! parameter and never reaches the capture/UI layer.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::prompt::SUMMARY_PROMPT;
use crate::error::RelayError;

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    system_instruction: InstructionBlock,
    contents: Vec<ContentBlock>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct InstructionBlock {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct ContentBlock {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<TextPart>,
}

pub struct GenerativeSummaryProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GenerativeSummaryProvider {
    pub fn new(api_key: String, endpoint: Option<String>) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        info!(
            "Initialized generative summary provider with endpoint: {}",
            endpoint
        );

        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    /// One summarization attempt: prompt template plus transcript, no retry.
    pub async fn summarize_transcript(&self, transcript: &str) -> Result<String, RelayError> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let body = build_request(transcript);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        if !status.is_success() {
            error!(
                "Summarization provider returned status {}: {}",
                status, text
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|_| RelayError::MalformedResponse)?;

        let summary = extract_candidate_text(parsed).ok_or(RelayError::MalformedResponse)?;

        info!("Provider summary received: {} chars", summary.len());
        debug!("Raw provider summary: {}", summary);
        Ok(summary)
    }
}

fn build_request(transcript: &str) -> GenerateRequest {
    GenerateRequest {
        system_instruction: InstructionBlock {
            parts: vec![TextPart {
                text: SUMMARY_PROMPT.to_string(),
            }],
        },
        contents: vec![ContentBlock {
            parts: vec![TextPart {
                text: transcript.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.2,
            max_output_tokens: 4096,
        },
    }
}

fn extract_candidate_text(response: GenerateResponse) -> Option<String> {
    let first = response.candidates?.into_iter().next()?;
    let text = first
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");

    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_embeds_template_and_transcript() {
        let body = serde_json::to_value(build_request("Alice proposed X.")).unwrap();

        let instruction = body["system_instruction"]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(instruction.contains("Key Points"));

        let content = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert_eq!(content, "Alice proposed X.");
    }

    #[test]
    fn candidate_text_is_joined_and_trimmed() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": " Summary: "}, {"text": "done "}]}}]}"#,
        )
        .unwrap();

        assert_eq!(
            extract_candidate_text(response).as_deref(),
            Some("Summary: done")
        );
    }

    #[test]
    fn missing_candidates_is_malformed() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_candidate_text(response).is_none());

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_candidate_text(response).is_none());
    }
}
