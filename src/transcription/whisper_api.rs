//! Whisper-compatible transcription over HTTP multipart upload.
//!
//! The provider packages the finalized PCM blob as a WAV file and posts it
//! with fixed `model` and `response_format` fields plus a bearer credential.
//! The response text is accepted under either the `text` or `transcription`
//! key; some deployments of the endpoint use one, some the other.

use std::io::Cursor;

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use serde::Deserialize;
use tracing::{debug, error, info};

use super::{TranscriptionProvider, TranscriptionResult};
use crate::capture::{AudioBlob, FinishedRecording};
use crate::error::TranscribeError;

const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/audio/transcriptions";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
    transcription: Option<String>,
}

impl TranscriptionResponse {
    fn into_text(self) -> Option<String> {
        self.text.or(self.transcription)
    }
}

pub struct WhisperApiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl WhisperApiProvider {
    pub fn new(api_key: String, endpoint: Option<String>, model: String) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        info!("Initialized whisper provider with endpoint: {}", endpoint);

        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperApiProvider {
    fn name(&self) -> &'static str {
        "Whisper API"
    }

    async fn transcribe(
        &self,
        recording: &FinishedRecording,
    ) -> Result<TranscriptionResult, TranscribeError> {
        info!(
            "Transcribing session {} ({} bytes)",
            recording.session_id,
            recording.blob.len()
        );

        let wav = pcm_to_wav(&recording.blob)?;

        let file = reqwest::multipart::Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")?;

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                "Transcription request failed with status {}: {}",
                status, body
            );
            return Err(TranscribeError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Unparseable transcription response: {} ({})", body, e);
            TranscribeError::MissingText
        })?;

        let text = parsed
            .into_text()
            .map(|t| t.trim().to_string())
            .ok_or(TranscribeError::MissingText)?;

        info!("Transcription complete: {} chars", text.len());
        debug!("Raw transcription: {}", text);

        Ok(TranscriptionResult {
            text,
            source_session: recording.session_id,
        })
    }
}

/// Wrap the raw i16 little-endian PCM blob in a WAV container in memory.
/// A trailing odd byte cannot form a sample and is dropped.
fn pcm_to_wav(blob: &AudioBlob) -> Result<Vec<u8>, TranscribeError> {
    let spec = WavSpec {
        channels: blob.channels,
        sample_rate: blob.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for bytes in blob.data.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([bytes[0], bytes[1]]))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_accepts_text_key() {
        let parsed: TranscriptionResponse = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("hello"));
    }

    #[test]
    fn response_accepts_transcription_key() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"transcription": "hello there"}"#).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("hello there"));
    }

    #[test]
    fn response_prefers_text_when_both_present() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "primary", "transcription": "secondary"}"#).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("primary"));
    }

    #[test]
    fn response_with_neither_key_yields_nothing() {
        let parsed: TranscriptionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[test]
    fn pcm_wraps_into_riff_container() {
        let blob = AudioBlob {
            data: vec![0x01, 0x00, 0xff, 0x7f, 0x00, 0x80],
            sample_rate: 16000,
            channels: 1,
        };

        let wav = pcm_to_wav(&blob).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte canonical header plus the three samples.
        assert_eq!(wav.len(), 44 + 6);
    }

    #[test]
    fn empty_blob_yields_header_only_wav() {
        let blob = AudioBlob {
            data: Vec::new(),
            sample_rate: 16000,
            channels: 1,
        };

        let wav = pcm_to_wav(&blob).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(wav.len(), 44);
    }

    #[test]
    fn trailing_odd_byte_is_dropped() {
        let blob = AudioBlob {
            data: vec![0x01, 0x00, 0x02],
            sample_rate: 16000,
            channels: 1,
        };

        let wav = pcm_to_wav(&blob).unwrap();
        assert_eq!(wav.len(), 44 + 2);
    }
}
