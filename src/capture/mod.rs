//! Microphone capture: chunk sources, the capture controller and the
//! recording session types it owns.

mod controller;
mod mic;
mod source;

pub use controller::CaptureController;
pub use mic::MicChunkSource;
pub use source::{ChunkSink, ChunkSource};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lifecycle of one capture attempt. A session moves strictly
/// `Idle → Recording → Stopped` and is consumed on handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Recording,
    Stopped,
}

/// One capture attempt, owned exclusively by the [`CaptureController`].
#[derive(Debug, Clone)]
pub struct RecordingSession {
    pub id: Uuid,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
}

impl RecordingSession {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: SessionStatus::Idle,
            started_at: Utc::now(),
        }
    }
}

/// Finalized, immutable audio artifact. The byte content is exactly the
/// concatenation of captured chunks in arrival order; empty recordings are
/// legal and produce an empty blob.
#[derive(Debug, Clone)]
pub struct AudioBlob {
    pub data: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioBlob {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A finished recording ready for handoff to transcription.
#[derive(Debug)]
pub struct FinishedRecording {
    pub session_id: Uuid,
    pub blob: AudioBlob,
}
