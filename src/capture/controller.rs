//! Capture controller: one recording session at a time, deterministic
//! chunk drain, single finalized blob per session.

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use super::source::{ChunkSink, ChunkSource};
use super::{AudioBlob, FinishedRecording, RecordingSession, SessionStatus};
use crate::error::CaptureError;

pub struct CaptureController {
    source: Box<dyn ChunkSource>,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    session: RecordingSession,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl CaptureController {
    pub fn new(source: Box<dyn ChunkSource>) -> Self {
        Self {
            source,
            active: None,
        }
    }

    /// Begin a new recording session.
    ///
    /// Rejected while a session is active; a second concurrent session is
    /// never created. Device or permission failures leave no session behind.
    pub fn start(&mut self) -> Result<Uuid, CaptureError> {
        if self.active.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut session = RecordingSession::new();

        self.source.start(ChunkSink::new(tx))?;

        session.status = SessionStatus::Recording;
        let id = session.id;
        info!("Recording session {} started", id);

        self.active = Some(ActiveSession { session, rx });
        Ok(id)
    }

    /// Stop the active session and finalize its blob.
    ///
    /// A no-op returning `Ok(None)` when no session is recording. The device
    /// is released before the drain, so release is guaranteed even when the
    /// recording produced no chunks.
    pub fn stop(&mut self) -> Result<Option<FinishedRecording>, CaptureError> {
        let Some(mut active) = self.active.take() else {
            return Ok(None);
        };

        let released = self.source.stop();

        // The source has dropped its sink, so the channel holds the complete
        // ordered chunk sequence; drain it into one contiguous blob.
        let mut data = Vec::new();
        while let Ok(chunk) = active.rx.try_recv() {
            data.extend_from_slice(&chunk);
        }

        released?;

        active.session.status = SessionStatus::Stopped;
        if data.is_empty() {
            warn!("Recording session {} finalized empty", active.session.id);
        } else {
            info!(
                "Recording session {} finalized: {} bytes",
                active.session.id,
                data.len()
            );
        }

        Ok(Some(FinishedRecording {
            session_id: active.session.id,
            blob: AudioBlob {
                data,
                sample_rate: self.source.sample_rate(),
                channels: self.source.channels(),
            },
        }))
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }
}
