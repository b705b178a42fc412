//! Chunk source abstraction for incremental audio capture.

use tokio::sync::mpsc;

use crate::error::CaptureError;

/// Ordered delivery channel from a capture device into the controller.
///
/// Chunks are appended in the order `push` is called, which for a real
/// device is the temporal order of capture. Empty chunks are skipped, as
/// zero-size fragments carry no audio.
#[derive(Clone)]
pub struct ChunkSink {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChunkSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self { tx }
    }

    /// Deliver one chunk. Delivery after the receiving session is gone is
    /// silently dropped; the source is about to be stopped anyway.
    pub fn push(&self, chunk: Vec<u8>) {
        if chunk.is_empty() {
            return;
        }
        let _ = self.tx.send(chunk);
    }
}

/// A device that delivers binary audio chunks while active.
///
/// Contract: after `start` returns Ok, chunks may arrive on the sink from
/// the device's own callback context at any time until `stop` returns.
/// `stop` must release the device and drop every clone of the sink before
/// returning, so the controller can drain the channel to completion.
pub trait ChunkSource: Send {
    /// Begin capturing into `sink`. Permission or device failures surface
    /// here; on error no chunks have been delivered.
    fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError>;

    /// Stop capturing and release the device. Valid to call once per start.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Whether this source is currently capturing.
    fn is_active(&self) -> bool;

    /// Sample rate of the delivered audio.
    fn sample_rate(&self) -> u32;

    /// Channel count of the delivered audio.
    fn channels(&self) -> u16;
}
