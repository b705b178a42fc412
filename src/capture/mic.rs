//! Microphone chunk source via cpal.
//!
//! The cpal stream is not `Send`, so it lives on a dedicated worker thread
//! for the duration of one recording. The callback converts f32 samples to
//! i16 little-endian PCM bytes and pushes them into the sink; dropping the
//! stream releases the device.

use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info};

use super::source::{ChunkSink, ChunkSource};
use crate::error::CaptureError;

pub struct MicChunkSource {
    sample_rate: u32,
    worker: Option<Worker>,
}

struct Worker {
    stop_tx: std_mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl MicChunkSource {
    /// Create a mic source targeting the given sample rate (mono).
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            worker: None,
        }
    }
}

impl ChunkSource for MicChunkSource {
    fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError> {
        if self.worker.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let (stop_tx, stop_rx) = std_mpsc::channel();
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let sample_rate = self.sample_rate;

        let handle = std::thread::spawn(move || {
            mic_worker(sample_rate, sink, stop_rx, ready_tx);
        });

        // The worker reports device initialization before entering its wait,
        // so permission and device errors surface synchronously here.
        match ready_rx.recv() {
            Ok(Ok(())) => {
                self.worker = Some(Worker { stop_tx, handle });
                info!("Mic capture started ({} Hz mono)", sample_rate);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(CaptureError::Device(
                    "mic worker exited before initializing".to_string(),
                ))
            }
        }
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(worker) = self.worker.take() {
            debug!("Stopping mic worker");
            let _ = worker.stop_tx.send(());
            if worker.handle.join().is_err() {
                return Err(CaptureError::Device("mic worker panicked".to_string()));
            }
            info!("Mic capture stopped, device released");
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        1
    }
}

impl Drop for MicChunkSource {
    fn drop(&mut self) {
        if self.worker.is_some() {
            debug!("Dropping active MicChunkSource, cleaning up");
            let _ = self.stop();
        }
    }
}

fn mic_worker(
    sample_rate: u32,
    sink: ChunkSink,
    stop_rx: std_mpsc::Receiver<()>,
    ready_tx: std_mpsc::Sender<Result<(), CaptureError>>,
) {
    let host = cpal::default_host();
    let device = match host.default_input_device() {
        Some(d) => d,
        None => {
            let _ = ready_tx.send(Err(CaptureError::PermissionDenied(
                "no input device available (check microphone permissions)".to_string(),
            )));
            return;
        }
    };

    debug!(
        "Mic source using device: {}",
        device.name().unwrap_or_else(|_| "unknown".to_string())
    );

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let err_fn = |err| error!("Mic stream error: {}", err);

    let stream = match device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let mut chunk = Vec::with_capacity(data.len() * 2);
            for &sample in data {
                let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                chunk.extend_from_slice(&value.to_le_bytes());
            }
            sink.push(chunk);
        },
        err_fn,
        None,
    ) {
        Ok(s) => s,
        Err(cpal::BuildStreamError::DeviceNotAvailable) => {
            let _ = ready_tx.send(Err(CaptureError::PermissionDenied(
                "input device not available".to_string(),
            )));
            return;
        }
        Err(e) => {
            let _ = ready_tx.send(Err(CaptureError::Device(e.to_string())));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(CaptureError::Device(e.to_string())));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    // Block until stop; dropping the stream releases the device and, with
    // it, the callback's clone of the sink.
    let _ = stop_rx.recv();
    drop(stream);
}
