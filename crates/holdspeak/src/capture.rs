//! Microphone capture adapter.
//!
//! Buffers samples from the default input device and finalizes them as a
//! 16-bit PCM WAV blob for the transcription service. The device is
//! resolved on every start so a microphone plugged in after launch still
//! works; a missing device surfaces as a capture error and the session
//! returns to idle.

use holdspeak_core::{AudioBlob, CaptureBackend, CoreError, CoreResult};

use std::{
    collections::VecDeque,
    io::Cursor,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use cpal::{
    Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Maximum samples to buffer (5 minutes at 48kHz mono).
/// Prevents unbounded memory growth if a release event is ever lost.
const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// cpal-backed implementation of the capture collaborator.
pub struct CpalCapture {
    stream: Option<Stream>,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after the
    /// buffer is drained.
    shutdown: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
}

impl CpalCapture {
    /// Create an idle capturer. Device discovery is deferred to `start`.
    pub fn new() -> Self {
        Self {
            stream: None,
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES))),
            shutdown: Arc::new(AtomicBool::new(false)),
            sample_rate: 0,
            channels: 0,
        }
    }

    #[track_caller]
    fn open_stream(&mut self) -> CoreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| CoreError::Capture {
                reason: "No microphone found".to_owned(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let supported = device
            .default_input_config()
            .map_err(|e| CoreError::Capture {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        let config: StreamConfig = supported.into();
        self.sample_rate = config.sample_rate;
        self.channels = config.channels;

        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);
        self.shutdown.store(false, Ordering::Release);
        samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than silently dropping
                    // audio; the VecDeque data is still valid.
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.extend(data.iter().copied());
                    while buf.len() > MAX_BUFFER_SAMPLES {
                        buf.pop_front();
                    }
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| CoreError::Capture {
                reason: format!("Failed to build input stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| CoreError::Capture {
            reason: format!("Failed to start input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(
            sample_rate = self.sample_rate,
            channels = self.channels,
            "Audio capture started"
        );
        self.stream = Some(stream);
        Ok(())
    }

    fn drain(&mut self) -> Vec<f32> {
        // Stop the callback before dropping the stream, then give any
        // in-flight callback a moment to observe the flag.
        self.shutdown.store(true, Ordering::Release);
        if let Some(stream) = self.stream.take() {
            drop(stream);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let mut buf = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        let samples: Vec<f32> = buf.iter().copied().collect();
        buf.clear();
        samples
    }

    #[track_caller]
    fn encode_wav(&self, samples: &[f32]) -> CoreResult<AudioBlob> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut buffer = Cursor::new(Vec::new());
        let mut writer =
            hound::WavWriter::new(&mut buffer, spec).map_err(|e| CoreError::Capture {
                reason: format!("Failed to create WAV writer: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let scaled = (clamped * f32::from(i16::MAX)) as i16;
            writer.write_sample(scaled).map_err(|e| CoreError::Capture {
                reason: format!("Failed to write sample: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        writer.finalize().map_err(|e| CoreError::Capture {
            reason: format!("Failed to finalize WAV: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(AudioBlob::new(buffer.into_inner()))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureBackend for CpalCapture {
    #[instrument(skip(self))]
    async fn start(&mut self) -> CoreResult<()> {
        self.open_stream()
    }

    #[instrument(skip(self))]
    async fn finish(&mut self) -> CoreResult<AudioBlob> {
        let samples = self.drain();
        if samples.is_empty() {
            return Err(CoreError::Capture {
                reason: "No audio captured".to_owned(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let blob = self.encode_wav(&samples)?;
        debug!(
            sample_count = samples.len(),
            encoded_bytes = blob.len(),
            "Capture finalized"
        );
        Ok(blob)
    }

    #[instrument(skip(self))]
    async fn cancel(&mut self) -> CoreResult<()> {
        let dropped = self.drain();
        debug!(sample_count = dropped.len(), "Capture cancelled");
        Ok(())
    }
}
