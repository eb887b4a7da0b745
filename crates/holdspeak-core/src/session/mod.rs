//! Recording session lifecycle.
//!
//! Owns the `Idle -> Active -> Finalizing -> Idle` state machine, the
//! minimum-duration discard filter, and the capture collaborator. Exactly
//! one session exists at a time and it is only ever driven from the single
//! consumer loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::CoreResult;

/// Recordings shorter than this are accidental taps and are discarded
/// without producing audio.
pub const MIN_RECORDING_DURATION: Duration = Duration::from_millis(500);

/// Opaque encoded audio delivered by the capture collaborator.
///
/// The container format is an adapter concern; the core only ever measures
/// and forwards the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob(Vec<u8>);

impl AudioBlob {
    /// Wrap encoded audio bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob contains no audio at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the blob, yielding the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Audio capture collaborator.
///
/// Delivers an opaque encoded byte buffer on `finish`; `cancel` discards
/// whatever was buffered without producing audio.
#[async_trait]
pub trait CaptureBackend: Send {
    /// Begin buffering microphone input.
    async fn start(&mut self) -> CoreResult<()>;
    /// Stop buffering and deliver the encoded audio.
    async fn finish(&mut self) -> CoreResult<AudioBlob>;
    /// Stop buffering and drop the audio.
    async fn cancel(&mut self) -> CoreResult<()>;
}

/// One-way presentation notifications. No feedback into core state.
pub trait Presenter: Send {
    /// A recording just started; show the on-screen indicator.
    fn show_recording_indicator(&self);
    /// The recording ended (completed or discarded); hide the indicator.
    fn hide_recording_indicator(&self);
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No recording in progress.
    Idle,
    /// Recording since the contained instant.
    Active {
        /// When `start` succeeded.
        started_at: Instant,
    },
    /// Stop accepted, capture collaborator finalizing or cancelling.
    Finalizing,
}

/// What became of a stopped recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The recording ran long enough; here is its audio.
    Completed(AudioBlob),
    /// Accidental tap below [`MIN_RECORDING_DURATION`]; no audio produced.
    Discarded,
}

/// The recording state machine.
///
/// Every path through [`start`](Self::start) and [`stop`](Self::stop)
/// returns the session to a stable state; capture failures surface as
/// errors but never leave the status outside `Idle`.
pub struct RecordingSession<C, P> {
    capture: C,
    presenter: P,
    status: SessionStatus,
    session_id: Option<Uuid>,
}

impl<C: CaptureBackend, P: Presenter> RecordingSession<C, P> {
    /// Create an idle session over the given collaborators.
    pub fn new(capture: C, presenter: P) -> Self {
        Self {
            capture,
            presenter,
            status: SessionStatus::Idle,
            session_id: None,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether a new recording may start.
    pub fn is_idle(&self) -> bool {
        matches!(self.status, SessionStatus::Idle)
    }

    /// Begin a recording.
    ///
    /// A no-op (returns `Ok(false)`) unless the session is `Idle`; a start
    /// arriving while `Finalizing` must wait for the next chord.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Capture`](crate::CoreError::Capture) when the
    /// capture collaborator cannot start (e.g. no microphone); the session
    /// stays `Idle`.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> CoreResult<bool> {
        if !self.is_idle() {
            debug!(status = ?self.status, "Start ignored, session not idle");
            return Ok(false);
        }

        let session_id = Uuid::new_v4();
        self.capture.start().await?;

        self.status = SessionStatus::Active {
            started_at: Instant::now(),
        };
        self.session_id = Some(session_id);
        self.presenter.show_recording_indicator();

        info!(session_id = %session_id, "Recording started");
        Ok(true)
    }

    /// End the current recording.
    ///
    /// A no-op (returns `Ok(None)`) unless the session is `Active`.
    /// Recordings shorter than [`MIN_RECORDING_DURATION`] are cancelled on
    /// the capture collaborator and reported as `Discarded`; longer ones
    /// are finalized into `Completed(blob)`.
    ///
    /// # Errors
    ///
    /// Capture failures during cancel/finish are returned, but the session
    /// is back in `Idle` first — stop can never strand it.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<Option<SessionOutcome>> {
        let SessionStatus::Active { started_at } = self.status else {
            debug!(status = ?self.status, "Stop ignored, session not active");
            return Ok(None);
        };

        self.status = SessionStatus::Finalizing;
        self.presenter.hide_recording_indicator();

        let session_id = self.session_id.take();
        let elapsed = started_at.elapsed();

        if elapsed < MIN_RECORDING_DURATION {
            warn!(
                session_id = ?session_id,
                elapsed_ms = elapsed.as_millis(),
                "Recording too short, discarding"
            );
            let cancelled = self.capture.cancel().await;
            self.status = SessionStatus::Idle;
            cancelled?;
            return Ok(Some(SessionOutcome::Discarded));
        }

        let finished = self.capture.finish().await;
        self.status = SessionStatus::Idle;
        let blob = finished?;

        info!(
            session_id = ?session_id,
            elapsed_ms = elapsed.as_millis(),
            audio_bytes = blob.len(),
            "Recording completed"
        );
        Ok(Some(SessionOutcome::Completed(blob)))
    }
}
