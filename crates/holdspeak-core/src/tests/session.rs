use crate::{
    AudioBlob, CaptureBackend, CoreError, CoreResult, Presenter, RecordingSession, SessionOutcome,
    SessionStatus,
};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use error_location::ErrorLocation;

#[derive(Clone, Default)]
struct FakeCapture {
    starts: Arc<AtomicUsize>,
    finishes: Arc<AtomicUsize>,
    cancels: Arc<AtomicUsize>,
    blob: Arc<Mutex<Vec<u8>>>,
    fail_start: bool,
    fail_finish: bool,
}

impl FakeCapture {
    fn with_blob(bytes: Vec<u8>) -> Self {
        let capture = Self::default();
        *capture.blob.lock().unwrap_or_else(|e| e.into_inner()) = bytes;
        capture
    }
}

#[async_trait]
impl CaptureBackend for FakeCapture {
    async fn start(&mut self) -> CoreResult<()> {
        if self.fail_start {
            return Err(CoreError::Capture {
                reason: "no microphone".into(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn finish(&mut self) -> CoreResult<AudioBlob> {
        if self.fail_finish {
            return Err(CoreError::Capture {
                reason: "stream died".into(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.finishes.fetch_add(1, Ordering::SeqCst);
        let bytes = self.blob.lock().unwrap_or_else(|e| e.into_inner()).clone();
        Ok(AudioBlob::new(bytes))
    }

    async fn cancel(&mut self) -> CoreResult<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct FakePresenter {
    shows: Arc<AtomicUsize>,
    hides: Arc<AtomicUsize>,
}

impl Presenter for FakePresenter {
    fn show_recording_indicator(&self) {
        self.shows.fetch_add(1, Ordering::SeqCst);
    }

    fn hide_recording_indicator(&self) {
        self.hides.fetch_add(1, Ordering::SeqCst);
    }
}

/// WHAT: A 300ms hold is discarded and no audio is produced
/// WHY: Accidental taps must never reach the transcription service
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_short_recording_when_stopped_then_discarded_and_idle() {
    // Given: An active recording 300ms old
    let capture = FakeCapture::with_blob(vec![0u8; 5000]);
    let mut session = RecordingSession::new(capture.clone(), FakePresenter::default());
    assert!(session.start().await.unwrap());
    tokio::time::advance(Duration::from_millis(300)).await;

    // When: Stopping
    let outcome = session.stop().await.unwrap();

    // Then: Discarded via cancel, never finalized, session idle again
    assert_eq!(outcome, Some(SessionOutcome::Discarded));
    assert_eq!(capture.cancels.load(Ordering::SeqCst), 1);
    assert_eq!(capture.finishes.load(Ordering::SeqCst), 0);
    assert!(session.is_idle());
}

/// WHAT: A 2000ms hold completes with the captured blob
/// WHY: Normal dictation path hands audio onward exactly once
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used, clippy::panic)]
async fn given_long_recording_when_stopped_then_completed_with_audio() {
    // Given: An active recording 2000ms old with 5000 bytes buffered
    let capture = FakeCapture::with_blob(vec![1u8; 5000]);
    let presenter = FakePresenter::default();
    let mut session = RecordingSession::new(capture.clone(), presenter.clone());
    assert!(session.start().await.unwrap());
    tokio::time::advance(Duration::from_millis(2000)).await;

    // When: Stopping
    let outcome = session.stop().await.unwrap();

    // Then: Completed with that blob, indicator shown and hidden once
    match outcome {
        Some(SessionOutcome::Completed(blob)) => assert_eq!(blob.len(), 5000),
        other => panic!("expected completion, got {:?}", other),
    }
    assert_eq!(presenter.shows.load(Ordering::SeqCst), 1);
    assert_eq!(presenter.hides.load(Ordering::SeqCst), 1);
    assert!(session.is_idle());
}

/// WHAT: Start while already active is a no-op
/// WHY: Exactly one session may exist at a time
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_active_session_when_started_again_then_noop() {
    let capture = FakeCapture::default();
    let mut session = RecordingSession::new(capture.clone(), FakePresenter::default());
    assert!(session.start().await.unwrap());

    assert!(!session.start().await.unwrap());
    assert_eq!(capture.starts.load(Ordering::SeqCst), 1);
}

/// WHAT: Stop while idle is a no-op
/// WHY: A Stop can never be processed before its matching Start
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_idle_session_when_stopped_then_noop() {
    let capture = FakeCapture::default();
    let mut session = RecordingSession::new(capture.clone(), FakePresenter::default());

    assert_eq!(session.stop().await.unwrap(), None);
    assert_eq!(capture.cancels.load(Ordering::SeqCst), 0);
}

/// WHAT: Capture failure on start leaves the session idle, indicator hidden
/// WHY: A dead microphone must not strand the state machine
#[tokio::test(start_paused = true)]
async fn given_failing_capture_when_started_then_error_and_idle() {
    let capture = FakeCapture {
        fail_start: true,
        ..Default::default()
    };
    let presenter = FakePresenter::default();
    let mut session = RecordingSession::new(capture, presenter.clone());

    let result = session.start().await;

    assert!(matches!(result, Err(CoreError::Capture { .. })));
    assert!(session.is_idle());
    assert_eq!(presenter.shows.load(Ordering::SeqCst), 0);
}

/// WHAT: Capture failure on finish still returns the session to idle
/// WHY: No error may leave the session stuck in Finalizing
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_failing_finish_when_stopped_then_error_but_idle() {
    let capture = FakeCapture {
        fail_finish: true,
        ..Default::default()
    };
    let mut session = RecordingSession::new(capture, FakePresenter::default());
    assert!(session.start().await.unwrap());
    tokio::time::advance(Duration::from_secs(1)).await;

    let result = session.stop().await;

    assert!(matches!(result, Err(CoreError::Capture { .. })));
    assert_eq!(session.status(), SessionStatus::Idle);
}
