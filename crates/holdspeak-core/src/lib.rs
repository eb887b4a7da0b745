//! Holdspeak Core Library
//!
//! Push-to-talk dictation orchestration: hotkey edge-detection, recording
//! session lifecycle, transcription request lifecycle with cancellation,
//! and clipboard-preserving text injection. I/O happens exclusively
//! through the collaborator traits ([`CaptureBackend`],
//! [`TranscribeBackend`], [`ClipboardPort`], [`KeystrokePort`],
//! [`Presenter`]); the binary crate supplies the real adapters.
//!
//! All shared state (tracker, session, manager) is driven from a single
//! consumer loop: events from the key hook are marshaled onto it before
//! any mutation, so no two state mutations are ever concurrent.

mod error;
mod hotkey;
mod inject;
mod session;
mod transcribe;

pub use {
    error::{CoreError, Result as CoreResult},
    hotkey::{HotkeyCombo, HotkeyState, HotkeyTracker, KeyEvent, RecordingIntent},
    inject::{
        CLIPBOARD_RESTORE_DELAY, CLIPBOARD_SETTLE_DELAY, ClipboardPort, DEFAULT_CHAR_DELAY,
        FOCUS_SETTLE_DELAY, InjectionMethod, KeystrokePort, TextInjector,
    },
    session::{
        AudioBlob, CaptureBackend, MIN_RECORDING_DURATION, Presenter, RecordingSession,
        SessionOutcome, SessionStatus,
    },
    transcribe::{
        BackendFactory, Language, MIN_AUDIO_BYTES, TranscribeBackend, TranscriptionManager,
        TranscriptionOutcome,
    },
};

#[cfg(test)]
mod tests;
