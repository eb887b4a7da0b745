use error_location::ErrorLocation;
use thiserror::Error;

/// Orchestration errors with source location tracking.
///
/// Every variant is contained at the component boundary where it occurs:
/// nothing here may leave the recording session outside `Idle`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid or missing configuration (bad hotkey codes, no API credential).
    /// Fatal to the affected feature only; reported once, never retried.
    #[error("Configuration error: {reason} {location}")]
    Configuration {
        /// Description of the configuration problem.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Input rejected before any work was attempted (audio empty or too
    /// short). A silent no-op from the user's perspective.
    #[error("Validation error: {reason} {location}")]
    Validation {
        /// Description of the rejected input.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Transport-level transcription failure (timeout, connection reset).
    /// The user simply records again; no automatic retry beyond the
    /// backend's built-in attempts.
    #[error("Transient network error: {reason} {location}")]
    TransientNetwork {
        /// Description of the transport failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Non-transient transcription failure, surfaced to the user as a
    /// failure notification. No partial text is ever injected.
    #[error("Transcription service error: {reason} {location}")]
    Service {
        /// Description of the service failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio capture collaborator failure (no microphone, stream error).
    #[error("Capture error: {reason} {location}")]
    Capture {
        /// Description of the capture failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Text injection failure. Logged, never escalated as fatal.
    #[error("Injection error: {reason} {location}")]
    Injection {
        /// Description of the injection failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Whether this failure is transport-level and worth nothing more than
    /// a log line. Everything else in the transcription path is surfaced
    /// as a failure notification.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::TransientNetwork { .. })
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
