//! Transcription request lifecycle.
//!
//! At most one request is ever "current". Submitting a new one bumps a
//! shared identity counter; a superseded request's network call may still
//! complete, but its result is compared against the counter at completion
//! time and discarded. The audio blob is consumed through a scoped
//! temporary file that is deleted on every exit path.

use std::{
    io::Write,
    panic::Location,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::{AudioBlob, CoreError, CoreResult};

/// Minimum encoded size worth sending; anything below this cannot contain
/// useful audio.
pub const MIN_AUDIO_BYTES: usize = 1000;

/// Recording-language preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    /// Let the service detect the language; the request omits the field.
    Auto,
    /// Explicit ISO 639-1 code (e.g. "en", "tr", "de").
    Code(String),
}

impl Language {
    /// Parse the persisted configuration value ("auto" or a language code).
    pub fn from_config(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            Language::Auto
        } else {
            Language::Code(value.to_ascii_lowercase())
        }
    }

    /// The code to put on the wire, or `None` for auto-detection.
    pub fn request_code(&self) -> Option<&str> {
        match self {
            Language::Auto => None,
            Language::Code(code) => Some(code),
        }
    }
}

/// Remote transcription collaborator.
///
/// The implementation owns its network timeout and bounded retry policy;
/// the manager's added responsibility is request identity, not retry
/// mechanics.
#[async_trait]
pub trait TranscribeBackend: Send + Sync {
    /// Transcribe the audio file at `audio`, optionally pinned to a
    /// language, returning the raw text.
    async fn transcribe(&self, audio: &Path, language: Option<&str>) -> CoreResult<String>;
}

/// Lazily constructs the backend on first use. Fails with
/// [`CoreError::Configuration`] when no credential is available.
pub type BackendFactory = Box<dyn Fn() -> CoreResult<Arc<dyn TranscribeBackend>> + Send>;

/// Result of a transcription request, delivered to the consumer loop.
///
/// Only ever sent for the request that is still current; superseded and
/// transient-failure results are dropped inside the manager.
#[derive(Debug)]
pub enum TranscriptionOutcome {
    /// The service returned non-empty text.
    Transcribed {
        /// Identity of the originating request.
        request_id: u64,
        /// Trimmed transcription.
        text: String,
    },
    /// A non-transient failure the user should see a notification for.
    Failed {
        /// Identity of the originating request.
        request_id: u64,
        /// What went wrong.
        error: CoreError,
    },
}

/// Owns the at-most-one-in-flight transcription request.
pub struct TranscriptionManager {
    backend: Option<Arc<dyn TranscribeBackend>>,
    factory: BackendFactory,
    language: Language,
    /// Highest request identity handed out. A task whose id no longer
    /// matches this at completion time has been superseded.
    current_id: Arc<AtomicU64>,
    outcome_tx: mpsc::Sender<TranscriptionOutcome>,
}

impl TranscriptionManager {
    /// Create a manager delivering outcomes over `outcome_tx`.
    pub fn new(
        factory: BackendFactory,
        language: Language,
        outcome_tx: mpsc::Sender<TranscriptionOutcome>,
    ) -> Self {
        Self {
            backend: None,
            factory,
            language,
            current_id: Arc::new(AtomicU64::new(0)),
            outcome_tx,
        }
    }

    /// Whether `request_id` is still the current request.
    ///
    /// The spawned task checks identity before sending its outcome, but
    /// an outcome can already be queued on the channel when a newer
    /// submission bumps the counter. Consumers recheck with this before
    /// acting on a delivered outcome.
    pub fn is_current(&self, request_id: u64) -> bool {
        self.current_id.load(Ordering::SeqCst) == request_id
    }

    /// Submit a completed recording for transcription.
    ///
    /// Fire-and-forget: the request runs on a spawned task and its result
    /// arrives on the outcome channel. Submitting supersedes any
    /// outstanding request.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] when the audio is empty or below
    /// [`MIN_AUDIO_BYTES`]; [`CoreError::Configuration`] when no backend
    /// can be constructed (missing credential) — in which case no
    /// temporary file is ever created.
    #[track_caller]
    #[instrument(skip(self, audio), fields(audio_bytes = audio.len()))]
    pub fn submit(&mut self, audio: AudioBlob) -> CoreResult<u64> {
        if audio.is_empty() || audio.len() < MIN_AUDIO_BYTES {
            return Err(CoreError::Validation {
                reason: format!(
                    "Audio too short to transcribe ({} bytes, need {})",
                    audio.len(),
                    MIN_AUDIO_BYTES
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Bumping the counter is the cancellation: any outstanding task
        // will see a newer identity at completion time and discard itself.
        let request_id = self.current_id.fetch_add(1, Ordering::SeqCst) + 1;
        if request_id > 1 {
            debug!(request_id, "Superseding any outstanding request");
        }

        // Credential check happens before the request is materialized, so
        // a missing key never touches the filesystem.
        let backend = match &self.backend {
            Some(backend) => Arc::clone(backend),
            None => {
                let backend = (self.factory)()?;
                self.backend = Some(Arc::clone(&backend));
                backend
            }
        };

        let current_id = Arc::clone(&self.current_id);
        let outcome_tx = self.outcome_tx.clone();
        let language = self.language.clone();

        tokio::spawn(async move {
            let result = run_request(&*backend, audio, &language, request_id).await;

            if current_id.load(Ordering::SeqCst) != request_id {
                info!(request_id, "Request superseded, discarding result");
                return;
            }

            let outcome = match result {
                Ok(Some(text)) => TranscriptionOutcome::Transcribed { request_id, text },
                Ok(None) => {
                    info!(request_id, "Nothing transcribed");
                    return;
                }
                Err(error) if error.is_transient() => {
                    warn!(request_id, %error, "Transient transcription failure, record again");
                    return;
                }
                Err(error) => TranscriptionOutcome::Failed { request_id, error },
            };

            if outcome_tx.send(outcome).await.is_err() {
                debug!(request_id, "Outcome channel closed, result dropped");
            }
        });

        info!(request_id, "Transcription request submitted");
        Ok(request_id)
    }
}

/// Persist the blob to a scoped temporary file and run the remote call.
///
/// The `NamedTempFile` is dropped on every exit path, which unlinks it —
/// success, failure, and panic all clean up.
async fn run_request(
    backend: &dyn TranscribeBackend,
    audio: AudioBlob,
    language: &Language,
    request_id: u64,
) -> CoreResult<Option<String>> {
    let mut file = scoped_audio_file()?;
    file.write_all(audio.as_bytes())
        .map_err(|e| CoreError::Service {
            reason: format!("Failed to persist audio for transcription: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    debug!(
        request_id,
        path = ?file.path(),
        language = ?language.request_code(),
        "Audio persisted, calling transcription service"
    );

    let raw = backend.transcribe(file.path(), language.request_code()).await?;
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }

    info!(request_id, text_len = text.len(), "Transcription successful");
    Ok(Some(text.to_owned()))
}

#[track_caller]
fn scoped_audio_file() -> CoreResult<tempfile::NamedTempFile> {
    tempfile::Builder::new()
        .prefix("holdspeak-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| CoreError::Service {
            reason: format!("Failed to create temporary audio file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}
