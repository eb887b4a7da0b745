//! Remote transcription adapter.
//!
//! Sends the recorded WAV to an OpenAI-compatible `audio/transcriptions`
//! endpoint. The adapter owns the network timeout and the bounded retry
//! policy; request identity and cancellation live in the core manager.

use holdspeak_core::{CoreError, CoreResult, TranscribeBackend};

use std::{panic::Location, path::Path, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, instrument, warn};

use crate::config::TranscriptionConfig;

/// Per-request network timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Total attempts per request. Retries cover transport errors only; an
/// HTTP error status is answered by the service and not worth repeating.
const MAX_ATTEMPTS: u32 = 3;

/// Pause between transport-error retries.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// OpenAI-compatible transcription client.
pub struct ApiTranscriber {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ApiTranscriber {
    /// Build a client from persisted configuration.
    ///
    /// # Errors
    ///
    /// [`CoreError::Configuration`] when no API key is present in the
    /// config or the `OPENAI_API_KEY` environment variable, or when the
    /// endpoint is not an http(s) URL.
    #[track_caller]
    #[instrument(skip(config))]
    pub fn from_config(config: &TranscriptionConfig) -> CoreResult<Self> {
        let api_key = config.credential().ok_or_else(|| CoreError::Configuration {
            reason: "No API key configured; set transcription.api_key or OPENAI_API_KEY"
                .to_owned(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let endpoint = config.endpoint.clone();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(CoreError::Configuration {
                reason: format!(
                    "Transcription endpoint must start with http:// or https://, got: {}",
                    endpoint
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Configuration {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(endpoint = %endpoint, model = %config.model, "Transcription client initialized");

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key,
        })
    }

    fn request_form(&self, wav: &[u8], language: Option<&str>) -> CoreResult<Form> {
        let file = Part::bytes(wav.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| CoreError::Service {
                reason: format!("Failed to build multipart body: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file);

        // Auto-detect is expressed by omitting the field entirely.
        if let Some(code) = language {
            form = form.text("language", code.to_owned());
        }

        Ok(form)
    }
}

#[async_trait]
impl TranscribeBackend for ApiTranscriber {
    #[instrument(skip(self, audio))]
    async fn transcribe(&self, audio: &Path, language: Option<&str>) -> CoreResult<String> {
        let wav = tokio::fs::read(audio).await.map_err(|e| CoreError::Service {
            reason: format!("Failed to read audio file {:?}: {}", audio, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut attempt = 1;
        loop {
            debug!(attempt, audio_bytes = wav.len(), "Sending transcription request");

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .multipart(self.request_form(&wav, language)?)
                .send()
                .await;

            match response {
                Ok(response) if response.status().is_success() => {
                    // A reset or timeout can also strike while the body is
                    // being read; that is still a transport failure, not a
                    // service answer.
                    return match response.text().await {
                        Ok(text) => Ok(text),
                        Err(e) if is_transport_error(&e) => Err(CoreError::TransientNetwork {
                            reason: format!(
                                "Connection lost reading transcription response: {}",
                                e
                            ),
                            location: ErrorLocation::from(Location::caller()),
                        }),
                        Err(e) => Err(CoreError::Service {
                            reason: format!("Failed to read transcription response: {}", e),
                            location: ErrorLocation::from(Location::caller()),
                        }),
                    };
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(CoreError::Service {
                        reason: format!(
                            "Transcription service returned {}: {}",
                            status,
                            body.chars().take(200).collect::<String>()
                        ),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Err(e) if is_transport_error(&e) && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, error = %e, "Transport error, retrying");
                    tokio::time::sleep(RETRY_DELAY * attempt).await;
                    attempt += 1;
                }
                Err(e) if is_transport_error(&e) => {
                    return Err(CoreError::TransientNetwork {
                        reason: format!("Transcription request failed after {} attempts: {}", attempt, e),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Err(e) => {
                    return Err(CoreError::Service {
                        reason: format!("Transcription request failed: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }
    }
}

fn is_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}
