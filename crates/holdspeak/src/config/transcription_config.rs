use crate::config::{default_endpoint, default_language, default_model};

use serde::{Deserialize, Serialize};

/// Transcription service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// API key for the transcription service. When empty, the
    /// `OPENAI_API_KEY` environment variable is used instead.
    #[serde(default)]
    pub api_key: String,

    /// OpenAI-compatible `audio/transcriptions` endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name sent with each request.
    #[serde(default = "default_model")]
    pub model: String,

    /// ISO 639-1 language code, or "auto" for detection by the service.
    #[serde(default = "default_language")]
    pub language: String,
}

impl TranscriptionConfig {
    /// Resolve the API key: config file first, environment second.
    ///
    /// Returns `None` when neither source has a non-empty value. The
    /// caller decides how to surface the missing credential.
    pub fn credential(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_owned());
        }

        std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            model: default_model(),
            language: default_language(),
        }
    }
}
