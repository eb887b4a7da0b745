use crate::config::{default_char_delay_ms, default_injection_method};

use holdspeak_core::InjectionMethod;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Text injection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionConfig {
    /// Injection strategy: "clipboard" (paste) or "keystroke" (typing).
    #[serde(default = "default_injection_method")]
    pub method: String,

    /// Delay between synthesized characters in keystroke mode.
    #[serde(default = "default_char_delay_ms")]
    pub char_delay_ms: u64,
}

impl InjectionConfig {
    /// Resolve the configured method name, falling back to clipboard on
    /// an unrecognized value.
    pub fn method(&self) -> InjectionMethod {
        match self.method.to_lowercase().as_str() {
            "clipboard" => InjectionMethod::Clipboard,
            "keystroke" => InjectionMethod::Keystroke,
            other => {
                warn!(method = other, "Unknown injection method, using clipboard");
                InjectionMethod::Clipboard
            }
        }
    }
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            method: default_injection_method(),
            char_delay_ms: default_char_delay_ms(),
        }
    }
}
