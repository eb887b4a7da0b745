mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;
mod injection_config;
mod transcription_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, hotkey_config::HotkeyConfig,
    injection_config::InjectionConfig, transcription_config::TranscriptionConfig,
};

pub(crate) const DEFAULT_MODIFIER: &str = "AltGr";
pub(crate) const DEFAULT_KEY: &str = "KeyL";
pub(crate) const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";
pub(crate) const DEFAULT_MODEL: &str = "whisper-1";
pub(crate) const DEFAULT_LANGUAGE: &str = "auto";
pub(crate) const DEFAULT_INJECTION_METHOD: &str = "clipboard";
pub(crate) const DEFAULT_CHAR_DELAY_MS: u64 = 10;
pub(crate) const DEFAULT_AUTOSTART: bool = false;

pub(crate) fn default_modifier() -> String {
    DEFAULT_MODIFIER.to_owned()
}

pub(crate) fn default_key() -> String {
    DEFAULT_KEY.to_owned()
}

pub(crate) fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

pub(crate) fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

pub(crate) fn default_language() -> String {
    DEFAULT_LANGUAGE.to_owned()
}

pub(crate) fn default_injection_method() -> String {
    DEFAULT_INJECTION_METHOD.to_owned()
}

pub(crate) fn default_char_delay_ms() -> u64 {
    DEFAULT_CHAR_DELAY_MS
}

pub(crate) fn default_autostart() -> bool {
    DEFAULT_AUTOSTART
}
