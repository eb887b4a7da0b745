use crate::config::{Config, InjectionConfig, TranscriptionConfig};

use holdspeak_core::InjectionMethod;

/// WHAT: An empty config file yields the documented defaults
/// WHY: Every field must have a usable default so a fresh install works
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_toml_when_parsing_then_defaults_apply() {
    // Given/When: Parsing an empty document
    let config: Config = toml::from_str("").unwrap();

    // Then: All sections carry their defaults
    assert_eq!(config.hotkey.modifier, "AltGr");
    assert_eq!(config.hotkey.key, "KeyL");
    assert_eq!(
        config.transcription.endpoint,
        "https://api.openai.com/v1/audio/transcriptions"
    );
    assert_eq!(config.transcription.model, "whisper-1");
    assert_eq!(config.transcription.language, "auto");
    assert_eq!(config.injection.method(), InjectionMethod::Clipboard);
    assert_eq!(config.injection.char_delay_ms, 10);
    assert!(!config.behaviour.autostart);
}

/// WHAT: A partial config keeps defaults for everything it omits
/// WHY: Users edit single keys; the rest of the file must not be required
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_toml_when_parsing_then_missing_fields_default() {
    // Given: Only the hotkey key and the model are set
    let doc = r#"
        [hotkey]
        key = "F9"

        [transcription]
        model = "whisper-large-v3"
    "#;

    // When: Parsing
    let config: Config = toml::from_str(doc).unwrap();

    // Then: Overrides apply, siblings keep their defaults
    assert_eq!(config.hotkey.key, "F9");
    assert_eq!(config.hotkey.modifier, "AltGr");
    assert_eq!(config.transcription.model, "whisper-large-v3");
    assert_eq!(config.transcription.language, "auto");
}

/// WHAT: A config round-trips through serialization unchanged
/// WHY: Saving must never lose or mangle what the user configured
#[test]
#[allow(clippy::unwrap_used)]
fn given_modified_config_when_round_tripping_then_fields_preserved() {
    // Given: A config with non-default values
    let mut config = Config::default();
    config.hotkey.modifier = "ControlLeft".to_owned();
    config.transcription.language = "de".to_owned();
    config.injection.method = "keystroke".to_owned();
    config.behaviour.autostart = true;

    // When: Serializing and parsing back
    let doc = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&doc).unwrap();

    // Then: Every modified field survives
    assert_eq!(parsed.hotkey.modifier, "ControlLeft");
    assert_eq!(parsed.transcription.language, "de");
    assert_eq!(parsed.injection.method(), InjectionMethod::Keystroke);
    assert!(parsed.behaviour.autostart);
}

/// WHAT: A configured API key wins and is trimmed of whitespace
/// WHY: Trailing newlines from copy-paste must not break authentication
#[test]
fn given_api_key_in_config_when_resolving_credential_then_trimmed_key_returned() {
    // Given: A key with pasted whitespace
    let config = TranscriptionConfig {
        api_key: "  sk-test-123\n".to_owned(),
        ..TranscriptionConfig::default()
    };

    // When/Then: The credential is the trimmed key
    assert_eq!(config.credential().as_deref(), Some("sk-test-123"));
}

/// WHAT: Method names are matched case-insensitively with a safe fallback
/// WHY: "Keystroke" and "keystroke" should behave the same; garbage must
///      not disable injection entirely
#[test]
fn given_method_names_when_resolving_then_case_insensitive_with_fallback() {
    let keystroke = InjectionConfig {
        method: "Keystroke".to_owned(),
        ..InjectionConfig::default()
    };
    assert_eq!(keystroke.method(), InjectionMethod::Keystroke);

    let unknown = InjectionConfig {
        method: "telepathy".to_owned(),
        ..InjectionConfig::default()
    };
    assert_eq!(unknown.method(), InjectionMethod::Clipboard);
}
