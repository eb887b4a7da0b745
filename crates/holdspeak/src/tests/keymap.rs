use crate::{config::HotkeyConfig, keymap};

use holdspeak_core::CoreError;

use rdev::Key;

/// WHAT: The default hotkey config resolves to AltGr + L
/// WHY: The out-of-the-box chord must work without any user editing
#[test]
#[allow(clippy::unwrap_used)]
fn given_default_config_when_resolving_then_altgr_l_combo_returned() {
    // Given: An untouched default config
    let config = HotkeyConfig::default();

    // When: Resolving the combo
    let combo = keymap::resolve_combo(&config);

    // Then: AltGr is the modifier and KeyL the main key
    let combo = combo.unwrap();
    assert_eq!(combo.modifier(), Key::AltGr);
    assert_eq!(combo.main(), Key::KeyL);
}

/// WHAT: An unknown modifier name is a configuration error
/// WHY: A typo in the config must disable the hotkey loudly, not silently
#[test]
#[allow(clippy::panic)]
fn given_unknown_modifier_when_resolving_then_configuration_error() {
    // Given: A config with a misspelled modifier
    let config = HotkeyConfig {
        modifier: "AltGraph".to_owned(),
        key: "KeyL".to_owned(),
    };

    // When: Resolving the combo
    let result = keymap::resolve_combo(&config);

    // Then: Resolution fails with a configuration error naming the key
    match result {
        Err(CoreError::Configuration { reason, .. }) => {
            assert!(reason.contains("AltGraph"));
        }
        other => panic!("Expected configuration error, got {:?}", other),
    }
}

/// WHAT: Identical modifier and main key are rejected
/// WHY: A one-key chord cannot express press-both-then-release semantics
#[test]
fn given_same_key_twice_when_resolving_then_configuration_error() {
    // Given: Both names resolve to the same key
    let config = HotkeyConfig {
        modifier: "F9".to_owned(),
        key: "F9".to_owned(),
    };

    // When: Resolving the combo
    let result = keymap::resolve_combo(&config);

    // Then: Validation in the combo constructor rejects it
    assert!(matches!(result, Err(CoreError::Configuration { .. })));
}

/// WHAT: Names follow the rdev scheme exactly, including case
/// WHY: Documented names must round-trip; lookalikes must not
#[test]
fn given_assorted_names_when_resolving_keys_then_exact_matches_only() {
    assert_eq!(keymap::resolve_key("ControlLeft"), Some(Key::ControlLeft));
    assert_eq!(keymap::resolve_key("F12"), Some(Key::F12));
    assert_eq!(keymap::resolve_key("Num7"), Some(Key::Num7));
    assert_eq!(keymap::resolve_key("Space"), Some(Key::Space));

    assert_eq!(keymap::resolve_key("altgr"), None);
    assert_eq!(keymap::resolve_key("L"), None);
    assert_eq!(keymap::resolve_key(""), None);
}
