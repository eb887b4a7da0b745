//! Configured key-name resolution.
//!
//! Config files name keys the way rdev does ("AltGr", "KeyL", "F9", ...).
//! Resolution happens once at startup; an unknown name is a configuration
//! error that disables the hotkey feature, it never limps along.

use holdspeak_core::{CoreError, CoreResult, HotkeyCombo};

use std::panic::Location;

use error_location::ErrorLocation;
use rdev::Key;

use crate::config::HotkeyConfig;

/// Resolve the configured combo into a validated [`HotkeyCombo`].
///
/// # Errors
///
/// [`CoreError::Configuration`] when either name is unknown or both name
/// the same key.
#[track_caller]
pub fn resolve_combo(config: &HotkeyConfig) -> CoreResult<HotkeyCombo<Key>> {
    let modifier = resolve_key(&config.modifier).ok_or_else(|| CoreError::Configuration {
        reason: format!("Unknown hotkey modifier: {:?}", config.modifier),
        location: ErrorLocation::from(Location::caller()),
    })?;
    let main = resolve_key(&config.key).ok_or_else(|| CoreError::Configuration {
        reason: format!("Unknown hotkey key: {:?}", config.key),
        location: ErrorLocation::from(Location::caller()),
    })?;
    HotkeyCombo::new(modifier, main)
}

/// Map a configured key name to an rdev key identifier.
///
/// Covers the keys that make sense in a push-to-talk chord; anything else
/// resolves to `None`.
pub fn resolve_key(name: &str) -> Option<Key> {
    let key = match name {
        "Alt" => Key::Alt,
        "AltGr" => Key::AltGr,
        "ControlLeft" => Key::ControlLeft,
        "ControlRight" => Key::ControlRight,
        "ShiftLeft" => Key::ShiftLeft,
        "ShiftRight" => Key::ShiftRight,
        "MetaLeft" => Key::MetaLeft,
        "MetaRight" => Key::MetaRight,
        "Space" => Key::Space,
        "Tab" => Key::Tab,
        "CapsLock" => Key::CapsLock,
        "Escape" => Key::Escape,
        "Home" => Key::Home,
        "End" => Key::End,
        "Insert" => Key::Insert,
        "F1" => Key::F1,
        "F2" => Key::F2,
        "F3" => Key::F3,
        "F4" => Key::F4,
        "F5" => Key::F5,
        "F6" => Key::F6,
        "F7" => Key::F7,
        "F8" => Key::F8,
        "F9" => Key::F9,
        "F10" => Key::F10,
        "F11" => Key::F11,
        "F12" => Key::F12,
        "KeyA" => Key::KeyA,
        "KeyB" => Key::KeyB,
        "KeyC" => Key::KeyC,
        "KeyD" => Key::KeyD,
        "KeyE" => Key::KeyE,
        "KeyF" => Key::KeyF,
        "KeyG" => Key::KeyG,
        "KeyH" => Key::KeyH,
        "KeyI" => Key::KeyI,
        "KeyJ" => Key::KeyJ,
        "KeyK" => Key::KeyK,
        "KeyL" => Key::KeyL,
        "KeyM" => Key::KeyM,
        "KeyN" => Key::KeyN,
        "KeyO" => Key::KeyO,
        "KeyP" => Key::KeyP,
        "KeyQ" => Key::KeyQ,
        "KeyR" => Key::KeyR,
        "KeyS" => Key::KeyS,
        "KeyT" => Key::KeyT,
        "KeyU" => Key::KeyU,
        "KeyV" => Key::KeyV,
        "KeyW" => Key::KeyW,
        "KeyX" => Key::KeyX,
        "KeyY" => Key::KeyY,
        "KeyZ" => Key::KeyZ,
        "Num0" => Key::Num0,
        "Num1" => Key::Num1,
        "Num2" => Key::Num2,
        "Num3" => Key::Num3,
        "Num4" => Key::Num4,
        "Num5" => Key::Num5,
        "Num6" => Key::Num6,
        "Num7" => Key::Num7,
        "Num8" => Key::Num8,
        "Num9" => Key::Num9,
        _ => return None,
    };
    Some(key)
}
