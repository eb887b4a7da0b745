use crate::config::{default_key, default_modifier};

use serde::{Deserialize, Serialize};

/// Push-to-talk hotkey configuration.
///
/// Key names follow the `rdev` naming scheme (`AltGr`, `KeyL`, `F9`,
/// `ControlLeft`, ...). Unknown names are rejected when the combo is
/// resolved at startup, not at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Modifier key that must be held first.
    #[serde(default = "default_modifier")]
    pub modifier: String,

    /// Main key that arms recording while the modifier is held.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            modifier: default_modifier(),
            key: default_key(),
        }
    }
}
