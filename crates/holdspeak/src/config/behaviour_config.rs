use crate::config::default_autostart;

use serde::{Deserialize, Serialize};

/// Application behaviour configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether to launch at login.
    #[serde(default = "default_autostart")]
    pub autostart: bool,
}
