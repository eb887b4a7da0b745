//! System clipboard adapter over arboard.

use holdspeak_core::{ClipboardPort, CoreError, CoreResult};

use std::panic::Location;

use arboard::Clipboard;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

use crate::{AppError, AppResult};

/// arboard-backed implementation of the clipboard collaborator.
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    /// Connect to the system clipboard.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
            reason: format!("Failed to initialize clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("System clipboard initialized");
        Ok(Self { clipboard })
    }
}

impl ClipboardPort for SystemClipboard {
    fn read(&mut self) -> Option<String> {
        // An empty or non-text clipboard reads as absent; both are valid
        // snapshot states for the restore contract.
        match self.clipboard.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(error = %e, "Clipboard unreadable, treating as absent");
                None
            }
        }
    }

    #[track_caller]
    fn write(&mut self, text: &str) -> CoreResult<()> {
        self.clipboard
            .set_text(text)
            .map_err(|e| CoreError::Injection {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
