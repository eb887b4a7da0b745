//! Keystroke synthesis adapter over enigo.
//!
//! Implements the paste chord and per-character typing for the injector.
//! enigo operations are synchronous and involve small sleeps for key
//! event timing, so each call runs inside `spawn_blocking`.

use holdspeak_core::{CoreError, CoreResult, KeystrokePort};

use std::{panic::Location, time::Duration};

use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use error_location::ErrorLocation;
use tracing::debug;

/// Delay between key events in the paste chord. Some applications and
/// input method editors need a small gap between press, click and
/// release to register events correctly.
const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// Returns the platform-specific paste modifier key.
///
/// macOS uses Cmd (Meta), Windows and Linux use Ctrl.
fn paste_modifier() -> Key {
    #[cfg(target_os = "macos")]
    {
        Key::Meta
    }
    #[cfg(not(target_os = "macos"))]
    {
        Key::Control
    }
}

/// RAII guard that guarantees the paste modifier key is released when
/// dropped, even if the operation between press and release fails or
/// panics. Without this, a failure after pressing the modifier would
/// leave it stuck and the keyboard unusable.
struct PasteKeyGuard {
    enigo: Enigo,
    modifier: Key,
}

impl PasteKeyGuard {
    #[track_caller]
    fn new() -> CoreResult<Self> {
        let modifier = paste_modifier();

        let mut enigo = Enigo::new(&Settings::default()).map_err(|e| CoreError::Injection {
            reason: format!("Failed to create Enigo: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        enigo
            .key(modifier, Direction::Press)
            .map_err(|e| CoreError::Injection {
                reason: format!("Failed to press paste modifier: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { enigo, modifier })
    }

    fn enigo_mut(&mut self) -> &mut Enigo {
        &mut self.enigo
    }
}

impl Drop for PasteKeyGuard {
    fn drop(&mut self) {
        // Best-effort: if the release fails, the OS resets modifier state
        // on the user's next physical key press.
        let _ = self.enigo.key(self.modifier, Direction::Release);
    }
}

/// enigo-backed implementation of the keystroke collaborator.
///
/// A fresh `Enigo` is created inside each `spawn_blocking` call: enigo is
/// not `Send`, the closure must be `'static + Send`, and `Enigo::new()`
/// carries no heavy platform initialization.
#[derive(Default)]
pub struct EnigoKeys;

#[async_trait]
impl KeystrokePort for EnigoKeys {
    async fn send_paste(&mut self) -> CoreResult<()> {
        let result = tokio::task::spawn_blocking(|| {
            let mut guard = PasteKeyGuard::new()?;

            std::thread::sleep(KEY_EVENT_DELAY);

            guard
                .enigo_mut()
                .key(Key::Unicode('v'), Direction::Click)
                .map_err(|e| CoreError::Injection {
                    reason: format!("Failed to press V: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            std::thread::sleep(KEY_EVENT_DELAY);

            // Guard drops here, releasing the modifier.
            Ok::<(), CoreError>(())
        })
        .await
        .map_err(|e| CoreError::Injection {
            reason: format!("Paste task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        result?;
        debug!("Paste chord sent");
        Ok(())
    }

    async fn send_char(&mut self, c: char) -> CoreResult<()> {
        tokio::task::spawn_blocking(move || {
            let mut enigo = Enigo::new(&Settings::default()).map_err(|e| CoreError::Injection {
                reason: format!("Failed to create Enigo: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            enigo
                .key(Key::Unicode(c), Direction::Click)
                .map_err(|e| CoreError::Injection {
                    reason: format!("Failed to type {:?}: {}", c, e),
                    location: ErrorLocation::from(Location::caller()),
                })
        })
        .await
        .map_err(|e| CoreError::Injection {
            reason: format!("Typing task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?
    }
}
