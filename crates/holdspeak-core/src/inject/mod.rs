//! Text injection into the focused application.
//!
//! Two interchangeable strategies: clipboard paste (default) and
//! per-character keystrokes. The clipboard strategy snapshots the previous
//! clipboard text and restores it through an RAII guard, so restoration
//! runs on every exit path — including a failed paste.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::CoreResult;

/// Wait after the hotkey release before injecting, so focus lands back on
/// the target window once any overlay is gone.
pub const FOCUS_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Gap between the clipboard write and the paste chord; gives the OS
/// clipboard manager time to observe the new content.
pub const CLIPBOARD_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Gap between the paste chord and snapshot restoration; pasting from a
/// clipboard we are about to overwrite would race the target application.
pub const CLIPBOARD_RESTORE_DELAY: Duration = Duration::from_millis(100);

/// Default pause between characters in the keystroke strategy.
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(10);

/// How transcribed text reaches the focused application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectionMethod {
    /// Write to the clipboard, send the OS paste chord, restore the
    /// previous clipboard content.
    #[default]
    Clipboard,
    /// Send each character individually. Slower, but works on surfaces
    /// that reject paste or where clipboard mutation is undesirable.
    Keystroke,
}

/// Clipboard collaborator. A single global resource; callers serialize.
pub trait ClipboardPort: Send {
    /// Current clipboard text. `None` when absent or unreadable — both are
    /// valid snapshot states, not errors.
    fn read(&mut self) -> Option<String>;
    /// Replace the clipboard text.
    fn write(&mut self, text: &str) -> CoreResult<()>;
}

/// OS-level input synthesis collaborator.
#[async_trait]
pub trait KeystrokePort: Send {
    /// Send the platform paste chord (Cmd+V / Ctrl+V).
    async fn send_paste(&mut self) -> CoreResult<()>;
    /// Type a single character.
    async fn send_char(&mut self, c: char) -> CoreResult<()>;
}

/// Restores the captured clipboard snapshot when dropped.
///
/// Guaranteed-release contract: acquiring the guard takes the snapshot,
/// and drop puts it back whether the injection in between succeeded,
/// failed, or panicked. Restoration itself is best-effort — a failed
/// restore is logged, nothing more can be done with a dead clipboard.
struct ClipboardRestoreGuard<'a, C: ClipboardPort> {
    port: &'a mut C,
    snapshot: Option<String>,
}

impl<'a, C: ClipboardPort> ClipboardRestoreGuard<'a, C> {
    fn acquire(port: &'a mut C) -> Self {
        let snapshot = port.read();
        debug!(had_snapshot = snapshot.is_some(), "Clipboard snapshot taken");
        Self { port, snapshot }
    }

    fn write(&mut self, text: &str) -> CoreResult<()> {
        self.port.write(text)
    }
}

impl<C: ClipboardPort> Drop for ClipboardRestoreGuard<'_, C> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            if let Err(e) = self.port.write(&snapshot) {
                warn!(error = %e, "Failed to restore clipboard snapshot");
            } else {
                debug!("Clipboard snapshot restored");
            }
        }
    }
}

/// Injects final text into whatever currently has input focus.
///
/// Concurrent invocations are not supported; the consumer loop serializes
/// injections behind a mutex.
pub struct TextInjector<C, K> {
    clipboard: C,
    keys: K,
    char_delay: Duration,
}

impl<C: ClipboardPort, K: KeystrokePort> TextInjector<C, K> {
    /// Create an injector with the default inter-character delay.
    pub fn new(clipboard: C, keys: K) -> Self {
        Self::with_char_delay(clipboard, keys, DEFAULT_CHAR_DELAY)
    }

    /// Create an injector with a configured inter-character delay.
    pub fn with_char_delay(clipboard: C, keys: K, char_delay: Duration) -> Self {
        Self {
            clipboard,
            keys,
            char_delay,
        }
    }

    /// Inject `text` using the chosen strategy.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Injection`](crate::CoreError::Injection)-class
    /// failures from the collaborators. Callers log these; they are never
    /// fatal to the orchestration — a failed injection just means the user
    /// dictates again.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn inject(&mut self, text: &str, method: InjectionMethod) -> CoreResult<()> {
        if text.is_empty() {
            debug!("Nothing to inject");
            return Ok(());
        }

        tokio::time::sleep(FOCUS_SETTLE_DELAY).await;

        match method {
            InjectionMethod::Clipboard => self.inject_via_clipboard(text).await?,
            InjectionMethod::Keystroke => self.inject_via_keystrokes(text).await?,
        }

        info!(chars = text.chars().count(), ?method, "Text injected");
        Ok(())
    }

    async fn inject_via_clipboard(&mut self, text: &str) -> CoreResult<()> {
        let mut guard = ClipboardRestoreGuard::acquire(&mut self.clipboard);
        guard.write(text)?;

        tokio::time::sleep(CLIPBOARD_SETTLE_DELAY).await;
        let pasted = self.keys.send_paste().await;
        tokio::time::sleep(CLIPBOARD_RESTORE_DELAY).await;

        drop(guard);
        pasted
    }

    async fn inject_via_keystrokes(&mut self, text: &str) -> CoreResult<()> {
        for c in text.chars() {
            self.keys.send_char(c).await?;
            if !self.char_delay.is_zero() {
                tokio::time::sleep(self.char_delay).await;
            }
        }
        Ok(())
    }
}
