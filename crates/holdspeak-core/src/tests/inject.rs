use crate::{ClipboardPort, CoreError, CoreResult, InjectionMethod, KeystrokePort, TextInjector};

use std::{
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use error_location::ErrorLocation;

/// In-memory clipboard; `None` models an empty or unreadable clipboard.
#[derive(Clone)]
struct FakeClipboard {
    content: Arc<Mutex<Option<String>>>,
    fail_writes: bool,
}

impl FakeClipboard {
    fn holding(text: &str) -> Self {
        Self {
            content: Arc::new(Mutex::new(Some(text.to_owned()))),
            fail_writes: false,
        }
    }

    fn empty() -> Self {
        Self {
            content: Arc::new(Mutex::new(None)),
            fail_writes: false,
        }
    }

    fn text(&self) -> Option<String> {
        self.content.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ClipboardPort for FakeClipboard {
    fn read(&mut self) -> Option<String> {
        self.text()
    }

    fn write(&mut self, text: &str) -> CoreResult<()> {
        if self.fail_writes {
            return Err(CoreError::Injection {
                reason: "clipboard unavailable".into(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        *self.content.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_owned());
        Ok(())
    }
}

/// Records paste chords and typed characters; paste observes whatever the
/// clipboard holds at chord time, like a real target application would.
#[derive(Clone)]
struct FakeKeys {
    clipboard: FakeClipboard,
    pasted: Arc<Mutex<Vec<Option<String>>>>,
    typed: Arc<Mutex<String>>,
    paste_count: Arc<AtomicUsize>,
    fail_paste: bool,
}

impl FakeKeys {
    fn observing(clipboard: &FakeClipboard) -> Self {
        Self {
            clipboard: clipboard.clone(),
            pasted: Arc::new(Mutex::new(Vec::new())),
            typed: Arc::new(Mutex::new(String::new())),
            paste_count: Arc::new(AtomicUsize::new(0)),
            fail_paste: false,
        }
    }
}

#[async_trait]
impl KeystrokePort for FakeKeys {
    async fn send_paste(&mut self) -> CoreResult<()> {
        self.paste_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_paste {
            return Err(CoreError::Injection {
                reason: "paste chord rejected".into(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.pasted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(self.clipboard.text());
        Ok(())
    }

    async fn send_char(&mut self, c: char) -> CoreResult<()> {
        self.typed.lock().unwrap_or_else(|e| e.into_inner()).push(c);
        Ok(())
    }
}

/// WHAT: Clipboard strategy pastes the text and restores the old content
/// WHY: The clipboard is borrowed, never stolen
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_prior_clipboard_when_injecting_then_pasted_and_restored() {
    // Given: A clipboard holding user content
    let clipboard = FakeClipboard::holding("user's stuff");
    let keys = FakeKeys::observing(&clipboard);
    let mut injector = TextInjector::new(clipboard.clone(), keys.clone());

    // When: Injecting via clipboard
    injector
        .inject("hello world", InjectionMethod::Clipboard)
        .await
        .unwrap();

    // Then: The paste saw the new text, and the old content is back
    let pasted = keys.pasted.lock().unwrap();
    assert_eq!(pasted.as_slice(), [Some("hello world".to_owned())]);
    assert_eq!(clipboard.text().as_deref(), Some("user's stuff"));
}

/// WHAT: Restoration runs even when the paste chord fails
/// WHY: Guaranteed-release contract, not best-effort cleanup
#[tokio::test(start_paused = true)]
async fn given_failing_paste_when_injecting_then_clipboard_still_restored() {
    let clipboard = FakeClipboard::holding("precious");
    let mut keys = FakeKeys::observing(&clipboard);
    keys.fail_paste = true;
    let mut injector = TextInjector::new(clipboard.clone(), keys.clone());

    let result = injector.inject("lost text", InjectionMethod::Clipboard).await;

    assert!(matches!(result, Err(CoreError::Injection { .. })));
    assert_eq!(clipboard.text().as_deref(), Some("precious"));
}

/// WHAT: Repeated injections leave the clipboard exactly as it started
/// WHY: The restoration invariant holds across whole sequences
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_injection_sequence_when_done_then_original_clipboard_content() {
    let clipboard = FakeClipboard::holding("original");
    let keys = FakeKeys::observing(&clipboard);
    let mut injector = TextInjector::new(clipboard.clone(), keys.clone());

    injector
        .inject("first", InjectionMethod::Clipboard)
        .await
        .unwrap();
    injector
        .inject("second", InjectionMethod::Clipboard)
        .await
        .unwrap();

    assert_eq!(clipboard.text().as_deref(), Some("original"));
    assert_eq!(keys.paste_count.load(Ordering::SeqCst), 2);
}

/// WHAT: An absent snapshot is valid; nothing is restored over the paste
/// WHY: An empty clipboard is a snapshot state, not an error
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_empty_clipboard_when_injecting_then_no_restore_attempted() {
    let clipboard = FakeClipboard::empty();
    let keys = FakeKeys::observing(&clipboard);
    let mut injector = TextInjector::new(clipboard.clone(), keys.clone());

    injector
        .inject("fresh", InjectionMethod::Clipboard)
        .await
        .unwrap();

    // With nothing to restore, the injected text remains on the clipboard
    assert_eq!(clipboard.text().as_deref(), Some("fresh"));
}

/// WHAT: A failed clipboard write aborts without pasting
/// WHY: Never send a paste chord for content that was not written
#[tokio::test(start_paused = true)]
async fn given_unwritable_clipboard_when_injecting_then_error_and_no_paste() {
    let mut clipboard = FakeClipboard::holding("safe");
    clipboard.fail_writes = true;
    let keys = FakeKeys::observing(&clipboard);
    let mut injector = TextInjector::new(clipboard, keys.clone());

    let result = injector.inject("text", InjectionMethod::Clipboard).await;

    assert!(matches!(result, Err(CoreError::Injection { .. })));
    assert_eq!(keys.paste_count.load(Ordering::SeqCst), 0);
}

/// WHAT: Keystroke strategy types every character in order
/// WHY: The fallback for surfaces that reject paste
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_keystroke_method_when_injecting_then_chars_sent_in_order() {
    let clipboard = FakeClipboard::empty();
    let keys = FakeKeys::observing(&clipboard);
    let mut injector =
        TextInjector::with_char_delay(clipboard.clone(), keys.clone(), Duration::from_millis(10));

    injector
        .inject("héllo!", InjectionMethod::Keystroke)
        .await
        .unwrap();

    assert_eq!(keys.typed.lock().unwrap().as_str(), "héllo!");
    // The clipboard was never touched
    assert_eq!(clipboard.text(), None);
}
