//! Global key hook.
//!
//! rdev's listener delivers every key transition on its own OS-level
//! thread. Events are forwarded into the consumer loop's channel so all
//! state mutation happens on one task; the hook thread itself never
//! touches tracker or session state.

use holdspeak_core::KeyEvent;

use rdev::{Event, EventType, Key};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Spawn the hook thread, forwarding key events into `tx`.
///
/// The thread lives for the rest of the process — rdev's listen loop has
/// no stop handle. When the receiver is gone (shutdown), forwarding fails
/// and events are simply dropped.
pub fn spawn(tx: mpsc::Sender<KeyEvent<Key>>) {
    std::thread::spawn(move || {
        info!("Global key hook starting");
        let result = rdev::listen(move |event| forward(&tx, event));
        if let Err(e) = result {
            // Typically missing input permissions (macOS accessibility,
            // Linux input group membership).
            error!(error = ?e, "Global key hook failed to run");
        }
    });
}

fn forward(tx: &mpsc::Sender<KeyEvent<Key>>, event: Event) {
    let (code, is_press) = match event.event_type {
        EventType::KeyPress(key) => (key, true),
        EventType::KeyRelease(key) => (key, false),
        _ => return,
    };

    let key_event = KeyEvent {
        code,
        is_press,
        at: event.time,
    };

    // try_send: the hook thread must never block behind the consumer loop.
    // A full channel means the loop is badly stalled; dropping a key event
    // beats wedging the OS hook.
    if let Err(e) = tx.try_send(key_event) {
        warn!(error = %e, "Dropped key event, consumer loop not keeping up");
    }
}
