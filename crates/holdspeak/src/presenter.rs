//! Recording indicator adapter.
//!
//! Bridges the session's presenter collaborator to the tray icon on the
//! main thread. Session state changes happen on the async runtime, so
//! updates travel through the event loop proxy.

use holdspeak_core::Presenter;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tao::event_loop::EventLoopProxy;
use tracing::warn;

use crate::{TrayCommand, TrayIconState};

/// Tray-backed recording indicator.
pub struct TrayPresenter {
    proxy: EventLoopProxy<TrayCommand>,
    /// Shared with the consumer loop. Read when the indicator is hidden
    /// so the icon returns to Paused rather than Listening when the user
    /// paused detection mid-recording.
    listening: Arc<AtomicBool>,
}

impl TrayPresenter {
    pub fn new(proxy: EventLoopProxy<TrayCommand>, listening: Arc<AtomicBool>) -> Self {
        Self { proxy, listening }
    }

    fn send(&self, state: TrayIconState) {
        // Fails only when the event loop is gone, i.e. during shutdown.
        if let Err(e) = self.proxy.send_event(TrayCommand::SetState(state)) {
            warn!(error = %e, "Tray update dropped, event loop closed");
        }
    }
}

impl Presenter for TrayPresenter {
    fn show_recording_indicator(&self) {
        self.send(TrayIconState::Recording);
    }

    fn hide_recording_indicator(&self) {
        let state = if self.listening.load(Ordering::Acquire) {
            TrayIconState::Listening
        } else {
            TrayIconState::Paused
        };
        self.send(state);
    }
}
