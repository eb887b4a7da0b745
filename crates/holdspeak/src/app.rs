use crate::{
    AppResult, SystemClipboard, TrayCommand, TrayIconState, autostart,
    config::Config, keys::EnigoKeys, presenter::TrayPresenter,
};

use holdspeak_core::{
    CoreError, KeyEvent, RecordingIntent, SessionOutcome, TranscriptionOutcome,
};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tao::event_loop::EventLoopProxy;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::{MenuEvent, MenuId};

use crate::capture::CpalCapture;

type Tracker = holdspeak_core::HotkeyTracker<rdev::Key>;
type Session = holdspeak_core::RecordingSession<CpalCapture, TrayPresenter>;
type Injector = holdspeak_core::TextInjector<SystemClipboard, EnigoKeys>;

/// Main application state.
///
/// Runs on the async runtime thread and owns all dictation state: the
/// hotkey tracker, the recording session, and the transcription manager.
/// Tray icon updates travel back to the main thread via `tray_proxy`
/// because `TrayIcon` is `!Send` and must remain on the UI thread.
pub struct App {
    pub(crate) config: Config,
    pub(crate) tracker: Tracker,
    pub(crate) session: Session,
    pub(crate) manager: holdspeak_core::TranscriptionManager,
    pub(crate) injector: Arc<Mutex<Injector>>,
    pub(crate) listening: Arc<AtomicBool>,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) key_rx: mpsc::Receiver<KeyEvent<rdev::Key>>,
    pub(crate) outcome_rx: mpsc::Receiver<TranscriptionOutcome>,
    pub(crate) pause_menu_id: MenuId,
    pub(crate) autostart_menu_id: MenuId,
    pub(crate) settings_menu_id: MenuId,
    pub(crate) exit_menu_id: MenuId,
    /// A missing API key is reported to the user once, then only logged.
    pub(crate) credential_error_reported: bool,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("HoldSpeak starting");

        // Tray event forwarding via single persistent blocking task.
        //
        // MenuEvent::receiver() returns a crossbeam_channel::Receiver which
        // HAS blocking recv() -- zero polling, instant response, one thread.
        //
        // Shutdown: when tray_event_rx is dropped (main loop breaks),
        // tray_event_tx.blocking_send() fails, breaking the blocking loop.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = self.key_rx.recv() => {
                    self.handle_key_event(&event).await;
                }

                Some(outcome) = self.outcome_rx.recv() => {
                    self.handle_outcome(outcome);
                }

                Some(event) = tray_event_rx.recv() => {
                    match self.handle_tray_event(event) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => error!(error = ?e, "Failed to handle tray event"),
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
        info!("HoldSpeak shut down successfully");

        Ok(())
    }

    /// Feed one key transition through the tracker and act on the intent.
    async fn handle_key_event(&mut self, event: &KeyEvent<rdev::Key>) {
        let listening = self.listening.load(Ordering::Acquire);
        let session_idle = self.session.is_idle();

        match self.tracker.on_key_event(event, listening, session_idle) {
            Some(RecordingIntent::Start) => {
                match self.session.start().await {
                    Ok(true) => debug!("Recording session started"),
                    Ok(false) => {}
                    Err(e) => {
                        error!(error = ?e, "Failed to start recording");
                        notify("Recording failed", &e.to_string());
                    }
                }
            }
            Some(RecordingIntent::Stop) => match self.session.stop().await {
                Ok(Some(SessionOutcome::Completed(audio))) => self.submit(audio),
                Ok(Some(SessionOutcome::Discarded)) => {
                    info!("Recording too short, discarded");
                }
                Ok(None) => {}
                Err(e) => {
                    error!(error = ?e, "Failed to finalize recording");
                    notify("Recording failed", &e.to_string());
                }
            },
            None => {}
        }
    }

    /// Hand finished audio to the transcription manager.
    fn submit(&mut self, audio: holdspeak_core::AudioBlob) {
        match self.manager.submit(audio) {
            Ok(request_id) => {
                debug!(request_id, "Transcription request submitted");
            }
            Err(CoreError::Validation { reason, .. }) => {
                info!(reason, "Audio below minimum size, skipped");
            }
            Err(e @ CoreError::Configuration { .. }) => {
                warn!(error = ?e, "Transcription not configured");
                if !self.credential_error_reported {
                    self.credential_error_reported = true;
                    notify("Transcription not configured", &e.to_string());
                }
            }
            Err(e) => {
                error!(error = ?e, "Failed to submit transcription request");
                notify("Transcription failed", &e.to_string());
            }
        }
    }

    /// React to a completed or failed transcription request.
    ///
    /// Injection runs on a spawned task so a slow paste never blocks the
    /// consumer loop; the injector mutex serializes overlapping insertions.
    fn handle_outcome(&mut self, outcome: TranscriptionOutcome) {
        // The manager's task-side identity check cannot cover an outcome
        // that was already queued when a newer submission bumped the
        // counter; recheck here so a superseded result is never injected.
        let request_id = match &outcome {
            TranscriptionOutcome::Transcribed { request_id, .. }
            | TranscriptionOutcome::Failed { request_id, .. } => *request_id,
        };
        if !self.manager.is_current(request_id) {
            info!(request_id, "Superseded outcome discarded");
            return;
        }

        match outcome {
            TranscriptionOutcome::Transcribed { request_id, text } => {
                info!(request_id, text_len = text.len(), "Transcription complete");

                let injector = Arc::clone(&self.injector);
                let method = self.config.injection.method();

                tokio::task::spawn(async move {
                    let mut injector = injector.lock().await;
                    if let Err(e) = injector.inject(&text, method).await {
                        error!(request_id, error = ?e, "Failed to insert text");
                        notify("Text insertion failed", &e.to_string());
                    }
                });
            }
            TranscriptionOutcome::Failed { request_id, error } => {
                error!(request_id, error = ?error, "Transcription failed");
                notify("Transcription failed", &error.to_string());
            }
        }
    }

    /// Handle tray menu events. Returns `true` when exit was requested.
    #[instrument(skip(self, event))]
    fn handle_tray_event(&mut self, event: MenuEvent) -> AppResult<bool> {
        let event_id = &event.id;

        if *event_id == self.pause_menu_id {
            let now_listening = !self.listening.load(Ordering::Acquire);
            self.listening.store(now_listening, Ordering::Release);
            info!(listening = now_listening, "Hotkey detection toggled");

            // An active recording keeps the red icon; the correct state is
            // restored when the indicator is hidden.
            if self.session.is_idle() {
                let state = if now_listening {
                    TrayIconState::Listening
                } else {
                    TrayIconState::Paused
                };
                let _ = self.tray_proxy.send_event(TrayCommand::SetState(state));
            }
        } else if *event_id == self.autostart_menu_id {
            let enabled = !self.config.behaviour.autostart;
            match autostart::apply_launch_on_login(enabled) {
                Ok(()) => {
                    self.config.behaviour.autostart = enabled;
                    if let Err(e) = self.config.save() {
                        error!(error = ?e, "Failed to persist autostart setting");
                    }
                    info!(enabled, "Start at login updated");
                }
                Err(e) => {
                    error!(error = ?e, "Failed to apply start at login");
                    notify("Start at login failed", &e.to_string());
                    // The checkbox toggled on click; put it back.
                    let _ = self
                        .tray_proxy
                        .send_event(TrayCommand::SetAutostartChecked(
                            self.config.behaviour.autostart,
                        ));
                }
            }
        } else if *event_id == self.settings_menu_id {
            let path = Config::config_path()?;
            let _ = open::that(path);
            info!("Opened settings file");
        } else if *event_id == self.exit_menu_id {
            info!("Exit requested from tray menu");
            return Ok(true);
        }

        Ok(false)
    }
}

/// Desktop notification, best effort. A notification daemon that is
/// missing or broken must never take the dictation loop down with it.
pub(crate) fn notify(summary: &str, body: &str) {
    let result = notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .appname("HoldSpeak")
        .show();

    if let Err(e) = result {
        warn!(error = %e, "Failed to show notification");
    }
}
