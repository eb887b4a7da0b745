//! HoldSpeak: push-to-talk dictation with a global hotkey.

mod app;
mod autostart;
mod capture;
mod clipboard;
mod config;
mod error;
mod keyhook;
mod keymap;
mod keys;
mod presenter;
#[cfg(test)]
mod tests;
mod transcribe;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    clipboard::SystemClipboard,
    error::{AppError, Result as AppResult},
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::TrayManager,
};

use crate::{
    capture::CpalCapture,
    config::{Config, HotkeyConfig},
    keys::EnigoKeys,
    presenter::TrayPresenter,
    transcribe::ApiTranscriber,
};

use holdspeak_core::{
    HotkeyTracker, Language, RecordingSession, TextInjector, TranscribeBackend,
    TranscriptionManager,
};

use std::sync::{Arc, atomic::AtomicBool};

use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{Mutex, mpsc};
use tracing::{error, warn};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("holdspeak=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = autostart::apply_launch_on_login(config.behaviour.autostart) {
        warn!(error = ?e, "Failed to apply start-at-login setting");
    }

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new(config.behaviour.autostart) {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Moved into the Init arm exactly once.
    let mut startup_config = Some(config);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetState(state) => {
                        if let Err(e) = tray_manager.update_state(state) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::SetAutostartChecked(checked) => {
                        tray_manager.set_autostart_checked(checked);
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let Some(config) = startup_config.take() else {
                    return;
                };

                let (key_tx, key_rx) = mpsc::channel(128);
                let (outcome_tx, outcome_rx) = mpsc::channel(32);

                // An unresolvable hotkey disables push-to-talk but leaves
                // the tray running so the user can fix the config file.
                let combo = match keymap::resolve_combo(&config.hotkey) {
                    Ok(combo) => {
                        keyhook::spawn(key_tx);
                        combo
                    }
                    Err(e) => {
                        error!(error = ?e, "Hotkey configuration invalid, dictation disabled");
                        // Tray apps have no console; tell the user once.
                        app::notify(
                            "Dictation disabled",
                            &format!("Hotkey configuration is invalid: {}", e),
                        );
                        match keymap::resolve_combo(&HotkeyConfig::default()) {
                            Ok(combo) => combo,
                            Err(e) => {
                                error!(error = ?e, "Default hotkey failed to resolve");
                                std::process::exit(1);
                            }
                        }
                    }
                };

                let listening = Arc::new(AtomicBool::new(true));
                let presenter =
                    TrayPresenter::new(tray_proxy.clone(), Arc::clone(&listening));
                let session = RecordingSession::new(CpalCapture::new(), presenter);

                let language = Language::from_config(&config.transcription.language);
                let transcription_config = config.transcription.clone();
                let manager = TranscriptionManager::new(
                    Box::new(move || {
                        ApiTranscriber::from_config(&transcription_config)
                            .map(|t| Arc::new(t) as Arc<dyn TranscribeBackend>)
                    }),
                    language,
                    outcome_tx,
                );

                let clipboard = match SystemClipboard::new() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to initialize clipboard: {:?}", e);
                        std::process::exit(1);
                    }
                };
                let injector = Arc::new(Mutex::new(TextInjector::with_char_delay(
                    clipboard,
                    EnigoKeys,
                    std::time::Duration::from_millis(config.injection.char_delay_ms),
                )));

                let app = App {
                    config,
                    tracker: HotkeyTracker::new(combo),
                    session,
                    manager,
                    injector,
                    listening,
                    tray_proxy: tray_proxy.clone(),
                    key_rx,
                    outcome_rx,
                    pause_menu_id: tray_manager.pause_item_id().clone(),
                    autostart_menu_id: tray_manager.autostart_item_id().clone(),
                    settings_menu_id: tray_manager.settings_item_id().clone(),
                    exit_menu_id: tray_manager.exit_item_id().clone(),
                    credential_error_reported: false,
                };

                // Spawn tokio runtime on separate thread.
                // TrayManager stays on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        if let Err(e) = app.run().await {
                            error!(error = ?e, "App error");
                        }
                    });
                });
            }
            _ => {}
        }
    });
}
