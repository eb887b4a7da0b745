//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with three states (Listening, Recording,
//! Paused) and a context menu for pausing detection, toggling start at
//! login, opening the config file, and exiting.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    pause_item: MenuItem,
    autostart_item: CheckMenuItem,
    settings_item_id: MenuId,
    exit_item_id: MenuId,
}

impl TrayManager {
    /// Create a new tray manager with initial state.
    #[track_caller]
    #[instrument]
    pub fn new(autostart_enabled: bool) -> AppResult<Self> {
        let menu = Menu::new();

        let pause_item = MenuItem::new("Pause listening", true, None);
        let autostart_item = CheckMenuItem::new("Start at login", true, autostart_enabled, None);
        let settings_item = MenuItem::new("Settings", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let settings_id = settings_item.id().clone();
        let exit_id = exit_item.id().clone();

        let append_err = |e: tray_icon::menu::Error| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        };

        menu.append(&pause_item).map_err(append_err)?;
        menu.append(&autostart_item).map_err(append_err)?;
        menu.append(&PredefinedMenuItem::separator())
            .map_err(append_err)?;
        menu.append(&settings_item).map_err(append_err)?;
        menu.append(&exit_item).map_err(append_err)?;

        let icon = Self::load_icon(TrayIconState::Listening)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip("HoldSpeak - Listening")
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            pause_item,
            autostart_item,
            settings_item_id: settings_id,
            exit_item_id: exit_id,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    ///
    /// The pause menu label follows the state so the same entry reads
    /// "Pause listening" while active and "Resume listening" while paused.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        let (icon, tooltip) = match state {
            TrayIconState::Listening => (Self::load_icon(state)?, "HoldSpeak - Listening"),
            TrayIconState::Recording => (Self::load_icon(state)?, "HoldSpeak - Recording..."),
            TrayIconState::Paused => (Self::load_icon(state)?, "HoldSpeak - Paused"),
        };

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(tooltip))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        match state {
            TrayIconState::Paused => self.pause_item.set_text("Resume listening"),
            _ => self.pause_item.set_text("Pause listening"),
        }

        Ok(())
    }

    /// Load icon from compile-time embedded PNG bytes.
    ///
    /// Icons are embedded via include_bytes! so they work regardless of
    /// install location — no hardcoded filesystem paths.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Listening => include_bytes!("../resources/icons/listening.png"),
            TrayIconState::Recording => include_bytes!("../resources/icons/recording.png"),
            TrayIconState::Paused => include_bytes!("../resources/icons/paused.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Set the autostart checkbox without emitting a menu event.
    pub fn set_autostart_checked(&self, checked: bool) {
        self.autostart_item.set_checked(checked);
    }

    /// Get the pause/resume menu item ID.
    pub fn pause_item_id(&self) -> &MenuId {
        self.pause_item.id()
    }

    /// Get the start-at-login menu item ID.
    pub fn autostart_item_id(&self) -> &MenuId {
        self.autostart_item.id()
    }

    /// Get the settings menu item ID.
    pub fn settings_item_id(&self) -> &MenuId {
        &self.settings_item_id
    }

    /// Get the exit menu item ID.
    pub fn exit_item_id(&self) -> &MenuId {
        &self.exit_item_id
    }
}
