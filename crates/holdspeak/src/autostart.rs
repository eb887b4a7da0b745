//! Launch-at-login management.
//!
//! On Linux this writes or removes an XDG autostart desktop entry. Other
//! platforms are accepted as a no-op so toggling the menu item is safe
//! everywhere.

use tracing::instrument;

use crate::AppResult;

/// Apply the launch-at-login preference to the system.
#[track_caller]
#[instrument]
pub fn apply_launch_on_login(enabled: bool) -> AppResult<()> {
    #[cfg(target_os = "linux")]
    {
        apply_linux(enabled)
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = enabled;
        Ok(())
    }
}

#[cfg(target_os = "linux")]
#[track_caller]
fn apply_linux(enabled: bool) -> AppResult<()> {
    use std::{fs, panic::Location, path::PathBuf};

    use error_location::ErrorLocation;
    use tracing::info;

    use crate::AppError;

    let config_dir = if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(dir)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config")
    } else {
        return Err(AppError::ConfigError {
            reason: "Unable to resolve config directory for autostart".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    let autostart_dir = config_dir.join("autostart");
    let desktop_path = autostart_dir.join("holdspeak.desktop");

    if !enabled {
        if desktop_path.exists() {
            fs::remove_file(&desktop_path)?;
            info!(path = ?desktop_path, "Autostart entry removed");
        }
        return Ok(());
    }

    fs::create_dir_all(&autostart_dir)?;
    let exe = std::env::current_exe()?;
    let exec = exe.to_string_lossy();
    let contents = format!(
        "[Desktop Entry]\nType=Application\nName=HoldSpeak\nExec=\"{exec}\"\nX-GNOME-Autostart-enabled=true\nNoDisplay=true\n"
    );
    fs::write(&desktop_path, contents)?;
    info!(path = ?desktop_path, "Autostart entry written");

    Ok(())
}
