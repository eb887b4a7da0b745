/// Tray icon states corresponding to application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Listening for the push-to-talk hotkey.
    Listening,
    /// Currently recording audio.
    Recording,
    /// Hotkey detection paused.
    Paused,
}
