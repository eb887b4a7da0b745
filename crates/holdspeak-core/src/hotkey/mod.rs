//! Push-to-talk hotkey edge detection.
//!
//! Consumes raw key events from a global hook and turns the hold/release
//! pattern of a modifier + main key combination into recording intents.
//! The tracker is pure state: it must only ever be driven from the single
//! consumer loop, which makes the single-writer invariant checkable.

use std::{fmt::Debug, panic::Location, time::SystemTime};

use error_location::ErrorLocation;
use tracing::{debug, trace};

use crate::{CoreError, CoreResult};

/// A raw key transition delivered by the OS-level hook.
///
/// Generic over the hook's key-code type so the tracker can compare codes
/// at O(1) without knowing anything about the hook implementation.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent<K> {
    /// Device key identifier as reported by the hook.
    pub code: K,
    /// `true` for a down event, `false` for a release.
    pub is_press: bool,
    /// When the hook observed the transition.
    pub at: SystemTime,
}

/// The configured modifier + main key pair. Immutable after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyCombo<K> {
    modifier: K,
    main: K,
}

impl<K: Copy + PartialEq + Debug> HotkeyCombo<K> {
    /// Build a combo from two resolved key codes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Configuration`] if both slots name the same
    /// key; a combo that can never be chorded must fail at startup, not
    /// misbehave at runtime.
    #[track_caller]
    pub fn new(modifier: K, main: K) -> CoreResult<Self> {
        if modifier == main {
            return Err(CoreError::Configuration {
                reason: format!("Hotkey modifier and main key are both {:?}", modifier),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self { modifier, main })
    }

    /// The configured modifier key code.
    pub fn modifier(&self) -> K {
        self.modifier
    }

    /// The configured main key code.
    pub fn main(&self) -> K {
        self.main
    }
}

/// Hold state of the hotkey combination.
///
/// `active` is true only while a recording started by this tracker has not
/// yet been stopped; it is what guarantees that releasing both keys, in
/// either order, emits exactly one `Stop`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HotkeyState {
    /// Modifier key currently held down.
    pub modifier_held: bool,
    /// Main key currently held down.
    pub main_held: bool,
    /// A recording triggered by this tracker is in progress.
    pub active: bool,
}

/// Recording intent emitted by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingIntent {
    /// Hotkey chord went down: begin recording.
    Start,
    /// Either key of an active chord was released: finish recording.
    Stop,
}

/// Edge detector over the raw key-event stream.
pub struct HotkeyTracker<K> {
    combo: HotkeyCombo<K>,
    state: HotkeyState,
}

impl<K: Copy + PartialEq + Debug> HotkeyTracker<K> {
    /// Create a tracker for a validated combo.
    pub fn new(combo: HotkeyCombo<K>) -> Self {
        Self {
            combo,
            state: HotkeyState::default(),
        }
    }

    /// Current hold state, for logging and tests.
    pub fn state(&self) -> HotkeyState {
        self.state
    }

    /// Feed one raw key event; returns the intent it produced, if any.
    ///
    /// `listening` gates new recordings (the tray's pause toggle);
    /// `session_idle` prevents re-triggering while a session is still
    /// active or finalizing. Stops are never gated: an active chord must
    /// always be able to terminate its recording.
    pub fn on_key_event(
        &mut self,
        event: &KeyEvent<K>,
        listening: bool,
        session_idle: bool,
    ) -> Option<RecordingIntent> {
        if event.is_press {
            if event.code == self.combo.modifier {
                self.state.modifier_held = true;
                debug!(at = ?event.at, "Hotkey modifier pressed");
                return None;
            }
            if event.code == self.combo.main {
                self.state.main_held = true;
                if self.state.modifier_held && listening && !self.state.active && session_idle {
                    self.state.active = true;
                    debug!("Hotkey chord down, starting recording");
                    return Some(RecordingIntent::Start);
                }
            }
            return None;
        }

        if event.code == self.combo.modifier {
            self.state.modifier_held = false;
            if self.state.active {
                self.state.active = false;
                debug!("Modifier released, stopping recording");
                return Some(RecordingIntent::Stop);
            }
            return None;
        }
        if event.code == self.combo.main {
            self.state.main_held = false;
            if self.state.active {
                self.state.active = false;
                debug!("Main key released, stopping recording");
                return Some(RecordingIntent::Stop);
            }
            return None;
        }

        trace!(code = ?event.code, "Ignored non-hotkey event");
        None
    }
}
