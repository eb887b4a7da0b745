use crate::{HotkeyCombo, HotkeyTracker, KeyEvent, RecordingIntent};

use std::time::SystemTime;

const MODIFIER: u32 = 100;
const MAIN: u32 = 38;

fn press(code: u32) -> KeyEvent<u32> {
    KeyEvent {
        code,
        is_press: true,
        at: SystemTime::now(),
    }
}

fn release(code: u32) -> KeyEvent<u32> {
    KeyEvent {
        code,
        is_press: false,
        at: SystemTime::now(),
    }
}

#[allow(clippy::unwrap_used)]
fn tracker() -> HotkeyTracker<u32> {
    HotkeyTracker::new(HotkeyCombo::new(MODIFIER, MAIN).unwrap())
}

/// WHAT: Chord down while listening and idle emits Start
/// WHY: Core push-to-talk trigger
#[test]
fn given_modifier_held_when_main_pressed_then_start_emitted() {
    // Given: A tracker with the modifier held
    let mut t = tracker();
    assert_eq!(t.on_key_event(&press(MODIFIER), true, true), None);

    // When: The main key goes down
    let intent = t.on_key_event(&press(MAIN), true, true);

    // Then: Exactly one Start, tracker active
    assert_eq!(intent, Some(RecordingIntent::Start));
    assert!(t.state().active);
}

/// WHAT: Main key without the modifier does nothing
/// WHY: Typing the bare letter must never trigger recording
#[test]
fn given_no_modifier_when_main_pressed_then_no_intent() {
    let mut t = tracker();
    assert_eq!(t.on_key_event(&press(MAIN), true, true), None);
    assert!(!t.state().active);
}

/// WHAT: Releasing the modifier first stops once; the later main release is silent
/// WHY: Either release terminates recording, but never twice
#[test]
fn given_active_chord_when_modifier_released_first_then_single_stop() {
    // Given: An active chord
    let mut t = tracker();
    let _ = t.on_key_event(&press(MODIFIER), true, true);
    let _ = t.on_key_event(&press(MAIN), true, true);

    // When: Modifier up, then main up
    let first = t.on_key_event(&release(MODIFIER), true, false);
    let second = t.on_key_event(&release(MAIN), true, false);

    // Then: One Stop total
    assert_eq!(first, Some(RecordingIntent::Stop));
    assert_eq!(second, None);
    assert!(!t.state().active);
}

/// WHAT: Releasing the main key first stops once; the later modifier release is silent
/// WHY: Release ordering is symmetric
#[test]
fn given_active_chord_when_main_released_first_then_single_stop() {
    let mut t = tracker();
    let _ = t.on_key_event(&press(MODIFIER), true, true);
    let _ = t.on_key_event(&press(MAIN), true, true);

    let first = t.on_key_event(&release(MAIN), true, false);
    let second = t.on_key_event(&release(MODIFIER), true, false);

    assert_eq!(first, Some(RecordingIntent::Stop));
    assert_eq!(second, None);
}

/// WHAT: No Start while paused
/// WHY: The tray's pause toggle gates new recordings
#[test]
fn given_not_listening_when_chord_pressed_then_no_start() {
    let mut t = tracker();
    let _ = t.on_key_event(&press(MODIFIER), false, true);
    assert_eq!(t.on_key_event(&press(MAIN), false, true), None);
}

/// WHAT: No Start while the session is not idle
/// WHY: A Start during Active/Finalizing must wait for Idle
#[test]
fn given_session_busy_when_chord_pressed_then_no_start() {
    let mut t = tracker();
    let _ = t.on_key_event(&press(MODIFIER), true, false);
    assert_eq!(t.on_key_event(&press(MAIN), true, false), None);
}

/// WHAT: Re-pressing main while already active does not re-trigger
/// WHY: Key auto-repeat must not spawn a second Start
#[test]
fn given_active_chord_when_main_repeats_then_no_second_start() {
    let mut t = tracker();
    let _ = t.on_key_event(&press(MODIFIER), true, true);
    let _ = t.on_key_event(&press(MAIN), true, true);

    assert_eq!(t.on_key_event(&press(MAIN), true, false), None);
}

/// WHAT: Unrelated keys pass through without effect
/// WHY: The hook forwards every key; non-matching ones must be O(1) no-ops
#[test]
fn given_unrelated_key_when_pressed_and_released_then_ignored() {
    let mut t = tracker();
    assert_eq!(t.on_key_event(&press(7), true, true), None);
    assert_eq!(t.on_key_event(&release(7), true, true), None);
    assert_eq!(t.state(), Default::default());
}

/// WHAT: A combo with identical modifier and main codes is rejected
/// WHY: Such a combo can never be chorded; fail at startup
#[test]
fn given_identical_codes_when_building_combo_then_configuration_error() {
    let result = HotkeyCombo::new(MAIN, MAIN);
    assert!(matches!(
        result,
        Err(crate::CoreError::Configuration { .. })
    ));
}
