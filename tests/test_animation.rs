use pizza_dash::animation::*;
use pizza_dash::input::{Control, HeldKeys, InputFrame, InputSnapshot};

#[test]
fn looping_frames_are_one_based_and_wrap() {
    assert_eq!(looping_frame(0, 6, 7), 1);
    assert_eq!(looping_frame(5, 6, 7), 1);
    assert_eq!(looping_frame(6, 6, 7), 2);
    assert_eq!(looping_frame(41, 6, 7), 7);
    assert_eq!(looping_frame(42, 6, 7), 1);
}

#[test]
fn zero_ticks_per_frame_does_not_divide_by_zero() {
    assert_eq!(cycle_index(5, 0, 3), 2);
    assert_eq!(cycle_index(5, 1, 0), 0);
}

#[test]
fn one_shot_finishes_at_terminal_index() {
    let spec = OneShotSpec {
        frame_count: 3,
        guard: 1,
    };
    assert_eq!(spec.terminal_index(), 3);
    assert_eq!(one_shot_frame(0, 6, spec), OneShotFrame::Playing(0));
    assert_eq!(one_shot_frame(12, 6, spec), OneShotFrame::Playing(2));
    assert_eq!(one_shot_frame(17, 6, spec), OneShotFrame::Playing(2));
    assert_eq!(one_shot_frame(18, 6, spec), OneShotFrame::Finished);
}

#[test]
fn switch_to_same_track_keeps_start() {
    let mut animator = Animator::default();
    animator.restart(Track::Walk, 10);
    animator.switch_to(Track::Walk, 25);
    assert_eq!(animator.started_at, 10);
    assert_eq!(animator.elapsed(25), 15);

    animator.switch_to(Track::Climb, 30);
    assert_eq!(animator.track, Track::Climb);
    assert_eq!(animator.elapsed(30), 0);
}

// ── Input edges ───────────────────────────────────────────────────────────────

#[test]
fn pressed_only_on_first_frame() {
    let jump = InputSnapshot::from_controls(&[Control::Jump]);
    let first = InputFrame::new(jump, InputSnapshot::empty());
    let second = InputFrame::new(jump, jump);

    assert!(first.pressed(Control::Jump));
    assert!(!second.pressed(Control::Jump));
    assert!(second.is_down(Control::Jump));
    assert!(!first.is_down(Control::Attack));
}

// ── Held keys ─────────────────────────────────────────────────────────────────

fn keys_of(control: Control) -> &'static [char] {
    match control {
        Control::Jump => &['k', ' '],
        Control::Confirm => &['\n'],
        _ => &[],
    }
}

#[test]
fn tap_released_before_the_snapshot_still_registers() {
    let mut keys = HeldKeys::new(8);
    keys.press('k', 1);
    keys.release('k');

    let first = keys.snapshot(1, keys_of);
    assert!(first.is_down(Control::Jump));
    let second = keys.snapshot(2, keys_of);
    assert!(!second.is_down(Control::Jump));
    assert!(InputFrame::new(first, InputSnapshot::empty()).pressed(Control::Jump));
}

#[test]
fn held_key_expires_after_hold_window_without_repeats() {
    let mut keys = HeldKeys::new(8);
    keys.press('\n', 10);
    assert!(keys.snapshot(10, keys_of).is_down(Control::Confirm));
    assert!(keys.snapshot(18, keys_of).is_down(Control::Confirm));
    assert!(!keys.snapshot(19, keys_of).is_down(Control::Confirm));

    keys.repeat('\n', 19);
    assert!(keys.snapshot(20, keys_of).is_down(Control::Confirm));
}

#[test]
fn release_of_an_earlier_press_takes_effect_at_once() {
    let mut keys = HeldKeys::new(8);
    keys.press(' ', 1);
    assert!(keys.snapshot(1, keys_of).is_down(Control::Jump));
    keys.release(' ');
    assert!(!keys.is_held(&' ', 2));
    assert!(!keys.snapshot(2, keys_of).is_down(Control::Jump));
}
