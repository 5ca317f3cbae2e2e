/// Per-frame input snapshot for the fixed control set, plus single-press
/// edge detection against the previous frame.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    ClimbUp,
    ClimbDown,
    /// Enter: start, pause/unpause, back to menu.
    Confirm,
}

const CONTROL_COUNT: usize = 7;

impl Control {
    pub const ALL: [Control; CONTROL_COUNT] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::Jump,
        Control::Attack,
        Control::ClimbUp,
        Control::ClimbDown,
        Control::Confirm,
    ];

    const fn index(self) -> usize {
        match self {
            Control::MoveLeft => 0,
            Control::MoveRight => 1,
            Control::Jump => 2,
            Control::Attack => 3,
            Control::ClimbUp => 4,
            Control::ClimbDown => 5,
            Control::Confirm => 6,
        }
    }
}

/// Key-down state of every control, queried once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    down: [bool; CONTROL_COUNT],
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_down(mut self, control: Control, is_down: bool) -> Self {
        self.set(control, is_down);
        self
    }

    pub fn from_controls(controls: &[Control]) -> Self {
        controls
            .iter()
            .fold(Self::empty(), |snapshot, &control| snapshot.with_down(control, true))
    }

    pub fn set(&mut self, control: Control, is_down: bool) {
        self.down[control.index()] = is_down;
    }

    pub fn is_down(&self, control: Control) -> bool {
        self.down[control.index()]
    }
}

/// The current snapshot paired with the previous one.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    pub current: InputSnapshot,
    pub previous: InputSnapshot,
}

impl InputFrame {
    pub fn new(current: InputSnapshot, previous: InputSnapshot) -> Self {
        Self { current, previous }
    }

    pub fn is_down(&self, control: Control) -> bool {
        self.current.is_down(control)
    }

    /// True only on the first frame the control is held.
    pub fn pressed(&self, control: Control) -> bool {
        self.current.is_down(control) && !self.previous.is_down(control)
    }
}

// ── Key hold tracking ────────────────────────────────────────────────────────

/// Held-key state built from press, repeat and release events, for input
/// sources that report events rather than key state.
///
/// A key counts as held while its last press/repeat is within `hold_window`
/// frames and no release has arrived. A key pressed since the last snapshot
/// is down in the next snapshot even if it was released in between, so a
/// quick tap is never lost.
#[derive(Debug, Clone)]
pub struct HeldKeys<K> {
    last_seen: HashMap<K, u64>,
    pressed_since_snapshot: HashSet<K>,
    hold_window: u64,
}

impl<K: Copy + Eq + Hash> HeldKeys<K> {
    pub fn new(hold_window: u64) -> Self {
        Self {
            last_seen: HashMap::new(),
            pressed_since_snapshot: HashSet::new(),
            hold_window,
        }
    }

    pub fn press(&mut self, key: K, frame: u64) {
        self.last_seen.insert(key, frame);
        self.pressed_since_snapshot.insert(key);
    }

    pub fn repeat(&mut self, key: K, frame: u64) {
        self.last_seen.insert(key, frame);
    }

    pub fn release(&mut self, key: K) {
        self.last_seen.remove(&key);
    }

    pub fn is_held(&self, key: &K, frame: u64) -> bool {
        self.pressed_since_snapshot.contains(key)
            || self
                .last_seen
                .get(key)
                .is_some_and(|&last| frame.saturating_sub(last) <= self.hold_window)
    }

    /// Control state for `frame`, with `keys_of` naming the keys bound to each
    /// control. Starts a new press window.
    pub fn snapshot<'k>(&mut self, frame: u64, keys_of: impl Fn(Control) -> &'k [K]) -> InputSnapshot
    where
        K: 'k,
    {
        let mut input = InputSnapshot::empty();
        for control in Control::ALL {
            let held = keys_of(control).iter().any(|key| self.is_held(key, frame));
            input.set(control, held);
        }
        self.pressed_since_snapshot.clear();
        input
    }
}
