/// Animation-frame selection driven by simulation ticks.
///
/// A frame index is `(ticks_since_action_start / ticks_per_frame) mod len`.
/// Looping tracks (walking, climbing, hostiles) cycle forever; one-shot
/// tracks (attacking, delivering) carry extra guard frames and report
/// completion when they reach their terminal index.

use serde::{Deserialize, Serialize};

/// The four mutually exclusive player animation branches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Standing or walking. Frame 0 is the idle pose.
    #[default]
    Walk,
    Attack,
    Climb,
    Deliver,
}

/// Length of a one-shot track: `frame_count` drawable frames followed by
/// `guard` frames, the last of which signals completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneShotSpec {
    pub frame_count: u32,
    pub guard: u32,
}

impl OneShotSpec {
    pub fn cycle_len(self) -> u32 {
        self.frame_count + self.guard
    }

    pub fn terminal_index(self) -> u32 {
        self.cycle_len().saturating_sub(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OneShotFrame {
    Playing(u32),
    Finished,
}

pub fn cycle_index(elapsed_ticks: u64, ticks_per_frame: u32, len: u32) -> u32 {
    let per_frame = u64::from(ticks_per_frame.max(1));
    ((elapsed_ticks / per_frame) % u64::from(len.max(1))) as u32
}

/// Frame `1..=frame_count` of a looping track.
pub fn looping_frame(elapsed_ticks: u64, ticks_per_frame: u32, frame_count: u32) -> u32 {
    cycle_index(elapsed_ticks, ticks_per_frame, frame_count) + 1
}

pub fn one_shot_frame(elapsed_ticks: u64, ticks_per_frame: u32, spec: OneShotSpec) -> OneShotFrame {
    let index = cycle_index(elapsed_ticks, ticks_per_frame, spec.cycle_len());
    if index == spec.terminal_index() {
        OneShotFrame::Finished
    } else {
        OneShotFrame::Playing(index)
    }
}

/// Which track is active, when it started, and the frame last selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Animator {
    pub track: Track,
    pub started_at: u64,
    pub frame: u32,
}

impl Animator {
    /// Switch tracks, restarting the clock only if the track actually changes.
    pub fn switch_to(&mut self, track: Track, tick: u64) {
        if self.track != track {
            self.restart(track, tick);
        }
    }

    pub fn restart(&mut self, track: Track, tick: u64) {
        self.track = track;
        self.started_at = tick;
        self.frame = 0;
    }

    pub fn elapsed(&self, tick: u64) -> u64 {
        tick.saturating_sub(self.started_at)
    }
}
