/// The game state machine and the single per-frame entry point.
///
/// `simulate_frame` is the only function that mutates a `GameSession`; the
/// renderer, audio and input collaborators see the `RenderableState` it
/// returns and nothing else.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::animation::{cycle_index, looping_frame, Track};
use crate::combat::resolve_combat;
use crate::config::GameConfig;
use crate::entities::{Direction, GameState, HostileKind, Player, StructureKind, Tint};
use crate::events::{GameEvent, LifeLostCause};
use crate::geometry::{Hitbox, HitboxRole, Rect};
use crate::input::{Control, InputFrame, InputSnapshot};
use crate::level::{LevelError, LevelSource};
use crate::player::update_player;
use crate::session::LevelSession;

/// Elapsed time never stands still: a zero delta counts as this much.
pub const MIN_FRAME_DELTA: Duration = Duration::from_millis(1);

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to load level {level}: {source}")]
    LevelLoad {
        level: u32,
        #[source]
        source: LevelError,
    },
}

/// Monotonic clocks. `tick` counts every simulated frame; `play_tick` only
/// frames that ran gameplay, so pausing freezes animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    pub tick: u64,
    pub play_tick: u64,
    pub elapsed: Duration,
}

pub struct GameSession {
    pub config: GameConfig,
    pub state: GameState,
    pub timer: u32,
    pub score: u32,
    pub current_level: u32,
    pub loop_count: u32,
    pub is_paused: bool,
    pub player: Player,
    pub level: LevelSession,
    pub camera_x: i32,
    clock: FrameClock,
    loading_elapsed: Duration,
    previous_input: InputSnapshot,
    levels: Box<dyn LevelSource>,
    rng: StdRng,
}

impl GameSession {
    /// A session sitting at the menu with nothing loaded.
    pub fn new(config: GameConfig, levels: Box<dyn LevelSource>) -> Self {
        let spawn = Rect::new(0, config.ground_y, config.player.width, config.player.height);
        let player = Player::new(spawn, config.session.starting_lives, &config);
        let rng = StdRng::seed_from_u64(config.session.rng_seed);
        Self {
            config,
            state: GameState::Menu,
            timer: 0,
            score: 0,
            current_level: 0,
            loop_count: 0,
            is_paused: false,
            player,
            level: LevelSession::new(),
            camera_x: 0,
            clock: FrameClock::default(),
            loading_elapsed: Duration::ZERO,
            previous_input: InputSnapshot::empty(),
            levels,
            rng,
        }
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    pub fn loading_elapsed(&self) -> Duration {
        self.loading_elapsed
    }

    /// Build the level session for `level` and put a fresh player at its
    /// spawn. On error nothing is changed.
    fn load_level(&mut self, level: u32) -> Result<(), GameError> {
        let records = self
            .levels
            .load(level)
            .map_err(|source| GameError::LevelLoad { level, source })?;
        let report = self.level.load(&records, &self.config);
        if report.skipped > 0 {
            warn!(level, skipped = report.skipped, "level_placements_skipped");
        }
        self.player = Player::new(self.level.spawn(), self.player.lives, &self.config);
        Ok(())
    }

    /// Read-only view for the render and audio collaborators.
    pub fn renderable(&self, events: Vec<GameEvent>) -> RenderableState {
        let anim = &self.config.animation;
        let hostile_frame = looping_frame(self.clock.play_tick, anim.ticks_per_frame, anim.hostile_frames);
        let loading_ticks = self.loading_elapsed.as_millis() as u64;
        let loading_frame = cycle_index(loading_ticks / 100, 1, anim.loading_frames) + 1;
        let player = &self.player;
        let level_width = self.level.level_width();

        RenderableState {
            state: self.state,
            is_paused: self.is_paused,
            score: self.score,
            timer: self.timer,
            lives: self.player.lives,
            current_level: self.current_level,
            loop_count: self.loop_count,
            camera_x: self.camera_x,
            level_width,
            objectives_remaining: self.level.objectives_remaining(),
            loading_frame,
            player: PlayerView {
                rect: player.body.rect,
                facing: player.body.facing,
                track: player.animation.track,
                frame: player.animation.frame,
                health: player.body.current_health,
                total_health: player.body.total_health,
                tint: player.body.tint,
                visible: player.is_visible(),
                attack_box: player.attack_box,
            },
            hostiles: self
                .level
                .hostiles()
                .iter()
                .filter(|h| h.is_active())
                .map(|h| HostileView {
                    rect: h.body.rect,
                    facing: h.body.facing,
                    kind: h.kind,
                    health: h.body.current_health,
                    tint: h.body.tint,
                    frame: hostile_frame,
                })
                .collect(),
            structures: self
                .level
                .structures()
                .iter()
                .map(|s| StructureView {
                    kind: s.kind(),
                    rect: s.rect(),
                    has_delivered: s.has_delivered,
                    hitboxes: s.hitboxes().iter().copied().collect(),
                })
                .collect(),
            progress: ProgressView {
                player: level_fraction(player.body.rect.x, level_width),
                doors: self
                    .level
                    .structures()
                    .iter()
                    .filter_map(|s| {
                        let door = s.hitboxes().get(HitboxRole::Door, 1)?;
                        Some(DoorMarker {
                            position: level_fraction(door.x, level_width),
                            delivered: s.has_delivered,
                        })
                    })
                    .collect(),
            },
            events,
        }
    }
}

/// `x` as a fraction of the level width, kept in `0.0..=1.0`.
fn level_fraction(x: i32, level_width: i32) -> f32 {
    if level_width <= 0 {
        return 0.0;
    }
    (x as f32 / level_width as f32).clamp(0.0, 1.0)
}

/// Level timer as `(minutes, seconds)` at 60 frames per second.
pub fn timer_clock(timer: u32) -> (u32, u32) {
    (timer / 3600, (timer / 60) % 60)
}

// ── Renderable snapshot ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    pub rect: Rect,
    pub facing: Direction,
    pub track: Track,
    pub frame: u32,
    pub health: u32,
    pub total_health: u32,
    pub tint: Tint,
    /// False on the off-beat of the invincibility blink.
    pub visible: bool,
    pub attack_box: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HostileView {
    pub rect: Rect,
    pub facing: Direction,
    pub kind: HostileKind,
    pub health: u32,
    pub tint: Tint,
    pub frame: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructureView {
    pub kind: StructureKind,
    pub rect: Rect,
    pub has_delivered: bool,
    pub hitboxes: Vec<Hitbox>,
}

/// One delivery door on the progress strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorMarker {
    pub position: f32,
    pub delivered: bool,
}

/// The player and each building's first door along the level, as fractions
/// of `level_width`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressView {
    pub player: f32,
    pub doors: Vec<DoorMarker>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableState {
    pub state: GameState,
    pub is_paused: bool,
    pub score: u32,
    pub timer: u32,
    pub lives: u32,
    pub current_level: u32,
    pub loop_count: u32,
    pub camera_x: i32,
    pub level_width: i32,
    pub objectives_remaining: bool,
    pub loading_frame: u32,
    pub player: PlayerView,
    pub hostiles: Vec<HostileView>,
    pub structures: Vec<StructureView>,
    pub progress: ProgressView,
    pub events: Vec<GameEvent>,
}

// ── Per-frame entry point ────────────────────────────────────────────────────

/// Advance the whole game by one frame.
///
/// On a level-load error the session stays in the state it was in and the
/// error is returned; the frame's other effects (clock, input edge) still
/// apply.
pub fn simulate_frame(
    input: InputSnapshot,
    dt: Duration,
    session: &mut GameSession,
) -> Result<RenderableState, GameError> {
    let dt = dt.max(MIN_FRAME_DELTA);
    session.clock.tick += 1;
    session.clock.elapsed += dt;

    let frame = InputFrame::new(input, session.previous_input);
    session.previous_input = input;

    let mut events = Vec::new();
    match session.state {
        GameState::Menu => update_menu(session, &frame, &mut events)?,
        GameState::Playing => update_playing(session, &frame, &mut events),
        GameState::Loading => update_loading(session, dt, &mut events)?,
        GameState::GameOver => update_game_over(session, &frame, &mut events),
    }

    for event in &events {
        debug!(tick = session.clock.tick, event = ?event, "game_event");
    }
    Ok(session.renderable(events))
}

fn update_menu(session: &mut GameSession, frame: &InputFrame, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    if session.player.body.is_dead() {
        session.player = Player::new(session.level.spawn(), session.config.session.starting_lives, &session.config);
    }
    session.level.respawn_defeated_hostiles(&session.config);

    if !frame.pressed(Control::Confirm) {
        return Ok(());
    }

    session.load_level(1)?;
    session.player.lives = session.config.session.starting_lives;
    session.score = 0;
    session.timer = session.config.session.level_timer;
    session.current_level = 1;
    session.loop_count = 1;
    session.is_paused = false;
    session.state = GameState::Playing;
    session.camera_x = camera_offset(session.player.body.rect.x, session.level.level_width(), session.config.screen_width);
    info!(lives = session.player.lives, "game_started");
    events.push(GameEvent::GameStarted);
    events.push(GameEvent::LevelLoaded {
        level: 1,
        loop_count: 1,
    });
    Ok(())
}

fn update_playing(session: &mut GameSession, frame: &InputFrame, events: &mut Vec<GameEvent>) {
    if frame.pressed(Control::Confirm) {
        session.is_paused = !session.is_paused;
        info!(paused = session.is_paused, "pause_toggled");
        events.push(GameEvent::PauseToggled {
            paused: session.is_paused,
        });
    }

    let mut attempt_over = false;
    if !session.is_paused {
        session.clock.play_tick += 1;
        attempt_over = run_gameplay(session, frame, events);
    }

    // The level clock keeps running while paused.
    if !attempt_over {
        session.timer = session.timer.saturating_sub(1);
        if session.timer == 0 {
            lose_life(session, LifeLostCause::TimerExpired, events);
        }
    }

    session.camera_x = camera_offset(session.player.body.rect.x, session.level.level_width(), session.config.screen_width);
}

/// One unpaused frame of play. Returns `true` when the attempt ended this
/// frame, by finishing the level or by the player's death.
fn run_gameplay(session: &mut GameSession, frame: &InputFrame, events: &mut Vec<GameEvent>) -> bool {
    let tick = session.clock.play_tick;
    let step = update_player(&mut session.player, &mut session.level, frame, &session.config, tick, events);
    if step.delivery_finished {
        session.score += session.config.scoring.delivery_bonus;
    }

    session.level.patrol_hostiles(&mut session.rng, &session.config);
    let outcome = resolve_combat(
        &mut session.player,
        session.level.hostiles_mut(),
        &session.config.combat,
        events,
    );
    session.score += outcome.kills * session.config.scoring.kill_bonus;

    if !session.level.objectives_remaining() && !session.player.is_delivering {
        session.state = GameState::Loading;
        session.loading_elapsed = Duration::ZERO;
        info!(level = session.current_level, score = session.score, "level_complete");
        events.push(GameEvent::LevelComplete {
            level: session.current_level,
        });
        return true;
    }

    if session.player.body.is_dead() {
        lose_life(session, LifeLostCause::Defeated, events);
        return true;
    }
    false
}

/// Spend a life: respawn at the level's declared positions without touching
/// the buildings, or end the game when none are left.
fn lose_life(session: &mut GameSession, cause: LifeLostCause, events: &mut Vec<GameEvent>) {
    let lives_left = session.player.lives.saturating_sub(1);
    session.player.lives = lives_left;

    if lives_left == 0 {
        session.state = GameState::GameOver;
        info!(score = session.score, ?cause, "game_over");
        events.push(GameEvent::GameOver {
            score: session.score,
        });
        return;
    }

    session.timer = session.config.session.level_timer;
    session.player = Player::new(session.level.spawn(), lives_left, &session.config);
    session.level.respawn_hostiles(&session.config);
    info!(lives_left, ?cause, "life_lost");
    events.push(GameEvent::LifeLost { cause, lives_left });
}

fn update_loading(session: &mut GameSession, dt: Duration, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    session.loading_elapsed += dt;
    if session.loading_elapsed < Duration::from_millis(session.config.session.loading_delay_ms) {
        return Ok(());
    }

    let (next_level, next_loop) = if session.current_level >= session.config.session.level_count {
        (1, session.loop_count + 1)
    } else {
        (session.current_level + 1, session.loop_count)
    };

    session.load_level(next_level)?;
    session.current_level = next_level;
    session.loop_count = next_loop;
    session.timer = session.config.session.level_timer;
    session.loading_elapsed = Duration::ZERO;
    session.state = GameState::Playing;
    session.camera_x = camera_offset(session.player.body.rect.x, session.level.level_width(), session.config.screen_width);
    info!(level = next_level, loop_count = next_loop, "level_loaded");
    events.push(GameEvent::LevelLoaded {
        level: next_level,
        loop_count: next_loop,
    });
    Ok(())
}

fn update_game_over(session: &mut GameSession, frame: &InputFrame, events: &mut Vec<GameEvent>) {
    if frame.pressed(Control::Confirm) {
        session.state = GameState::Menu;
        session.timer = 0;
        info!("returned_to_menu");
        events.push(GameEvent::ReturnedToMenu);
    }
}

/// Left edge of the screen: centred on the player, kept inside the level.
pub fn camera_offset(player_x: i32, level_width: i32, screen_width: i32) -> i32 {
    debug_assert!(level_width > 0, "camera requested before a level was loaded");
    let level_width = level_width.max(1);
    let max_x = (level_width - screen_width).max(0);
    (player_x - screen_width / 2).clamp(0, max_x)
}
