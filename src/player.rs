/// Player controller: walking, gravity and jumping, ladders, attacks,
/// deliveries, and selecting the animation frame for whichever of those is
/// active.
///
/// Attacking and delivering lock out movement input until their animation
/// finishes; vertical motion already in flight keeps integrating.

use tracing::debug;

use crate::animation::{looping_frame, one_shot_frame, OneShotFrame, Track};
use crate::config::GameConfig;
use crate::entities::{Direction, Player};
use crate::events::GameEvent;
use crate::geometry::Rect;
use crate::input::{Control, InputFrame};
use crate::session::LevelSession;

/// What the controller did this frame that the state machine scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub delivered_to: Option<usize>,
    pub delivery_finished: bool,
}

/// Advance the player by one frame.
pub fn update_player(
    player: &mut Player,
    level: &mut LevelSession,
    input: &InputFrame,
    config: &GameConfig,
    tick: u64,
    events: &mut Vec<GameEvent>,
) -> PlayerStep {
    let mut step = PlayerStep::default();

    if player.is_delivering {
        if advance_one_shot(player, config, tick) {
            player.is_delivering = false;
            player.animation.restart(Track::Walk, tick);
            step.delivery_finished = true;
            events.push(GameEvent::DeliveryFinished);
        }
        apply_vertical(player, level, config, events);
        return step;
    }

    if player.is_attacking {
        if advance_one_shot(player, config, tick) {
            end_attack(player, tick);
        }
        apply_vertical(player, level, config, events);
        return step;
    }

    if input.pressed(Control::Attack) && start_attack(player, config, tick) {
        events.push(GameEvent::AttackStarted);
        return step;
    }

    if !player.is_climbing {
        move_horizontal(player, input, level.level_width(), config);
        apply_vertical(player, level, config, events);
        if input.pressed(Control::Jump) {
            jump(player, config, events);
        }
    }

    let climbed = update_climb(player, level, input, config);

    if !player.is_climbing {
        if let Some(index) = try_deliver(player, level, input, tick) {
            step.delivered_to = Some(index);
            events.push(GameEvent::Delivered {
                structure: index,
                objectives_remaining: level.objectives_remaining(),
            });
            return step;
        }
    }

    select_locomotion_frame(player, config, tick, climbed);
    step
}

// ── Horizontal movement ──────────────────────────────────────────────────────

pub fn move_horizontal(player: &mut Player, input: &InputFrame, level_width: i32, config: &GameConfig) {
    let left = input.is_down(Control::MoveLeft);
    let right = input.is_down(Control::MoveRight);
    let body = &mut player.body;
    let max_x = (level_width - body.rect.width).max(0);

    match (left, right) {
        (true, false) => {
            body.facing = Direction::MoveLeft;
            body.rect.x = (body.rect.x - config.player.walk_step).clamp(0, max_x);
        }
        (false, true) => {
            body.facing = Direction::MoveRight;
            body.rect.x = (body.rect.x + config.player.walk_step).clamp(0, max_x);
        }
        _ => body.facing = body.facing.at_rest(),
    }
}

// ── Gravity, landing, jumping ────────────────────────────────────────────────

/// One frame of vertical motion. Landing on a roof or platform takes priority
/// over the ground line.
pub fn apply_vertical(player: &mut Player, level: &LevelSession, config: &GameConfig, events: &mut Vec<GameEvent>) {
    if player.is_climbing {
        return;
    }
    let ground_y = config.ground_y;
    let margin = config.player.landing_margin;

    if !player.is_airborne {
        let rect = player.body.rect;
        if rect.y < ground_y && !level.has_footing(rect.x, rect.width, rect.bottom(), margin) {
            player.is_airborne = true;
        }
        return;
    }

    player.vertical_speed += config.player.gravity;
    let fall = player.vertical_speed as i32;

    if player.vertical_speed > 0.0 {
        let probe = player.body.rect.extend_down(margin + fall.max(0));
        if let Some(surface) = level.landing_surface(probe) {
            land(player, surface.y - player.body.rect.height, events);
            return;
        }
    }

    let next_y = player.body.rect.y + fall;
    if player.vertical_speed > 0.0 && next_y >= ground_y {
        land(player, ground_y, events);
    } else {
        player.body.rect.y = next_y;
    }
}

fn land(player: &mut Player, y: i32, events: &mut Vec<GameEvent>) {
    player.body.rect.y = y;
    player.vertical_speed = 0.0;
    player.is_airborne = false;
    events.push(GameEvent::Landed);
}

pub fn jump(player: &mut Player, config: &GameConfig, events: &mut Vec<GameEvent>) {
    if player.is_airborne || player.is_climbing {
        return;
    }
    player.vertical_speed = config.player.jump_speed;
    player.is_airborne = true;
    events.push(GameEvent::Jumped);
}

// ── Ladders ──────────────────────────────────────────────────────────────────

/// Returns true when the player moved along a ladder this frame.
fn update_climb(player: &mut Player, level: &LevelSession, input: &InputFrame, config: &GameConfig) -> bool {
    if player.is_airborne {
        player.is_climbing = false;
        return false;
    }

    let rect = player.body.rect;
    let probe = rect.extend_down(config.player.ladder_margin);
    let feet = rect.bottom();
    let step = config.player.climb_step;

    if input.is_down(Control::ClimbUp) {
        let ladder = level
            .ladders_touching(probe)
            .filter(|ladder| ladder.y < feet)
            .min_by_key(|ladder| ladder.y);
        match ladder {
            Some(ladder) => {
                player.body.rect = rect.with_x(ladder.x).translate(0, -step);
                player.is_climbing = true;
                return true;
            }
            None => {
                // Reached the top: stand on whatever is there.
                player.is_climbing = false;
                return false;
            }
        }
    }

    if input.is_down(Control::ClimbDown) {
        let ladder = level
            .ladders_touching(probe)
            .filter(|ladder| ladder.bottom() > feet)
            .max_by_key(|ladder| ladder.bottom());
        if let Some(ladder) = ladder {
            descend(player, ladder, step, config.ground_y);
            return true;
        }
        player.is_climbing = false;
        return false;
    }

    if player.is_climbing && level.ladders_touching(probe).next().is_none() {
        player.is_climbing = false;
    }
    false
}

fn descend(player: &mut Player, ladder: Rect, step: i32, ground_y: i32) {
    let rect = player.body.rect.with_x(ladder.x).translate(0, step);
    player.is_climbing = true;
    if rect.y >= ground_y {
        player.body.rect = rect.with_y(ground_y);
        player.is_climbing = false;
    } else if rect.bottom() >= ladder.bottom() {
        player.body.rect = rect.with_y(ladder.bottom() - rect.height);
        player.is_climbing = false;
    } else {
        player.body.rect = rect;
    }
}

// ── Attack ───────────────────────────────────────────────────────────────────

/// Box in front of the player for the current facing.
pub fn attack_box_for(rect: Rect, facing: Direction, config: &GameConfig) -> Rect {
    let p = &config.player;
    let x = if facing.is_left() {
        rect.x - (p.attack_width - 1)
    } else {
        rect.x + p.attack_reach
    };
    Rect::new(x, rect.y + p.attack_offset_y, p.attack_width, p.attack_height)
}

fn start_attack(player: &mut Player, config: &GameConfig, tick: u64) -> bool {
    if player.is_airborne || player.is_climbing {
        return false;
    }
    player.attack_box = attack_box_for(player.body.rect, player.body.facing, config);
    player.is_attacking = true;
    player.animation.restart(Track::Attack, tick);
    debug!(attack_box = ?player.attack_box, "attack_started");
    true
}

fn end_attack(player: &mut Player, tick: u64) {
    player.is_attacking = false;
    player.attack_box = Rect::EMPTY;
    player.animation.restart(Track::Walk, tick);
}

// ── Delivery ─────────────────────────────────────────────────────────────────

fn try_deliver(player: &mut Player, level: &mut LevelSession, input: &InputFrame, tick: u64) -> Option<usize> {
    if player.is_airborne || !input.is_down(Control::ClimbUp) {
        return None;
    }
    let (index, door) = level.undelivered_door(player.body.rect)?;
    if !level.deliver(index) {
        return None;
    }
    player.body.rect.x = door.x;
    player.body.facing = player.body.facing.at_rest();
    player.is_delivering = true;
    player.animation.restart(Track::Deliver, tick);
    Some(index)
}

// ── Frame selection ──────────────────────────────────────────────────────────

/// Advance the active one-shot track; true once it reaches its terminal frame.
fn advance_one_shot(player: &mut Player, config: &GameConfig, tick: u64) -> bool {
    let anim = &config.animation;
    let spec = match player.animation.track {
        Track::Attack => anim.attack,
        Track::Deliver => anim.deliver,
        Track::Walk | Track::Climb => return true,
    };
    let elapsed = player.animation.elapsed(tick);
    match one_shot_frame(elapsed, anim.ticks_per_frame, spec) {
        OneShotFrame::Playing(frame) => {
            player.animation.frame = frame;
            false
        }
        OneShotFrame::Finished => true,
    }
}

fn select_locomotion_frame(player: &mut Player, config: &GameConfig, tick: u64, climbed: bool) {
    let anim = &config.animation;
    if player.is_climbing {
        player.animation.switch_to(Track::Climb, tick);
        if climbed {
            let elapsed = player.animation.elapsed(tick);
            player.animation.frame = looping_frame(elapsed, anim.ticks_per_frame, anim.climb_frames);
        }
        return;
    }

    player.animation.switch_to(Track::Walk, tick);
    player.animation.frame = if player.body.facing.is_moving() {
        let elapsed = player.animation.elapsed(tick);
        looping_frame(elapsed, anim.ticks_per_frame, anim.walk_frames)
    } else {
        0
    };
}
