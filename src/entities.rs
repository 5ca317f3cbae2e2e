/// Game entity types: plain data plus the few helpers that keep their invariants.

use serde::{Deserialize, Serialize};

use crate::animation::Animator;
use crate::config::GameConfig;
use crate::geometry::{HitboxLayout, Hitboxes, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Menu,
    Playing,
    GameOver,
    Loading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    FaceLeft,
    FaceRight,
    MoveLeft,
    MoveRight,
}

impl Direction {
    pub fn is_left(self) -> bool {
        matches!(self, Direction::FaceLeft | Direction::MoveLeft)
    }

    pub fn is_moving(self) -> bool {
        matches!(self, Direction::MoveLeft | Direction::MoveRight)
    }

    /// The standing variant of the same heading.
    pub fn at_rest(self) -> Direction {
        if self.is_left() {
            Direction::FaceLeft
        } else {
            Direction::FaceRight
        }
    }
}

/// Visual tint the renderer applies; combat sets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    Normal,
    Highlighted,
}

// ── Shared movable body ──────────────────────────────────────────────────────

/// State shared by the player and hostiles. All damage goes through
/// [`Body::take_damage`] so health stays in `0..=total_health`.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub facing: Direction,
    pub current_health: u32,
    pub total_health: u32,
    pub is_colliding: bool,
    pub was_colliding: bool,
    pub tint: Tint,
}

impl Body {
    pub fn new(rect: Rect, total_health: u32, facing: Direction) -> Self {
        Self {
            rect,
            facing,
            current_health: total_health,
            total_health,
            is_colliding: false,
            was_colliding: false,
            tint: Tint::Normal,
        }
    }

    /// Returns the health left.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.current_health = self.current_health.saturating_sub(amount);
        self.current_health
    }

    pub fn is_dead(&self) -> bool {
        self.current_health == 0
    }
}

// ── Structures ───────────────────────────────────────────────────────────────

/// Building skins. Level records use codes 0 and 1 for the two base skins and
/// 5 and 6 for the recoloured variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Walkup,
    Tenement,
    Bodega,
    Warehouse,
}

impl StructureKind {
    pub fn layout(self) -> HitboxLayout {
        match self {
            StructureKind::Walkup | StructureKind::Bodega => HitboxLayout::Narrow,
            StructureKind::Tenement | StructureKind::Warehouse => HitboxLayout::Wide,
        }
    }
}

/// A placed building. `rect` and `hitboxes` are private so the hitboxes can
/// only change together with the footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    kind: StructureKind,
    rect: Rect,
    hitboxes: Hitboxes,
    pub has_delivered: bool,
}

impl Structure {
    pub fn new(kind: StructureKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            hitboxes: Hitboxes::generate(kind.layout(), rect),
            has_delivered: false,
        }
    }

    /// Overwrite this slot with a fresh placement.
    pub fn place(&mut self, kind: StructureKind, rect: Rect) {
        self.kind = kind;
        self.has_delivered = false;
        self.set_rect(rect);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        self.hitboxes.regenerate(self.kind.layout(), rect);
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn hitboxes(&self) -> &Hitboxes {
        &self.hitboxes
    }
}

// ── Hostiles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileKind {
    Shambler,
    Crawler,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hostile {
    pub body: Body,
    pub kind: HostileKind,
    /// Level-declared position, used when respawning.
    pub spawn: Rect,
    /// Set once when health hits zero and the rect is cleared.
    pub defeated: bool,
}

impl Hostile {
    pub fn new(kind: HostileKind, spawn: Rect, config: &GameConfig) -> Self {
        Self {
            body: Body::new(spawn, config.hostile.max_health, Direction::MoveLeft),
            kind,
            spawn,
            defeated: false,
        }
    }

    /// Back to the declared position at full health.
    pub fn respawn(&mut self, config: &GameConfig) {
        *self = Hostile::new(self.kind, self.spawn, config);
    }

    pub fn is_active(&self) -> bool {
        !self.defeated && self.body.current_health > 0
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub vertical_speed: f32,
    pub is_airborne: bool,
    pub is_climbing: bool,
    /// [`Rect::EMPTY`] unless `is_attacking`.
    pub attack_box: Rect,
    pub is_attacking: bool,
    pub is_delivering: bool,
    /// Frames of damage immunity left after a hit.
    pub invincible_ticks: u32,
    pub lives: u32,
    pub animation: Animator,
}

impl Player {
    /// A fresh player at `spawn`, sized from the config.
    pub fn new(spawn: Rect, lives: u32, config: &GameConfig) -> Self {
        let rect = Rect::new(spawn.x, spawn.y, config.player.width, config.player.height);
        Self {
            body: Body::new(rect, config.player.max_health, Direction::FaceRight),
            vertical_speed: 0.0,
            is_airborne: false,
            is_climbing: false,
            attack_box: Rect::EMPTY,
            is_attacking: false,
            is_delivering: false,
            invincible_ticks: 0,
            lives,
            animation: Animator::default(),
        }
    }

    /// Only blinking matters to the renderer: visible on the first half of
    /// every 30-frame window while invincible.
    pub fn is_visible(&self) -> bool {
        self.invincible_ticks == 0 || self.invincible_ticks % 30 <= 15
    }
}
