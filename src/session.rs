/// The active level: pooled structure and hostile slots, the player spawn,
/// level width and objective tracking.
///
/// Slots are never freed between levels. Loading a level overwrites the
/// first `n` slots of each pool, appends only when the new level needs more
/// than any previous one, and records `n` as the active watermark.

use rand::Rng;
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::entities::{Direction, Hostile, Structure};
use crate::geometry::{HitboxRole, Rect};
use crate::level::{placement_rect, LevelRecords, PlacementKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub structures: usize,
    pub hostiles: usize,
    pub spawn_declared: bool,
    /// Placements with an unrecognised kind code or out-of-range coordinates.
    pub skipped: usize,
}

#[derive(Clone, Debug, Default)]
pub struct LevelSession {
    structures: Vec<Structure>,
    active_structures: usize,
    hostiles: Vec<Hostile>,
    active_hostiles: usize,
    spawn: Rect,
    level_width: i32,
    objectives_remaining: bool,
}

impl LevelSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current level with `records`, reusing pooled slots.
    pub fn load(&mut self, records: &LevelRecords, config: &GameConfig) -> LoadReport {
        let mut report = LoadReport::default();
        self.active_structures = 0;
        self.active_hostiles = 0;
        self.level_width = records.level_width();
        self.spawn = Rect::new(0, config.ground_y, config.player.width, config.player.height);

        for placement in &records.placements {
            let Some(kind) = PlacementKind::from_code(placement.code) else {
                warn!(
                    code = placement.code,
                    x = placement.x,
                    y = placement.y,
                    "unrecognized_placement_kind"
                );
                report.skipped += 1;
                continue;
            };
            if !placement.in_range() {
                warn!(
                    code = placement.code,
                    x = placement.x,
                    y = placement.y,
                    "placement_out_of_range"
                );
                report.skipped += 1;
                continue;
            }
            let rect = placement_rect(kind, placement.x, placement.y, config);
            match kind {
                PlacementKind::Structure(structure_kind) => {
                    let slot = self.active_structures;
                    match self.structures.get_mut(slot) {
                        Some(existing) => existing.place(structure_kind, rect),
                        None => self.structures.push(Structure::new(structure_kind, rect)),
                    }
                    self.active_structures += 1;
                }
                PlacementKind::PlayerSpawn => {
                    self.spawn = rect;
                    report.spawn_declared = true;
                }
                PlacementKind::Hostile(hostile_kind) => {
                    let slot = self.active_hostiles;
                    match self.hostiles.get_mut(slot) {
                        Some(existing) => *existing = Hostile::new(hostile_kind, rect, config),
                        None => self.hostiles.push(Hostile::new(hostile_kind, rect, config)),
                    }
                    self.active_hostiles += 1;
                }
            }
        }

        if !report.spawn_declared {
            warn!("level_has_no_player_spawn");
        }
        self.recompute_objectives();
        report.structures = self.active_structures;
        report.hostiles = self.active_hostiles;
        info!(
            level_width = self.level_width,
            structures = report.structures,
            hostiles = report.hostiles,
            skipped = report.skipped,
            "level_session_built"
        );
        report
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures[..self.active_structures]
    }

    pub fn hostiles(&self) -> &[Hostile] {
        &self.hostiles[..self.active_hostiles]
    }

    pub fn hostiles_mut(&mut self) -> &mut [Hostile] {
        &mut self.hostiles[..self.active_hostiles]
    }

    /// Allocated slots `(structures, hostiles)`, including inactive ones.
    pub fn pool_capacity(&self) -> (usize, usize) {
        (self.structures.len(), self.hostiles.len())
    }

    pub fn spawn(&self) -> Rect {
        self.spawn
    }

    pub fn level_width(&self) -> i32 {
        self.level_width
    }

    pub fn objectives_remaining(&self) -> bool {
        self.objectives_remaining
    }

    pub fn recompute_objectives(&mut self) {
        self.objectives_remaining = self.structures().iter().any(|s| !s.has_delivered);
    }

    /// Flag a structure as delivered. Returns `false` (and changes nothing)
    /// when it already was, or the index is not active.
    pub fn deliver(&mut self, index: usize) -> bool {
        let Some(structure) = self.structures[..self.active_structures].get_mut(index) else {
            return false;
        };
        if structure.has_delivered {
            return false;
        }
        structure.has_delivered = true;
        self.recompute_objectives();
        true
    }

    /// Every hostile back at its declared position with full health.
    pub fn respawn_hostiles(&mut self, config: &GameConfig) {
        for hostile in self.hostiles_mut() {
            hostile.respawn(config);
        }
    }

    pub fn respawn_defeated_hostiles(&mut self, config: &GameConfig) {
        for hostile in self.hostiles_mut().iter_mut().filter(|h| !h.is_active()) {
            hostile.respawn(config);
        }
    }

    // ── Hitbox queries ──────────────────────────────────────────────────────

    /// First roof or platform that `probe` touches.
    pub fn landing_surface(&self, probe: Rect) -> Option<Rect> {
        self.structures().iter().find_map(|structure| {
            structure
                .hitboxes()
                .iter()
                .filter(|h| h.role.is_walkable())
                .map(|h| h.rect)
                .find(|rect| rect.intersects(&probe))
        })
    }

    /// Whether a roof or platform top lies within `margin` below `feet`.
    pub fn has_footing(&self, feet_x: i32, feet_width: i32, feet: i32, margin: i32) -> bool {
        self.structures().iter().any(|structure| {
            structure
                .hitboxes()
                .iter()
                .filter(|h| h.role.is_walkable())
                .any(|h| {
                    h.rect.x < feet_x + feet_width
                        && feet_x < h.rect.right()
                        && h.rect.y >= feet
                        && h.rect.y <= feet + margin
                })
        })
    }

    pub fn ladders_touching(&self, probe: Rect) -> impl Iterator<Item = Rect> + '_ {
        self.structures()
            .iter()
            .flat_map(|structure| structure.hitboxes().of_role(HitboxRole::Ladder))
            .filter(move |ladder| ladder.intersects(&probe))
    }

    /// Door of a structure still waiting for a delivery that `probe` overlaps.
    pub fn undelivered_door(&self, probe: Rect) -> Option<(usize, Rect)> {
        self.structures()
            .iter()
            .enumerate()
            .filter(|(_, structure)| !structure.has_delivered)
            .find_map(|(index, structure)| {
                structure
                    .hitboxes()
                    .of_role(HitboxRole::Door)
                    .find(|door| door.intersects(&probe))
                    .map(|door| (index, door))
            })
    }

    // ── Hostile patrol ──────────────────────────────────────────────────────

    /// Walk every live hostile, turning at the level edges and, with odds
    /// `1 / turn_odds`, at random.
    pub fn patrol_hostiles(&mut self, rng: &mut impl Rng, config: &GameConfig) {
        let max_x = (self.level_width - config.hostile.width).max(0);
        let speed = config.hostile.speed;
        let turn_odds = config.hostile.turn_odds;

        for hostile in self.hostiles_mut().iter_mut().filter(|h| h.is_active()) {
            let body = &mut hostile.body;
            if turn_odds > 0 && rng.gen_ratio(1, turn_odds) {
                body.facing = reverse(body.facing);
            }
            let step = if body.facing.is_left() { -speed } else { speed };
            let x = body.rect.x + step;
            if x <= 0 {
                body.rect.x = 0;
                body.facing = Direction::MoveRight;
            } else if x >= max_x {
                body.rect.x = max_x;
                body.facing = Direction::MoveLeft;
            } else {
                body.rect.x = x;
            }
        }
    }
}

fn reverse(direction: Direction) -> Direction {
    if direction.is_left() {
        Direction::MoveRight
    } else {
        Direction::MoveLeft
    }
}
