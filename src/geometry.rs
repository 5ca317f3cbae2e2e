/// Axis-aligned rectangles and the fixed hitbox tables for each building layout.
///
/// Everything here is pure: a structure's hitboxes are always derived from its
/// footprint rectangle and never edited on their own.

use serde::{Deserialize, Serialize};

// ── Rectangle ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Zero-area rectangle used for "no attack box" and cleared hostiles.
    pub const EMPTY: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Negative sizes are clamped to zero.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// True iff both boxes share positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn with_x(self, x: i32) -> Rect {
        Rect { x, ..self }
    }

    pub fn with_y(self, y: i32) -> Rect {
        Rect { y, ..self }
    }

    /// Same origin, `extra` units taller. Used for feet/ladder probes.
    pub fn extend_down(self, extra: i32) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height + extra)
    }

    pub fn translate(self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

// ── Hitboxes ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitboxRole {
    Ladder,
    Roof,
    Platform,
    Door,
}

impl HitboxRole {
    /// Surfaces a falling player can land on.
    pub fn is_walkable(self) -> bool {
        matches!(self, HitboxRole::Roof | HitboxRole::Platform)
    }
}

/// One named sub-rectangle of a structure, e.g. `door2` is
/// `Hitbox { role: Door, ordinal: 2, .. }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hitbox {
    pub role: HitboxRole,
    pub ordinal: u8,
    pub rect: Rect,
}

struct HitboxOffset {
    role: HitboxRole,
    ordinal: u8,
    dx: i32,
    dy: i32,
    width: i32,
    height: i32,
}

const fn offset(role: HitboxRole, ordinal: u8, dx: i32, dy: i32, width: i32, height: i32) -> HitboxOffset {
    HitboxOffset {
        role,
        ordinal,
        dx,
        dy,
        width,
        height,
    }
}

const NARROW_OFFSETS: [HitboxOffset; 5] = [
    offset(HitboxRole::Ladder, 1, 122, 102, 30, 148),
    offset(HitboxRole::Ladder, 2, 92, 38, 28, 66),
    offset(HitboxRole::Platform, 1, 88, 102, 64, 8),
    offset(HitboxRole::Roof, 1, 0, 38, 170, 12),
    offset(HitboxRole::Door, 1, 28, 198, 34, 52),
];

const WIDE_OFFSETS: [HitboxOffset; 5] = [
    offset(HitboxRole::Ladder, 1, 88, 84, 30, 208),
    offset(HitboxRole::Roof, 1, 0, 84, 140, 12),
    offset(HitboxRole::Roof, 2, 62, 0, 186, 12),
    offset(HitboxRole::Door, 1, 18, 240, 34, 52),
    offset(HitboxRole::Door, 2, 194, 240, 34, 52),
];

/// The two hitbox arrangements every building skin maps onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitboxLayout {
    /// One storey with a mid-height platform: two ladders, one roof, one door.
    Narrow,
    /// Split-level roof: one ladder, two roofs, two doors.
    Wide,
}

impl HitboxLayout {
    /// Footprint size `(width, height)` of a building using this layout.
    pub fn footprint(self) -> (i32, i32) {
        match self {
            HitboxLayout::Narrow => (170, 250),
            HitboxLayout::Wide => (248, 292),
        }
    }

    fn offsets(self) -> &'static [HitboxOffset] {
        match self {
            HitboxLayout::Narrow => &NARROW_OFFSETS,
            HitboxLayout::Wide => &WIDE_OFFSETS,
        }
    }

    /// Offset of `role`/`ordinal` from the footprint origin, if the layout has it.
    pub fn offset_of(self, role: HitboxRole, ordinal: u8) -> Option<Rect> {
        self.offsets()
            .iter()
            .find(|o| o.role == role && o.ordinal == ordinal)
            .map(|o| Rect::new(o.dx, o.dy, o.width, o.height))
    }
}

/// Bounded list of hitboxes for one structure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hitboxes {
    boxes: Vec<Hitbox>,
}

impl Hitboxes {
    pub fn generate(layout: HitboxLayout, origin: Rect) -> Hitboxes {
        let mut hitboxes = Hitboxes::default();
        hitboxes.regenerate(layout, origin);
        hitboxes
    }

    /// Rebuild in place, keeping the allocation of a pooled slot.
    pub fn regenerate(&mut self, layout: HitboxLayout, origin: Rect) {
        self.boxes.clear();
        self.boxes.extend(layout.offsets().iter().map(|o| Hitbox {
            role: o.role,
            ordinal: o.ordinal,
            rect: Rect::new(origin.x + o.dx, origin.y + o.dy, o.width, o.height),
        }));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hitbox> {
        self.boxes.iter()
    }

    pub fn of_role(&self, role: HitboxRole) -> impl Iterator<Item = Rect> + '_ {
        self.boxes
            .iter()
            .filter(move |h| h.role == role)
            .map(|h| h.rect)
    }

    /// `None` when the layout has no such hitbox (e.g. `roof2` on a narrow building).
    pub fn get(&self, role: HitboxRole, ordinal: u8) -> Option<Rect> {
        self.boxes
            .iter()
            .find(|h| h.role == role && h.ordinal == ordinal)
            .map(|h| h.rect)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
