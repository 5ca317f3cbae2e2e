/// Level records: the flat integer stream a level is stored as, and the
/// sources that produce it.
///
/// Layout of a stream: `[half_width, kind, x, y, kind, x, y, ...]`.
/// Kind codes: 0, 1, 5, 6 buildings; 2 player spawn; 3, 4 hostiles.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::entities::{HostileKind, StructureKind};
use crate::geometry::Rect;

/// Largest coordinate magnitude, and largest half-width, a level may use.
/// Keeps every rectangle edge, hitbox offset and movement step well inside
/// `i32`.
pub const COORD_LIMIT: i32 = 1 << 24;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("level file {path} is {len} bytes, not a whole number of i32 values")]
    Truncated { path: PathBuf, len: usize },
    #[error("level {level} does not exist")]
    Missing { level: u32 },
    #[error("level data is empty")]
    Empty,
    #[error("level half-width must be in 1..=16777216, got {0}")]
    InvalidWidth(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementKind {
    Structure(StructureKind),
    PlayerSpawn,
    Hostile(HostileKind),
}

impl PlacementKind {
    /// `None` for codes no level format revision defines.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PlacementKind::Structure(StructureKind::Walkup)),
            1 => Some(PlacementKind::Structure(StructureKind::Tenement)),
            2 => Some(PlacementKind::PlayerSpawn),
            3 => Some(PlacementKind::Hostile(HostileKind::Shambler)),
            4 => Some(PlacementKind::Hostile(HostileKind::Crawler)),
            5 => Some(PlacementKind::Structure(StructureKind::Bodega)),
            6 => Some(PlacementKind::Structure(StructureKind::Warehouse)),
            _ => None,
        }
    }
}

/// One `(kind, x, y)` triple, kind still undecoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawPlacement {
    pub code: i32,
    pub x: i32,
    pub y: i32,
}

impl RawPlacement {
    /// Both coordinates within `±COORD_LIMIT`.
    pub fn in_range(&self) -> bool {
        let range = -COORD_LIMIT..=COORD_LIMIT;
        range.contains(&self.x) && range.contains(&self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelRecords {
    pub half_width: i32,
    pub placements: Vec<RawPlacement>,
    /// Values after the last complete triple; ignored.
    pub trailing_values: usize,
}

impl LevelRecords {
    pub fn from_values(values: &[i32]) -> Result<Self, LevelError> {
        let (&half_width, rest) = values.split_first().ok_or(LevelError::Empty)?;
        if !(1..=COORD_LIMIT).contains(&half_width) {
            return Err(LevelError::InvalidWidth(half_width));
        }

        let chunks = rest.chunks_exact(3);
        let trailing_values = chunks.remainder().len();
        let placements = chunks
            .map(|triple| RawPlacement {
                code: triple[0],
                x: triple[1],
                y: triple[2],
            })
            .collect();

        if trailing_values > 0 {
            warn!(trailing_values, "level_data_trailing_values");
        }

        Ok(Self {
            half_width,
            placements,
            trailing_values,
        })
    }

    pub fn level_width(&self) -> i32 {
        self.half_width.saturating_mul(2)
    }
}

/// World rectangle for a placement: position from the record, size from the
/// building layout or the configured entity size.
pub fn placement_rect(kind: PlacementKind, x: i32, y: i32, config: &GameConfig) -> Rect {
    let (width, height) = match kind {
        PlacementKind::Structure(structure) => structure.layout().footprint(),
        PlacementKind::PlayerSpawn => (config.player.width, config.player.height),
        PlacementKind::Hostile(_) => (config.hostile.width, config.hostile.height),
    };
    Rect::new(x, y, width, height)
}

/// Produces the records of level `1..=count`.
pub trait LevelSource {
    fn load(&self, level: u32) -> Result<LevelRecords, LevelError>;
}

/// `level{n}.dat` files in one directory, each a stream of little-endian `i32`.
#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, level: u32) -> PathBuf {
        self.root.join(format!("level{level}.dat"))
    }
}

pub fn read_level_file(path: &Path) -> Result<Vec<i32>, LevelError> {
    let bytes = fs::read(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.len() % 4 != 0 {
        return Err(LevelError::Truncated {
            path: path.to_path_buf(),
            len: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|word| i32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect())
}

pub fn encode_level_values(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

impl LevelSource for LevelDirectory {
    fn load(&self, level: u32) -> Result<LevelRecords, LevelError> {
        let path = self.path_for(level);
        let values = read_level_file(&path)?;
        debug!(path = %path.display(), values = values.len(), "level_file_read");
        LevelRecords::from_values(&values)
    }
}

// ── Built-in levels ──────────────────────────────────────────────────────────

const LEVEL_1: &[i32] = &[
    800, //
    2, 40, 356, //
    0, 300, 152, //
    1, 700, 110, //
    3, 600, 360, //
    4, 1100, 360, //
    0, 1300, 152,
];

const LEVEL_2: &[i32] = &[
    900, //
    2, 40, 356, //
    1, 250, 110, //
    0, 600, 152, //
    3, 500, 360, //
    3, 900, 360, //
    1, 1150, 110, //
    4, 1500, 360,
];

const LEVEL_3: &[i32] = &[
    1000, //
    2, 40, 356, //
    0, 200, 152, //
    5, 520, 152, //
    1, 850, 110, //
    3, 450, 360, //
    4, 800, 360, //
    3, 1200, 360, //
    6, 1500, 110, //
    4, 1750, 360,
];

const LEVEL_4: &[i32] = &[
    1000, //
    2, 40, 356, //
    1, 300, 110, //
    6, 700, 110, //
    0, 1150, 152, //
    3, 400, 360, //
    4, 650, 360, //
    3, 1000, 360, //
    4, 1350, 360, //
    0, 1600, 152,
];

const LEVEL_5: &[i32] = &[
    1200, //
    2, 40, 356, //
    0, 250, 152, //
    1, 600, 110, //
    5, 1000, 152, //
    6, 1350, 110, //
    0, 1800, 152, //
    3, 500, 360, //
    4, 900, 360, //
    3, 1250, 360, //
    4, 1650, 360, //
    3, 2000, 360,
];

/// The five levels compiled into the binary, used when no level directory is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl BuiltinLevels {
    pub const COUNT: u32 = 5;

    pub fn values(level: u32) -> Option<&'static [i32]> {
        match level {
            1 => Some(LEVEL_1),
            2 => Some(LEVEL_2),
            3 => Some(LEVEL_3),
            4 => Some(LEVEL_4),
            5 => Some(LEVEL_5),
            _ => None,
        }
    }
}

impl LevelSource for BuiltinLevels {
    fn load(&self, level: u32) -> Result<LevelRecords, LevelError> {
        let values = Self::values(level).ok_or(LevelError::Missing { level })?;
        LevelRecords::from_values(values)
    }
}

/// Levels held in memory, handy for tools and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLevels {
    levels: Vec<Vec<i32>>,
}

impl InMemoryLevels {
    pub fn new(levels: Vec<Vec<i32>>) -> Self {
        Self { levels }
    }
}

impl LevelSource for InMemoryLevels {
    fn load(&self, level: u32) -> Result<LevelRecords, LevelError> {
        let index = (level as usize).checked_sub(1).ok_or(LevelError::Missing { level })?;
        let values = self.levels.get(index).ok_or(LevelError::Missing { level })?;
        LevelRecords::from_values(values)
    }
}
