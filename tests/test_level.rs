use std::fs;

use pizza_dash::config::GameConfig;
use pizza_dash::entities::{HostileKind, StructureKind};
use pizza_dash::geometry::Rect;
use pizza_dash::level::*;

// ── Record decoding ───────────────────────────────────────────────────────────

#[test]
fn from_values_splits_into_triples() {
    let records = LevelRecords::from_values(&[800, 2, 40, 356, 0, 300, 152]).unwrap();
    assert_eq!(records.half_width, 800);
    assert_eq!(records.level_width(), 1600);
    assert_eq!(
        records.placements,
        vec![
            RawPlacement { code: 2, x: 40, y: 356 },
            RawPlacement { code: 0, x: 300, y: 152 },
        ]
    );
    assert_eq!(records.trailing_values, 0);
}

#[test]
fn from_values_ignores_incomplete_trailing_triple() {
    let records = LevelRecords::from_values(&[400, 3, 10, 360, 1, 99]).unwrap();
    assert_eq!(records.placements.len(), 1);
    assert_eq!(records.trailing_values, 2);
}

#[test]
fn from_values_rejects_empty_and_nonpositive_width() {
    assert!(matches!(LevelRecords::from_values(&[]), Err(LevelError::Empty)));
    assert!(matches!(
        LevelRecords::from_values(&[0, 2, 0, 0]),
        Err(LevelError::InvalidWidth(0))
    ));
    assert!(matches!(
        LevelRecords::from_values(&[-5]),
        Err(LevelError::InvalidWidth(-5))
    ));
}

#[test]
fn from_values_rejects_width_that_would_overflow() {
    assert!(matches!(
        LevelRecords::from_values(&[2_000_000_000, 2, 0, 356]),
        Err(LevelError::InvalidWidth(2_000_000_000))
    ));
    assert!(matches!(
        LevelRecords::from_values(&[COORD_LIMIT + 1]),
        Err(LevelError::InvalidWidth(_))
    ));
    let widest = LevelRecords::from_values(&[COORD_LIMIT]).unwrap();
    assert_eq!(widest.level_width(), COORD_LIMIT * 2);
}

#[test]
fn placement_range_check() {
    assert!(RawPlacement { code: 0, x: COORD_LIMIT, y: -COORD_LIMIT }.in_range());
    assert!(!RawPlacement { code: 0, x: i32::MAX - 10, y: 152 }.in_range());
    assert!(!RawPlacement { code: 3, x: 0, y: i32::MIN }.in_range());
}

#[test]
fn kind_codes() {
    assert_eq!(
        PlacementKind::from_code(0),
        Some(PlacementKind::Structure(StructureKind::Walkup))
    );
    assert_eq!(
        PlacementKind::from_code(6),
        Some(PlacementKind::Structure(StructureKind::Warehouse))
    );
    assert_eq!(PlacementKind::from_code(2), Some(PlacementKind::PlayerSpawn));
    assert_eq!(
        PlacementKind::from_code(4),
        Some(PlacementKind::Hostile(HostileKind::Crawler))
    );
    assert_eq!(PlacementKind::from_code(7), None);
    assert_eq!(PlacementKind::from_code(-1), None);
}

#[test]
fn placement_rect_sizes_by_kind() {
    let config = GameConfig::default();
    assert_eq!(
        placement_rect(PlacementKind::Structure(StructureKind::Tenement), 5, 6, &config),
        Rect::new(5, 6, 248, 292)
    );
    assert_eq!(
        placement_rect(PlacementKind::Hostile(HostileKind::Shambler), 5, 6, &config),
        Rect::new(5, 6, 26, 42)
    );
}

// ── Level files ───────────────────────────────────────────────────────────────

#[test]
fn level_directory_reads_little_endian_files() {
    let dir = tempfile::tempdir().unwrap();
    let values = [600, 2, 40, 356, 1, 300, 110, 4, 700, 360];
    fs::write(dir.path().join("level3.dat"), encode_level_values(&values)).unwrap();

    let levels = LevelDirectory::new(dir.path());
    let records = levels.load(3).unwrap();
    assert_eq!(records, LevelRecords::from_values(&values).unwrap());
}

#[test]
fn level_file_with_partial_word_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level1.dat");
    fs::write(&path, [1u8, 0, 0, 0, 7]).unwrap();

    let err = LevelDirectory::new(dir.path()).load(1).unwrap_err();
    assert!(matches!(err, LevelError::Truncated { len: 5, .. }));
}

#[test]
fn missing_level_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LevelDirectory::new(dir.path()).load(2).unwrap_err();
    match err {
        LevelError::Read { path, .. } => assert!(path.ends_with("level2.dat")),
        other => panic!("unexpected error: {other}"),
    }
}

// ── Built-in and in-memory sources ────────────────────────────────────────────

#[test]
fn builtin_levels_all_load_with_a_spawn() {
    for level in 1..=BuiltinLevels::COUNT {
        let records = BuiltinLevels.load(level).unwrap();
        assert!(records.level_width() > 0);
        assert_eq!(records.trailing_values, 0);
        assert!(
            records
                .placements
                .iter()
                .any(|p| PlacementKind::from_code(p.code) == Some(PlacementKind::PlayerSpawn)),
            "level {level} has no spawn"
        );
    }
    assert!(matches!(
        BuiltinLevels.load(BuiltinLevels::COUNT + 1),
        Err(LevelError::Missing { level: 6 })
    ));
}

#[test]
fn in_memory_levels_are_one_based() {
    let levels = InMemoryLevels::new(vec![vec![100, 2, 0, 356]]);
    assert!(levels.load(1).is_ok());
    assert!(matches!(levels.load(0), Err(LevelError::Missing { level: 0 })));
    assert!(matches!(levels.load(2), Err(LevelError::Missing { level: 2 })));
}
