use std::fs;

use pizza_dash::config::*;

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    config.validate().unwrap();
    assert_eq!(config.session.level_timer, 6000);
    assert_eq!(config.session.starting_lives, 3);
    assert_eq!(config.session.loading_delay_ms, 4000);
    assert_eq!(config.combat.invincibility_ticks, 120);
    assert_eq!(config.player.walk_step, 4);
    assert_eq!(config.player.climb_step, 2);
    assert_eq!(config.scoring.kill_bonus, 5);
}

#[test]
fn empty_object_gives_defaults() {
    assert_eq!(GameConfig::from_json_str("{}").unwrap(), GameConfig::default());
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = GameConfig::from_json_str(r#"{ "session": { "level_timer": 100 }, "ground_y": 300 }"#).unwrap();
    assert_eq!(config.session.level_timer, 100);
    assert_eq!(config.session.starting_lives, 3);
    assert_eq!(config.ground_y, 300);
    assert_eq!(config.player, GameConfig::default().player);
}

#[test]
fn type_error_reports_field_path() {
    let err = GameConfig::from_json_str(r#"{ "player": { "gravity": "heavy" } }"#).unwrap_err();
    match err {
        ConfigError::Parse { field, .. } => assert_eq!(field, "player.gravity"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_field_is_rejected() {
    let err = GameConfig::from_json_str(r#"{ "session": { "level_timr": 5 } }"#).unwrap_err();
    match err {
        ConfigError::Parse { field, .. } => assert!(field.starts_with("session"), "{field}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_values_are_rejected() {
    let err = GameConfig::from_json_str(r#"{ "player": { "jump_speed": 5.0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "player.jump_speed", .. }));

    let err = GameConfig::from_json_str(r#"{ "session": { "level_count": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "session.level_count", .. }));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    fs::write(&path, r#"{ "combat": { "knockback": 20 } }"#).unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.combat.knockback, 20);
    assert_eq!(config.combat.attack_damage, 1);
}

#[test]
fn load_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
