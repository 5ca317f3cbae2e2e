use pizza_dash::config::GameConfig;
use pizza_dash::entities::*;
use pizza_dash::geometry::{HitboxLayout, HitboxRole, Rect};

#[test]
fn take_damage_clamps_at_zero() {
    let mut body = Body::new(Rect::new(0, 0, 10, 10), 3, Direction::FaceRight);
    assert_eq!(body.take_damage(1), 2);
    assert!(!body.is_dead());
    assert_eq!(body.take_damage(5), 0);
    assert_eq!(body.current_health, 0);
    assert!(body.is_dead());
    assert_eq!(body.total_health, 3);
}

#[test]
fn at_rest_keeps_heading() {
    assert_eq!(Direction::MoveLeft.at_rest(), Direction::FaceLeft);
    assert_eq!(Direction::MoveRight.at_rest(), Direction::FaceRight);
    assert_eq!(Direction::FaceLeft.at_rest(), Direction::FaceLeft);
    assert!(Direction::MoveLeft.is_moving());
    assert!(!Direction::FaceRight.is_moving());
}

#[test]
fn skins_share_two_layouts() {
    assert_eq!(StructureKind::Walkup.layout(), HitboxLayout::Narrow);
    assert_eq!(StructureKind::Bodega.layout(), HitboxLayout::Narrow);
    assert_eq!(StructureKind::Tenement.layout(), HitboxLayout::Wide);
    assert_eq!(StructureKind::Warehouse.layout(), HitboxLayout::Wide);
}

#[test]
fn set_rect_regenerates_hitboxes() {
    let mut structure = Structure::new(StructureKind::Walkup, Rect::new(100, 152, 170, 250));
    assert_eq!(
        structure.hitboxes().get(HitboxRole::Door, 1),
        Some(Rect::new(128, 350, 34, 52))
    );

    structure.set_rect(Rect::new(400, 100, 170, 250));
    assert_eq!(structure.rect(), Rect::new(400, 100, 170, 250));
    assert_eq!(
        structure.hitboxes().get(HitboxRole::Door, 1),
        Some(Rect::new(428, 298, 34, 52))
    );
}

#[test]
fn place_resets_delivery_and_layout() {
    let mut structure = Structure::new(StructureKind::Walkup, Rect::new(0, 152, 170, 250));
    structure.has_delivered = true;

    structure.place(StructureKind::Tenement, Rect::new(0, 110, 248, 292));
    assert!(!structure.has_delivered);
    assert_eq!(structure.kind(), StructureKind::Tenement);
    assert!(structure.hitboxes().get(HitboxRole::Roof, 2).is_some());
    assert!(structure.hitboxes().get(HitboxRole::Platform, 1).is_none());
}

#[test]
fn hostile_respawn_restores_spawn_and_health() {
    let config = GameConfig::default();
    let spawn = Rect::new(600, 360, 26, 42);
    let mut hostile = Hostile::new(HostileKind::Shambler, spawn, &config);
    assert_eq!(hostile.body.current_health, 3);
    assert_eq!(hostile.body.facing, Direction::MoveLeft);

    hostile.body.take_damage(3);
    hostile.body.rect = Rect::EMPTY;
    hostile.defeated = true;
    assert!(!hostile.is_active());

    hostile.respawn(&config);
    assert!(hostile.is_active());
    assert_eq!(hostile.body.rect, spawn);
    assert_eq!(hostile.body.current_health, 3);
}

#[test]
fn player_is_sized_from_config() {
    let config = GameConfig::default();
    let player = Player::new(Rect::new(40, 356, 1, 1), 3, &config);
    assert_eq!(player.body.rect, Rect::new(40, 356, 30, 46));
    assert_eq!(player.body.facing, Direction::FaceRight);
    assert_eq!(player.attack_box, Rect::EMPTY);
    assert_eq!(player.lives, 3);
}

#[test]
fn player_blinks_while_invincible() {
    let config = GameConfig::default();
    let mut player = Player::new(Rect::new(0, 0, 0, 0), 3, &config);
    assert!(player.is_visible());
    player.invincible_ticks = 120;
    assert!(player.is_visible());
    player.invincible_ticks = 110;
    assert!(!player.is_visible());
    player.invincible_ticks = 100;
    assert!(player.is_visible());
}
