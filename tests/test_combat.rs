use pizza_dash::combat::*;
use pizza_dash::config::GameConfig;
use pizza_dash::entities::{Direction, Hostile, HostileKind, Player, Tint};
use pizza_dash::events::GameEvent;
use pizza_dash::geometry::Rect;
use pizza_dash::player::attack_box_for;

fn setup(hostile_x: i32) -> (GameConfig, Player, Hostile) {
    let config = GameConfig::default();
    let player = Player::new(Rect::new(100, 356, 0, 0), 3, &config);
    let hostile = Hostile::new(HostileKind::Shambler, Rect::new(hostile_x, 360, 26, 42), &config);
    (config, player, hostile)
}

// ── Contact damage ────────────────────────────────────────────────────────────

#[test]
fn invincibility_blocks_damage_for_exactly_the_configured_frames() {
    let (config, mut player, mut hostile) = setup(110);
    let mut events = Vec::new();
    let mut damaged_on = Vec::new();

    for frame in 1..=130u32 {
        let outcome = resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
        if outcome.player_damaged {
            damaged_on.push(frame);
        }
        if frame == 121 {
            assert_eq!(player.invincible_ticks, 0);
        }
    }

    assert_eq!(damaged_on, vec![1, 122]);
    assert_eq!(player.body.current_health, 1);
    assert!(player.body.is_colliding);
    assert_eq!(player.body.tint, Tint::Highlighted);
}

#[test]
fn invincibility_counter_never_underflows() {
    let (config, mut player, mut hostile) = setup(600);
    let mut events = Vec::new();
    for _ in 0..5 {
        resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    }
    assert_eq!(player.invincible_ticks, 0);
    assert_eq!(player.body.tint, Tint::Normal);
    assert!(events.is_empty());
}

// ── Attack hits ───────────────────────────────────────────────────────────────

#[test]
fn three_hits_on_separate_frames_defeat_once() {
    let (config, mut player, mut hostile) = setup(140);
    player.attack_box = attack_box_for(player.body.rect, Direction::FaceRight, &config);
    let mut events = Vec::new();
    let mut kills = 0;

    for _ in 0..3 {
        // Walks back into range after each knockback.
        hostile.body.rect.x = 140;
        let outcome = resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
        assert_eq!(outcome.hostiles_hit, 1);
        kills += outcome.kills;
    }
    let outcome = resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    kills += outcome.kills;

    assert_eq!(hostile.body.current_health, 0);
    assert!(hostile.defeated);
    assert_eq!(hostile.body.rect, Rect::EMPTY);
    assert_eq!(kills, 1);
    assert_eq!(kills * config.scoring.kill_bonus, 5);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::HostileDefeated { .. }))
            .count(),
        1
    );
}

#[test]
fn hit_knocks_hostile_away_from_attack() {
    let (config, mut player, mut hostile) = setup(140);
    player.attack_box = attack_box_for(player.body.rect, Direction::FaceRight, &config);
    let mut events = Vec::new();

    resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    assert_eq!(hostile.body.rect.x, 153);
    assert_eq!(hostile.body.current_health, 2);
    assert_eq!(hostile.body.tint, Tint::Highlighted);
    // Landing a hit flags the attacker too, with no damage taken.
    assert!(player.body.is_colliding);
    assert_eq!(player.body.tint, Tint::Highlighted);
    assert_eq!(player.body.current_health, 3);
    assert_eq!(player.invincible_ticks, 0);
    assert_eq!(
        events,
        vec![GameEvent::HostileHit {
            hostile: 0,
            remaining_health: 2,
        }]
    );

    let (config, mut player, mut hostile) = setup(70);
    player.attack_box = attack_box_for(player.body.rect, Direction::FaceLeft, &config);
    resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    assert_eq!(hostile.body.rect.x, 57);
}

#[test]
fn one_hit_per_frame_even_when_overlapping() {
    let (config, mut player, mut hostile) = setup(140);
    player.attack_box = attack_box_for(player.body.rect, Direction::FaceRight, &config);
    let mut events = Vec::new();

    let outcome = resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    assert_eq!(outcome.hostiles_hit, 1);
    assert_eq!(hostile.body.current_health, 2);
}

#[test]
fn player_tint_clears_once_the_attack_stops_landing() {
    let (config, mut player, mut hostile) = setup(140);
    player.attack_box = attack_box_for(player.body.rect, Direction::FaceRight, &config);
    let mut events = Vec::new();

    resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    assert_eq!(player.body.tint, Tint::Highlighted);

    player.attack_box = Rect::EMPTY;
    resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    assert!(!player.body.is_colliding);
    assert!(!player.body.was_colliding);
    assert_eq!(player.body.tint, Tint::Normal);
}

#[test]
fn empty_attack_box_hits_nothing() {
    let (config, mut player, mut hostile) = setup(140);
    let mut events = Vec::new();
    let outcome = resolve_combat(&mut player, std::slice::from_mut(&mut hostile), &config.combat, &mut events);
    assert_eq!(outcome, CombatOutcome::default());
    assert_eq!(hostile.body.current_health, 3);
}
