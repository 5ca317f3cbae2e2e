/// Entity-vs-entity resolution for one frame: the player's attack box against
/// every hostile, and every hostile's body against the player.
///
/// Attack hits land on every frame the box overlaps a live hostile; the
/// knockback is what separates them. Contact damage to the player is gated by
/// the invincibility countdown instead.

use crate::config::CombatConfig;
use crate::entities::{Hostile, Player, Tint};
use crate::events::GameEvent;
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    pub hostiles_hit: u32,
    pub kills: u32,
    pub player_damaged: bool,
}

pub fn resolve_combat(
    player: &mut Player,
    hostiles: &mut [Hostile],
    config: &CombatConfig,
    events: &mut Vec<GameEvent>,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();

    player.body.is_colliding = false;
    for hostile in hostiles.iter_mut() {
        hostile.body.is_colliding = false;
    }

    let attack_box = player.attack_box;
    for (index, hostile) in hostiles.iter_mut().enumerate() {
        if attack_box.intersects(&hostile.body.rect) && hostile.body.current_health > 0 {
            knock_back(hostile, attack_box, config.knockback);
            hostile.body.is_colliding = true;
            player.body.is_colliding = true;
            let remaining_health = hostile.body.take_damage(config.attack_damage);
            outcome.hostiles_hit += 1;
            events.push(GameEvent::HostileHit {
                hostile: index,
                remaining_health,
            });

            if remaining_health == 0 && !hostile.defeated {
                hostile.defeated = true;
                hostile.body.rect = Rect::EMPTY;
                outcome.kills += 1;
                events.push(GameEvent::HostileDefeated { hostile: index });
            }
        }

        if hostile.body.rect.intersects(&player.body.rect) {
            player.body.is_colliding = true;
            if player.body.current_health > 0 && player.invincible_ticks == 0 {
                let remaining_health = player.body.take_damage(config.contact_damage);
                player.invincible_ticks = config.invincibility_ticks;
                outcome.player_damaged = true;
                events.push(GameEvent::PlayerHit { remaining_health });
            }
        }
    }

    if !outcome.player_damaged {
        player.invincible_ticks = player.invincible_ticks.saturating_sub(1);
    }

    settle_flags(player, hostiles);
    outcome
}

/// Push away from the attack box's centre.
fn knock_back(hostile: &mut Hostile, attack_box: Rect, distance: i32) {
    let rect = &mut hostile.body.rect;
    if rect.center_x() > attack_box.center_x() {
        rect.x += distance;
    } else {
        rect.x -= distance;
    }
}

fn settle_flags(player: &mut Player, hostiles: &mut [Hostile]) {
    for body in std::iter::once(&mut player.body).chain(hostiles.iter_mut().map(|h| &mut h.body)) {
        body.tint = if body.is_colliding {
            Tint::Highlighted
        } else {
            Tint::Normal
        };
        body.was_colliding = body.is_colliding;
    }
}
