//! Player contact with other sprites.
//!
//! Checked twice per player step: after the horizontal move with stomping
//! disabled, and after the vertical move with stomping enabled only if the
//! player ended lower than they started. Landing on a creature damages it and
//! bounces the player; any other creature contact damages the player. Power-ups
//! are removed from the map on first touch, so none can be collected twice.

use crate::behavior;
use crate::collision::sprite_collision;
use crate::config::{GameConfig, Nudge, ScorePenalty};
use crate::entity::{EntityId, LifeState, PowerUp, PowerUpKind, SpriteKind};
use crate::physics;
use crate::tilemap::TileMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRules {
    pub score_penalty: ScorePenalty,
    pub grace_nudge: Nudge,
}

impl From<&GameConfig> for ContactRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            score_penalty: config.score_penalty,
            grace_nudge: config.grace_nudge,
        }
    }
}

/// What a contact check did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    /// Player not alive, or touching nothing.
    Nothing,
    /// The power-up was removed from the map. Hearts have already healed the
    /// player; the other effects belong to the caller.
    PickedUp { id: EntityId, power_up: PowerUp },
    Stomped {
        id: EntityId,
        kind: SpriteKind,
        damage: i32,
        killed: bool,
        worth: i32,
        levels_gained: u32,
    },
    Hurt {
        by: SpriteKind,
        damage: i32,
        lethal: bool,
    },
}

pub fn resolve_player_contact(
    map: &mut TileMap,
    can_kill: bool,
    rules: &ContactRules,
) -> ContactOutcome {
    if !map.player.is_alive_creature() {
        return ContactOutcome::Nothing;
    }
    let Some(index) = sprite_collision(&map.player, &map.sprites) else {
        return ContactOutcome::Nothing;
    };

    if let Some(power_up) = map.sprites[index].power_up() {
        let sprite = map.sprites.remove(index);
        if power_up.kind == PowerUpKind::Heart {
            heal(map, power_up.worth);
        }
        log::info!("picked up {} {:?}", sprite.kind, sprite.id);
        return ContactOutcome::PickedUp {
            id: sprite.id,
            power_up,
        };
    }

    if can_kill {
        stomp(map, index)
    } else {
        hurt(map, index, rules)
    }
}

fn heal(map: &mut TileMap, amount: i32) {
    let Some(creature) = map.player.creature_mut() else {
        return;
    };
    let max_hp = creature
        .player
        .as_ref()
        .map_or(creature.health, |stats| stats.max_hp);
    creature.health = (creature.health + amount).min(max_hp.max(creature.health));
}

fn stomp(map: &mut TileMap, index: usize) -> ContactOutcome {
    let player_damage = map.player.creature().map_or(0, |c| c.damage);

    let victim = &mut map.sprites[index];
    let (killed, worth) = match victim.creature_mut() {
        Some(creature) => {
            creature.health -= player_damage;
            (creature.health <= 0, creature.worth)
        }
        None => (false, 0),
    };
    if killed {
        victim.set_life_state(LifeState::Dying);
        log::info!("{} {:?} killed, worth {}", victim.kind, victim.id, worth);
    }
    let (id, kind, victim_y) = (victim.id, victim.kind, victim.body.pos.y);

    let mut levels_gained = 0;
    if killed {
        if let Some(stats) = map.player.player_stats_mut() {
            levels_gained = behavior::award_kill(stats, worth);
            if kind == SpriteKind::Dio {
                stats.win = true;
            }
        }
    }

    let bounce_y = victim_y - map.player.body.height as f32;
    physics::set_y(&mut map.player, bounce_y);
    map.player.jump(true);

    ContactOutcome::Stomped {
        id,
        kind,
        damage: player_damage,
        killed,
        worth: if killed { worth } else { 0 },
        levels_gained,
    }
}

fn hurt(map: &mut TileMap, index: usize, rules: &ContactRules) -> ContactOutcome {
    let attacker = &map.sprites[index];
    let by = attacker.kind;
    let damage = attacker.creature().map_or(0, |c| c.damage);

    let player = &mut map.player;
    let lethal = match player.creature_mut() {
        Some(creature) => {
            creature.health -= damage;
            creature.health <= 0
        }
        None => false,
    };

    if lethal {
        log::info!("player killed by {by}");
        player.set_life_state(LifeState::Dying);
        behavior::reset_after_death(player, rules.score_penalty);
    } else {
        player.body.pos.x -= rules.grace_nudge.x;
        player.body.pos.y -= rules.grace_nudge.y;
    }

    ContactOutcome::Hurt { by, damage, lethal }
}
