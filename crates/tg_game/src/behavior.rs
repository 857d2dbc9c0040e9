//! Per-kind creature behaviour.
//!
//! All creatures share one record (`Creature`); the few rules that differ by
//! kind are dispatched here on `SpriteKind`:
//!  - which animation to show for the current physical state,
//!  - how a horizontal tile hit is answered (stop vs. turn around),
//!  - the one-shot timed upgrade, the boss enrage, and the player's
//!    score-gated upgrades.

use crate::animation::AnimKey;
use crate::config::ScorePenalty;
use crate::entity::{Creature, Entity, Facing, LifeState, PlayerStats, SpriteKind, LEVEL_EXP_STEP};

fn sided(facing: Facing, left: AnimKey, right: AnimKey) -> AnimKey {
    match facing {
        Facing::Left => left,
        Facing::Right => right,
    }
}

/// Pose for the current physical state, first matching rule wins. `None`
/// keeps whatever is showing.
pub fn select_pose(kind: SpriteKind, creature: &Creature, vx: f32, vy: f32) -> Option<AnimKey> {
    let facing = creature.facing;
    if creature.state == LifeState::Dying {
        return Some(sided(facing, AnimKey::DeadLeft, AnimKey::DeadRight));
    }
    if vx < 0.0 {
        return Some(if creature.enraged {
            AnimKey::AttackLeft
        } else {
            AnimKey::RunLeft
        });
    }
    if vx > 0.0 {
        return Some(if creature.enraged {
            AnimKey::AttackRight
        } else {
            AnimKey::RunRight
        });
    }
    if kind != SpriteKind::Player {
        return None;
    }
    if creature.on_ground && vy == 0.0 && creature.state == LifeState::Normal {
        return Some(sided(facing, AnimKey::IdleLeft, AnimKey::IdleRight));
    }
    if vy < 0.0 {
        return Some(sided(facing, AnimKey::JumpLeft, AnimKey::JumpRight));
    }
    if !creature.on_ground && vy > 0.0 {
        return Some(sided(facing, AnimKey::FallLeft, AnimKey::FallRight));
    }
    None
}

/// Per-frame animation and life-cycle update for any entity.
///
/// Creatures update their facing from horizontal velocity, pick a pose, and
/// count down the dying timer; once it runs out the creature is DEAD.
pub fn animate(entity: &mut Entity, elapsed_ms: u64) {
    let vel = entity.body.vel;
    let kind = entity.kind;
    let Some(creature) = entity.creature_mut() else {
        entity.animator.advance(elapsed_ms);
        return;
    };

    if creature.state == LifeState::Normal {
        if vel.x < 0.0 {
            creature.facing = Facing::Left;
        } else if vel.x > 0.0 {
            creature.facing = Facing::Right;
        }
    }

    let pose = select_pose(kind, creature, vel.x, vel.y);
    creature.state_time_ms += elapsed_ms;
    let expired = creature.state == LifeState::Dying && creature.state_time_ms >= creature.die_time_ms;

    match pose {
        Some(key) => entity.animator.play(key, elapsed_ms),
        None => entity.animator.advance(elapsed_ms),
    }

    if expired {
        log::debug!("{} {:?} is dead", entity.kind, entity.id);
        entity.set_life_state(LifeState::Dead);
    }
}

/// Response to a blocked horizontal move: the player stops, every other
/// creature turns around instead of stopping, so patrols bounce between walls.
pub fn collide_horizontal(entity: &mut Entity) {
    if entity.kind == SpriteKind::Player {
        entity.body.vel.x = 0.0;
    } else {
        entity.body.vel.x = -entity.body.vel.x;
    }
}

/// Response to a blocked vertical move. Landing (moving down) grounds the
/// creature; either way vertical motion stops.
pub fn collide_vertical(entity: &mut Entity) {
    let falling = entity.body.vel.y > 0.0;
    if let Some(creature) = entity.creature_mut() {
        if falling {
            creature.on_ground = true;
        }
    }
    entity.body.vel.y = 0.0;
}

/// Start a resting enemy walking toward the left once it is on screen.
pub fn wake_up(entity: &mut Entity) {
    if entity.kind == SpriteKind::Player {
        return;
    }
    let resting_speed = entity
        .creature()
        .filter(|c| c.state == LifeState::Normal)
        .map(|c| c.speed);
    if let Some(speed) = resting_speed {
        if entity.body.vel.x == 0.0 {
            entity.body.vel.x = -speed;
        }
    }
}

/// Fire the creature's timed upgrade once `seconds_passed` reaches its gate.
/// Returns true if the upgrade fired this call.
pub fn apply_timed_upgrade(entity: &mut Entity, seconds_passed: u64) -> bool {
    let kind = entity.kind;
    let Some(creature) = entity.creature_mut() else {
        return false;
    };
    if !creature.caps.timed_upgrade || !creature.is_alive() {
        return false;
    }
    match creature.upgrade_at_secs {
        Some(at) if seconds_passed >= at => {}
        _ => return false,
    }

    let (health, damage, speed) = match kind {
        SpriteKind::FlyCreep => (1, 1, 0.1),
        SpriteKind::ZombieCreep => (2, 2, 0.05),
        SpriteKind::Dio => (10, 3, 0.1),
        _ => (0, 0, 0.0),
    };
    creature.health += health;
    creature.damage += damage;
    creature.speed += speed;
    creature.worth = creature.health;
    creature.upgrade_at_secs = None;
    log::info!(
        "{} upgraded: hp {} dmg {} speed {:.2}",
        kind,
        creature.health,
        creature.damage,
        creature.speed
    );
    true
}

/// One-shot boss enrage once health falls to `threshold` or below. Returns
/// true if the enrage fired this call.
pub fn apply_enrage(entity: &mut Entity, threshold: i32) -> bool {
    let kind = entity.kind;
    let Some(creature) = entity.creature_mut() else {
        return false;
    };
    if !creature.caps.enrage
        || creature.enraged
        || !creature.is_alive()
        || creature.health > threshold
    {
        return false;
    }
    creature.health *= 2;
    creature.damage *= 2;
    creature.speed *= 1.5;
    creature.worth = creature.health;
    creature.enraged = true;
    log::info!(
        "{} enraged: hp {} dmg {}",
        kind,
        creature.health,
        creature.damage
    );
    true
}

/// Apply every score-gated upgrade the player's score has reached, in gate
/// order. Returns the 1-based numbers of the gates consumed.
pub fn apply_score_gates(entity: &mut Entity) -> Vec<usize> {
    let Some(creature) = entity.creature_mut() else {
        return Vec::new();
    };
    let Some(stats) = creature.player.as_mut() else {
        return Vec::new();
    };

    let mut fired = Vec::new();
    for (index, gate) in stats.gates.iter_mut().enumerate() {
        let Some(threshold) = *gate else {
            continue;
        };
        if stats.score < threshold {
            continue;
        }
        *gate = None;
        if index == 0 {
            stats.max_hp += 3;
            creature.damage += 1;
        } else {
            stats.max_hp += 2;
            creature.damage += 1;
            creature.speed += 0.1;
        }
        creature.health = stats.max_hp;
        log::info!(
            "player upgrade {}: max hp {} dmg {} speed {:.2}",
            index + 1,
            stats.max_hp,
            creature.damage,
            creature.speed
        );
        fired.push(index + 1);
    }
    fired
}

/// Credit a kill worth `worth` to score and experience. Returns the number of
/// levels gained.
pub fn award_kill(stats: &mut PlayerStats, worth: i32) -> u32 {
    stats.score += worth;
    stats.exp += worth.max(0);
    let mut gained = 0;
    while stats.to_next_level > 0 && stats.exp >= stats.to_next_level {
        stats.exp -= stats.to_next_level;
        stats.to_next_level += LEVEL_EXP_STEP;
        stats.level += 1;
        gained += 1;
    }
    gained
}

/// Restore the player for their next life after a lethal hit.
pub fn reset_after_death(entity: &mut Entity, penalty: ScorePenalty) {
    let Some(creature) = entity.creature_mut() else {
        return;
    };
    let Some(stats) = creature.player.as_mut() else {
        return;
    };
    creature.health = stats.max_hp;
    stats.score = penalty.apply(stats.score);
    log::info!(
        "player reset: hp {} score {} ({:?})",
        creature.health,
        stats.score,
        penalty
    );
}
