//! Immutable sprite templates and spawning.
//!
//! One template exists per `SpriteKind`, built once from the config when the
//! game starts. Spawning clones the template's prototype: stats and body are
//! plain values, the clip set is shared behind an `Arc`, and the animation
//! cursor is a fresh copy. It cannot fail and never touches the template.

use std::sync::Arc;

use tg_core::animation::AnimationClip;

use crate::animation::{AnimKey, AnimationSet, Animator};
use crate::config::GameConfig;
use crate::entity::{
    Body, Capabilities, Creature, Entity, EntityId, PlayerStats, PowerUp, PowerUpKind, Role,
    SpriteKind,
};
use crate::tilemap::TileId;

const PLAYER_FRAME_MS: u64 = 200;
const FLY_FRAME_MS: u64 = 50;
const DEATH_FRAME_MS: u64 = 250;
const PICKUP_FRAME_MS: u64 = 150;

#[derive(Debug, Clone)]
pub struct Template {
    pub kind: SpriteKind,
    /// Map character that spawns this kind, if any.
    pub spawn_char: Option<char>,
    prototype: Entity,
}

impl Template {
    pub fn prototype(&self) -> &Entity {
        &self.prototype
    }
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: [Template; SpriteKind::COUNT],
    tile_kinds: u8,
}

impl TemplateRegistry {
    pub fn builtin(config: &GameConfig) -> Self {
        Self {
            templates: SpriteKind::ALL.map(|kind| build_template(kind, config)),
            tile_kinds: config.tile_kinds,
        }
    }

    pub fn template(&self, kind: SpriteKind) -> &Template {
        &self.templates[kind.index()]
    }

    /// A fresh, independent instance of `kind`.
    pub fn spawn(&self, kind: SpriteKind) -> Entity {
        self.templates[kind.index()].prototype.clone()
    }

    pub fn kind_for_char(&self, ch: char) -> Option<SpriteKind> {
        self.templates
            .iter()
            .find(|t| t.spawn_char == Some(ch))
            .map(|t| t.kind)
    }

    /// `'A'` maps to tile 0, `'B'` to tile 1, and so on up to the number of
    /// tile images available.
    pub fn tile_for_char(&self, ch: char) -> Option<TileId> {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        let index = ch as u8 - b'A';
        (index < self.tile_kinds).then_some(TileId(index))
    }

    pub fn tile_kinds(&self) -> u8 {
        self.tile_kinds
    }
}

fn frames(base: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{base}/{i}")).collect()
}

/// Left and right variants of a clip, e.g. `dio/run_left/*`, `dio/run_right/*`.
fn mirrored(
    set: AnimationSet,
    keys: (AnimKey, AnimKey),
    base: &str,
    count: usize,
    frame_ms: u64,
    looping: bool,
) -> AnimationSet {
    set.with(
        keys.0,
        AnimationClip::uniform(frames(&format!("{base}_left"), count), frame_ms, looping),
    )
    .with(
        keys.1,
        AnimationClip::uniform(frames(&format!("{base}_right"), count), frame_ms, looping),
    )
}

fn run_and_die(base: &str, run: (usize, u64), die: (usize, u64)) -> AnimationSet {
    let set = mirrored(
        AnimationSet::new(),
        (AnimKey::RunLeft, AnimKey::RunRight),
        &format!("{base}/run"),
        run.0,
        run.1,
        true,
    );
    mirrored(
        set,
        (AnimKey::DeadLeft, AnimKey::DeadRight),
        &format!("{base}/die"),
        die.0,
        die.1,
        false,
    )
}

fn player_animations() -> AnimationSet {
    let set = run_and_die("player", (6, PLAYER_FRAME_MS), (7, DEATH_FRAME_MS));
    let set = mirrored(
        set,
        (AnimKey::IdleLeft, AnimKey::IdleRight),
        "player/idle",
        4,
        PLAYER_FRAME_MS,
        true,
    );
    let set = mirrored(
        set,
        (AnimKey::JumpLeft, AnimKey::JumpRight),
        "player/jump",
        4,
        PLAYER_FRAME_MS,
        true,
    );
    mirrored(
        set,
        (AnimKey::FallLeft, AnimKey::FallRight),
        "player/fall",
        2,
        PLAYER_FRAME_MS,
        true,
    )
}

fn dio_animations() -> AnimationSet {
    let set = run_and_die("dio", (8, PLAYER_FRAME_MS), (6, DEATH_FRAME_MS));
    mirrored(
        set,
        (AnimKey::AttackLeft, AnimKey::AttackRight),
        "dio/attack",
        3,
        PLAYER_FRAME_MS,
        true,
    )
}

fn pickup_animation(base: &str, count: usize) -> AnimationSet {
    AnimationSet::new().with(
        AnimKey::Idle,
        AnimationClip::uniform(frames(base, count), PICKUP_FRAME_MS, true),
    )
}

fn creature_entity(
    kind: SpriteKind,
    body: Body,
    animations: AnimationSet,
    creature: Creature,
) -> Entity {
    Entity {
        id: EntityId(0),
        kind,
        body,
        animator: Animator::new(Arc::new(animations), AnimKey::RunRight),
        role: Role::Creature(creature),
    }
}

fn power_up_entity(
    kind: SpriteKind,
    size: i32,
    animations: AnimationSet,
    power_up: PowerUp,
) -> Entity {
    Entity {
        id: EntityId(0),
        kind,
        body: Body::new(size, size, size, size),
        animator: Animator::new(Arc::new(animations), AnimKey::Idle),
        role: Role::PowerUp(power_up),
    }
}

fn enemy(
    health: i32,
    damage: i32,
    speed: f32,
    flying: bool,
    enrage: bool,
    config: &GameConfig,
) -> Creature {
    let mut creature = Creature::new(
        health,
        damage,
        speed,
        Capabilities {
            flying,
            timed_upgrade: true,
            enrage,
        },
    );
    creature.die_time_ms = config.creature_die_ms;
    creature.upgrade_at_secs = Some(config.creature_upgrade_secs);
    creature
}

fn build_template(kind: SpriteKind, config: &GameConfig) -> Template {
    let (spawn_char, prototype) = match kind {
        SpriteKind::Player => {
            let stats = PlayerStats::new(5);
            let mut creature = Creature::new(stats.max_hp, 1, 0.5, Capabilities::default());
            creature.die_time_ms = config.player_die_ms;
            creature.on_ground = true;
            creature.player = Some(stats);
            (
                None,
                creature_entity(kind, Body::new(80, 64, 80, 64), player_animations(), creature),
            )
        }
        SpriteKind::FlyCreep => (
            Some('3'),
            creature_entity(
                kind,
                Body::new(64, 48, 64, 48),
                run_and_die("creeps/bat", (5, FLY_FRAME_MS), (5, FLY_FRAME_MS)),
                enemy(2, 1, 0.2, true, false, config),
            ),
        ),
        SpriteKind::ZombieCreep => (
            Some('4'),
            creature_entity(
                kind,
                Body::new(80, 64, 80, 64),
                run_and_die("creeps/zombie", (6, PLAYER_FRAME_MS), (3, DEATH_FRAME_MS)),
                enemy(4, 1, 0.06, true, false, config),
            ),
        ),
        SpriteKind::Dio => (
            Some('5'),
            creature_entity(
                kind,
                Body::new(80, 64, 80, 64),
                dio_animations(),
                enemy(30, 3, 0.1, true, true, config),
            ),
        ),
        SpriteKind::Heart => (
            Some('h'),
            power_up_entity(
                kind,
                48,
                pickup_animation("drops/heart", 3),
                PowerUp {
                    kind: PowerUpKind::Heart,
                    worth: 1,
                },
            ),
        ),
        SpriteKind::Music => (
            Some('m'),
            power_up_entity(
                kind,
                48,
                pickup_animation("drops/music", 3),
                PowerUp {
                    kind: PowerUpKind::Music,
                    worth: 0,
                },
            ),
        ),
        SpriteKind::Goal => (
            Some('*'),
            power_up_entity(
                kind,
                64,
                pickup_animation("drops/goal", 4),
                PowerUp {
                    kind: PowerUpKind::Goal,
                    worth: 0,
                },
            ),
        ),
    };
    Template {
        kind,
        spawn_char,
        prototype,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_spawns_itself() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        for kind in SpriteKind::ALL {
            assert_eq!(registry.spawn(kind).kind, kind);
            assert_eq!(registry.template(kind).kind, kind);
        }
    }

    #[test]
    fn spawned_instances_are_independent() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        let mut a = registry.spawn(SpriteKind::ZombieCreep);
        let b = registry.spawn(SpriteKind::ZombieCreep);
        a.creature_mut().expect("creature").health = -3;
        a.animator.play(AnimKey::RunRight, 250);
        assert_eq!(b.creature().expect("creature").health, 4);
        assert_eq!(b.animator.state().frame_index, 0);
        assert_eq!(
            registry
                .template(SpriteKind::ZombieCreep)
                .prototype()
                .creature()
                .expect("creature")
                .health,
            4
        );
        assert!(a.animator.shares_clips_with(&b.animator));
    }

    #[test]
    fn base_stats_match_kinds() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        let fly = registry.spawn(SpriteKind::FlyCreep);
        let fly = fly.creature().expect("creature");
        assert_eq!((fly.health, fly.damage, fly.worth), (2, 1, 2));
        assert!(fly.caps.flying);

        let zombie = registry.spawn(SpriteKind::ZombieCreep);
        assert!(zombie.creature().expect("creature").caps.flying);

        let dio = registry.spawn(SpriteKind::Dio);
        let dio = dio.creature().expect("creature");
        assert_eq!((dio.health, dio.damage, dio.worth), (30, 3, 30));
        assert!(dio.caps.enrage);

        let player = registry.spawn(SpriteKind::Player);
        let stats = player.player_stats().expect("player stats");
        assert_eq!(stats.max_hp, 5);
        assert_eq!(player.creature().expect("creature").die_time_ms, 1500);
        assert_eq!((player.body.hit_width, player.body.hit_height), (80, 64));
    }

    #[test]
    fn spawn_chars_resolve() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        assert_eq!(registry.kind_for_char('3'), Some(SpriteKind::FlyCreep));
        assert_eq!(registry.kind_for_char('4'), Some(SpriteKind::ZombieCreep));
        assert_eq!(registry.kind_for_char('5'), Some(SpriteKind::Dio));
        assert_eq!(registry.kind_for_char('h'), Some(SpriteKind::Heart));
        assert_eq!(registry.kind_for_char('m'), Some(SpriteKind::Music));
        assert_eq!(registry.kind_for_char('*'), Some(SpriteKind::Goal));
        assert_eq!(registry.kind_for_char('q'), None);
        assert_eq!(registry.kind_for_char(' '), None);
    }

    #[test]
    fn tile_chars_respect_tile_count() {
        let config = GameConfig {
            tile_kinds: 3,
            ..GameConfig::default()
        };
        let registry = TemplateRegistry::builtin(&config);
        assert_eq!(registry.tile_for_char('A'), Some(TileId(0)));
        assert_eq!(registry.tile_for_char('C'), Some(TileId(2)));
        assert_eq!(registry.tile_for_char('D'), None);
        assert_eq!(registry.tile_for_char('a'), None);
    }

    #[test]
    fn player_has_every_pose() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        let player = registry.spawn(SpriteKind::Player);
        let mut animator = player.animator.clone();
        for key in [
            AnimKey::IdleLeft,
            AnimKey::JumpRight,
            AnimKey::FallLeft,
            AnimKey::DeadRight,
        ] {
            animator.play(key, 0);
            assert_eq!(animator.current(), key);
        }
        assert_eq!(animator.frame_id(), "player/die_right/0");
    }
}
