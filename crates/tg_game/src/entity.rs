//! The entity record every sprite on a map is made of.
//!
//! Rather than a class hierarchy, an `Entity` is a flat record: a physics
//! `Body`, an `Animator`, and a `Role` that is either a living `Creature`
//! (player or enemy) or an inert `PowerUp`. Per-kind differences (animation
//! rule, upgrade and enrage transforms, collision response) are dispatched on
//! `SpriteKind` in `behavior`.

use glam::Vec2;

use crate::animation::Animator;
use crate::coords::round_px;

/// Upward velocity applied when the player jumps, in px/ms.
pub const JUMP_SPEED: f32 = -0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Every kind of sprite a template can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    FlyCreep,
    ZombieCreep,
    Dio,
    Heart,
    Music,
    Goal,
}

impl SpriteKind {
    pub const COUNT: usize = 7;

    pub const ALL: [SpriteKind; Self::COUNT] = [
        SpriteKind::Player,
        SpriteKind::FlyCreep,
        SpriteKind::ZombieCreep,
        SpriteKind::Dio,
        SpriteKind::Heart,
        SpriteKind::Music,
        SpriteKind::Goal,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::FlyCreep => "fly creep",
            Self::ZombieCreep => "zombie creep",
            Self::Dio => "Dio",
            Self::Heart => "heart",
            Self::Music => "music",
            Self::Goal => "goal",
        }
    }
}

impl std::fmt::Display for SpriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Position and velocity plus two boxes: the frame size used against tiles and
/// a fixed logical hit box used against other sprites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: i32,
    pub height: i32,
    pub hit_width: i32,
    pub hit_height: i32,
}

impl Body {
    pub fn new(width: i32, height: i32, hit_width: i32, hit_height: i32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            width,
            height,
            hit_width,
            hit_height,
        }
    }

    /// Hit box in whole pixels as `(x1, y1, x2, y2)`, right/bottom exclusive.
    pub fn hit_rect(&self) -> (i32, i32, i32, i32) {
        let x = round_px(self.pos.x);
        let y = round_px(self.pos.y);
        (x, y, x + self.hit_width, y + self.hit_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Normal,
    Dying,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Behaviour switches a creature template is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub flying: bool,
    pub timed_upgrade: bool,
    pub enrage: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub state: LifeState,
    pub state_time_ms: u64,
    pub die_time_ms: u64,
    pub health: i32,
    pub damage: i32,
    pub worth: i32,
    pub speed: f32,
    pub caps: Capabilities,
    pub on_ground: bool,
    pub facing: Facing,
    /// Elapsed seconds after which the timed upgrade fires; `None` once spent
    /// or for kinds that never upgrade on a timer.
    pub upgrade_at_secs: Option<u64>,
    pub enraged: bool,
    pub player: Option<PlayerStats>,
}

impl Creature {
    pub fn new(health: i32, damage: i32, speed: f32, caps: Capabilities) -> Self {
        Self {
            state: LifeState::Normal,
            state_time_ms: 0,
            die_time_ms: 1000,
            health,
            damage,
            worth: health,
            speed,
            caps,
            on_ground: false,
            facing: Facing::Right,
            upgrade_at_secs: None,
            enraged: false,
            player: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Normal
    }

    /// Flying creatures ignore gravity, but only while alive: a dying flyer
    /// drops out of the sky.
    pub fn is_flying(&self) -> bool {
        self.caps.flying && self.is_alive()
    }
}

/// Progress that only the player carries.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub score: i32,
    /// Score thresholds for the three one-shot upgrades; `None` once consumed.
    pub gates: [Option<i32>; 3],
    pub max_hp: i32,
    pub win: bool,
    pub level: u32,
    pub exp: i32,
    pub to_next_level: i32,
}

impl PlayerStats {
    pub fn new(max_hp: i32) -> Self {
        Self {
            score: 0,
            gates: [Some(10), Some(20), Some(30)],
            max_hp,
            win: false,
            level: 1,
            exp: 0,
            to_next_level: LEVEL_EXP_STEP,
        }
    }
}

/// Experience needed for the first level, and the increase per level after.
pub const LEVEL_EXP_STEP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Heart,
    Music,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub worth: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Creature(Creature),
    PowerUp(PowerUp),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: SpriteKind,
    pub body: Body,
    pub animator: Animator,
    pub role: Role,
}

impl Entity {
    pub fn creature(&self) -> Option<&Creature> {
        match &self.role {
            Role::Creature(c) => Some(c),
            Role::PowerUp(_) => None,
        }
    }

    pub fn creature_mut(&mut self) -> Option<&mut Creature> {
        match &mut self.role {
            Role::Creature(c) => Some(c),
            Role::PowerUp(_) => None,
        }
    }

    pub fn power_up(&self) -> Option<PowerUp> {
        match &self.role {
            Role::PowerUp(p) => Some(*p),
            Role::Creature(_) => None,
        }
    }

    pub fn player_stats(&self) -> Option<&PlayerStats> {
        self.creature().and_then(|c| c.player.as_ref())
    }

    pub fn player_stats_mut(&mut self) -> Option<&mut PlayerStats> {
        self.creature_mut().and_then(|c| c.player.as_mut())
    }

    pub fn is_creature(&self) -> bool {
        matches!(self.role, Role::Creature(_))
    }

    /// True for creatures in the NORMAL state. Power-ups have no life cycle and
    /// are never considered dead.
    pub fn is_alive_creature(&self) -> bool {
        self.creature().is_some_and(Creature::is_alive)
    }

    pub fn is_dead_creature(&self) -> bool {
        self.creature().is_some_and(|c| !c.is_alive())
    }

    pub fn life_state(&self) -> Option<LifeState> {
        self.creature().map(|c| c.state)
    }

    /// Move along the NORMAL -> DYING -> DEAD chain. Entering a new state resets
    /// the state clock; entering DYING also stops the body. Going backwards is
    /// only allowed to NORMAL, which is how a map reload revives the player.
    pub fn set_life_state(&mut self, state: LifeState) {
        let Role::Creature(creature) = &mut self.role else {
            return;
        };
        if creature.state == state {
            return;
        }
        let forward = matches!(
            (creature.state, state),
            (LifeState::Normal, LifeState::Dying) | (LifeState::Dying, LifeState::Dead)
        );
        if !forward && state != LifeState::Normal {
            log::warn!(
                "{} {:?}: ignoring state change {:?} -> {:?}",
                self.kind,
                self.id,
                creature.state,
                state
            );
            return;
        }
        creature.state = state;
        creature.state_time_ms = 0;
        if state == LifeState::Dying {
            self.body.vel = Vec2::ZERO;
        }
    }

    /// Launch upward if standing on something, or unconditionally when
    /// `force` is set (bouncing off a stomped creature).
    pub fn jump(&mut self, force: bool) {
        let Role::Creature(creature) = &mut self.role else {
            return;
        };
        if creature.on_ground || force {
            creature.on_ground = false;
            self.body.vel.y = JUMP_SPEED;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimKey, AnimationSet};
    use std::sync::Arc;

    fn creature_entity(caps: Capabilities) -> Entity {
        Entity {
            id: EntityId(1),
            kind: SpriteKind::ZombieCreep,
            body: Body::new(64, 64, 80, 64),
            animator: Animator::new(Arc::new(AnimationSet::new()), AnimKey::RunLeft),
            role: Role::Creature(Creature::new(4, 1, 0.06, caps)),
        }
    }

    #[test]
    fn dying_stops_the_body_and_resets_clock() {
        let mut e = creature_entity(Capabilities::default());
        e.body.vel = Vec2::new(0.3, -0.2);
        e.creature_mut().expect("creature").state_time_ms = 500;
        e.set_life_state(LifeState::Dying);
        assert_eq!(e.body.vel, Vec2::ZERO);
        assert_eq!(e.life_state(), Some(LifeState::Dying));
        assert_eq!(e.creature().expect("creature").state_time_ms, 0);
    }

    #[test]
    fn state_never_moves_backwards_to_dying() {
        let mut e = creature_entity(Capabilities::default());
        e.set_life_state(LifeState::Dying);
        e.set_life_state(LifeState::Dead);
        e.set_life_state(LifeState::Dying);
        assert_eq!(e.life_state(), Some(LifeState::Dead));
    }

    #[test]
    fn skipping_dying_is_rejected() {
        let mut e = creature_entity(Capabilities::default());
        e.set_life_state(LifeState::Dead);
        assert_eq!(e.life_state(), Some(LifeState::Normal));
    }

    #[test]
    fn flyers_lose_flight_when_dying() {
        let mut e = creature_entity(Capabilities {
            flying: true,
            ..Capabilities::default()
        });
        assert!(e.creature().expect("creature").is_flying());
        e.set_life_state(LifeState::Dying);
        assert!(!e.creature().expect("creature").is_flying());
    }

    #[test]
    fn jump_requires_ground_unless_forced() {
        let mut e = creature_entity(Capabilities::default());
        e.jump(false);
        assert_eq!(e.body.vel.y, 0.0);

        e.creature_mut().expect("creature").on_ground = true;
        e.jump(false);
        assert_eq!(e.body.vel.y, JUMP_SPEED);
        assert!(!e.creature().expect("creature").on_ground);

        e.body.vel.y = 0.0;
        e.jump(true);
        assert_eq!(e.body.vel.y, JUMP_SPEED);
    }

    #[test]
    fn hit_rect_rounds_position() {
        let mut body = Body::new(10, 10, 80, 64);
        body.pos = Vec2::new(10.5, 19.4);
        assert_eq!(body.hit_rect(), (11, 19, 91, 83));
    }
}
