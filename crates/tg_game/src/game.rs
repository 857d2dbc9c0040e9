//! Per-frame simulation.
//!
//! One `update` call advances the world by one step:
//!  1. a dead player reloads the current map and nothing else happens,
//!  2. input sets the player's horizontal speed and jumps,
//!  3. the player moves axis by axis with contact checks in between, then
//!     takes any score-gated upgrades,
//!  4. every other sprite moves, upgrades, enrages and animates in list order,
//!     with creatures that were already dead swept out afterwards.
//!
//! Audio and UI are not part of the simulation; they observe it through the
//! `GameEvent`s drained after each frame.

use tg_core::input::{Action, ActionSource};

use crate::behavior;
use crate::config::GameConfig;
use crate::contact::{self, ContactOutcome, ContactRules};
use crate::entity::{EntityId, LifeState, PowerUpKind, SpriteKind};
use crate::map_loader::{self, Campaign, MapSource};
use crate::physics::{self, Terrain};
use crate::templates::TemplateRegistry;
use crate::tilemap::TileMap;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    MapLoaded { index: u32 },
    MapReloaded { index: u32 },
    PowerUpCollected { kind: PowerUpKind },
    MusicToggled { muted: bool },
    Stomped { kind: SpriteKind, damage: i32 },
    CreatureKilled { kind: SpriteKind, worth: i32 },
    BossDefeated { seconds: u64 },
    PlayerHurt { by: SpriteKind, damage: i32 },
    PlayerDied,
    PlayerUpgraded { gate: usize },
    LevelUp { level: u32 },
    CreatureUpgraded { id: EntityId, kind: SpriteKind },
    BossEnraged { id: EntityId },
    ExitRequested,
}

pub struct Game {
    config: GameConfig,
    registry: TemplateRegistry,
    campaign: Campaign,
    map: TileMap,
    rules: ContactRules,
    elapsed_ms: u64,
    done_secs: Option<u64>,
    music_muted: bool,
    exit_requested: bool,
    events: Vec<GameEvent>,
}

impl Game {
    /// Build the templates and load the first map of the campaign.
    pub fn new(config: GameConfig, source: Box<dyn MapSource>) -> Result<Self, String> {
        let registry = TemplateRegistry::builtin(&config);
        let mut campaign = Campaign::new(source);
        let layout = campaign.load_next(&registry)?;

        let mut player = registry.spawn(SpriteKind::Player);
        map_loader::place_player(&mut player, config.player_spawn_tile_x);
        let map = TileMap::new(layout, player);
        let index = campaign.current();

        Ok(Self {
            rules: ContactRules::from(&config),
            config,
            registry,
            campaign,
            map,
            elapsed_ms: 0,
            done_secs: None,
            music_muted: false,
            exit_requested: false,
            events: vec![GameEvent::MapLoaded { index }],
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    pub fn current_map(&self) -> u32 {
        self.campaign.current()
    }

    /// Whole seconds of simulated time since the game started.
    pub fn seconds_passed(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    /// Seconds on the clock when the boss fell.
    pub fn done_secs(&self) -> Option<u64> {
        self.done_secs
    }

    pub fn is_won(&self) -> bool {
        self.map.player.player_stats().is_some_and(|stats| stats.win)
    }

    pub fn music_muted(&self) -> bool {
        self.music_muted
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn update(&mut self, actions: &impl ActionSource, elapsed_ms: u64) -> Result<(), String> {
        self.elapsed_ms += elapsed_ms;

        if self.map.player.life_state() == Some(LifeState::Dead) {
            return self.reload_map();
        }

        self.apply_input(actions);
        self.update_player(elapsed_ms)?;
        behavior::animate(&mut self.map.player, elapsed_ms);
        self.update_sprites(elapsed_ms);
        Ok(())
    }

    fn apply_input(&mut self, actions: &impl ActionSource) {
        if actions.is_pressed(Action::Exit) && !self.exit_requested {
            log::info!("exit requested");
            self.exit_requested = true;
            self.events.push(GameEvent::ExitRequested);
        }

        let player = &mut self.map.player;
        let Some(speed) = player.creature().filter(|c| c.is_alive()).map(|c| c.speed) else {
            return;
        };
        let mut vx = 0.0;
        if actions.is_pressed(Action::MoveLeft) {
            vx -= speed;
        }
        if actions.is_pressed(Action::MoveRight) {
            vx += speed;
        }
        if actions.is_pressed(Action::Jump) {
            player.jump(false);
        }
        player.body.vel.x = vx;
    }

    fn update_player(&mut self, elapsed_ms: u64) -> Result<(), String> {
        physics::apply_gravity(&mut self.map.player, self.config.gravity, elapsed_ms);

        let terrain = Terrain {
            grid: &self.map.grid,
            boundary: self.config.boundary,
        };
        physics::move_horizontal(&mut self.map.player, terrain, elapsed_ms);
        self.check_player_contact(false)?;

        // A goal touched above may have swapped the grid.
        let terrain = Terrain {
            grid: &self.map.grid,
            boundary: self.config.boundary,
        };
        let step = physics::move_vertical(&mut self.map.player, terrain, elapsed_ms);
        self.check_player_contact(step.moved_down())?;

        for gate in behavior::apply_score_gates(&mut self.map.player) {
            self.events.push(GameEvent::PlayerUpgraded { gate });
        }
        Ok(())
    }

    fn check_player_contact(&mut self, can_kill: bool) -> Result<(), String> {
        match contact::resolve_player_contact(&mut self.map, can_kill, &self.rules) {
            ContactOutcome::Nothing => {}
            ContactOutcome::PickedUp { power_up, .. } => {
                self.events.push(GameEvent::PowerUpCollected {
                    kind: power_up.kind,
                });
                match power_up.kind {
                    PowerUpKind::Heart => {}
                    PowerUpKind::Music => {
                        self.music_muted = !self.music_muted;
                        log::info!("drums {}", if self.music_muted { "muted" } else { "on" });
                        self.events.push(GameEvent::MusicToggled {
                            muted: self.music_muted,
                        });
                    }
                    PowerUpKind::Goal => self.advance_map()?,
                }
            }
            ContactOutcome::Stomped {
                kind,
                damage,
                killed,
                worth,
                levels_gained,
                ..
            } => {
                self.events.push(GameEvent::Stomped { kind, damage });
                if killed {
                    self.events.push(GameEvent::CreatureKilled { kind, worth });
                }
                if levels_gained > 0 {
                    let level = self.map.player.player_stats().map_or(1, |s| s.level);
                    self.events.push(GameEvent::LevelUp { level });
                }
                if killed && kind == SpriteKind::Dio {
                    let seconds = self.seconds_passed();
                    log::info!("boss defeated after {seconds}s");
                    self.done_secs = Some(seconds);
                    self.events.push(GameEvent::BossDefeated { seconds });
                }
            }
            ContactOutcome::Hurt { by, damage, lethal } => {
                self.events.push(GameEvent::PlayerHurt { by, damage });
                if lethal {
                    self.events.push(GameEvent::PlayerDied);
                }
            }
        }
        Ok(())
    }

    fn update_sprites(&mut self, elapsed_ms: u64) {
        let seconds = self.seconds_passed();
        let terrain = Terrain {
            grid: &self.map.grid,
            boundary: self.config.boundary,
        };

        let mut swept = Vec::new();
        for sprite in self.map.sprites.iter_mut() {
            if sprite.is_creature() {
                if sprite.life_state() == Some(LifeState::Dead) {
                    swept.push(sprite.id);
                    continue;
                }
                physics::step_creature(sprite, terrain, self.config.gravity, elapsed_ms);
                if behavior::apply_timed_upgrade(sprite, seconds) {
                    self.events.push(GameEvent::CreatureUpgraded {
                        id: sprite.id,
                        kind: sprite.kind,
                    });
                }
                if behavior::apply_enrage(sprite, self.config.enrage_threshold) {
                    self.events.push(GameEvent::BossEnraged { id: sprite.id });
                }
            }
            behavior::animate(sprite, elapsed_ms);
        }

        if !swept.is_empty() {
            log::debug!("removing {} dead sprites", swept.len());
            self.map.sprites.retain(|sprite| !swept.contains(&sprite.id));
        }
    }

    fn advance_map(&mut self) -> Result<(), String> {
        let layout = self.campaign.load_next(&self.registry)?;
        self.map.replace_layout(layout);
        map_loader::place_player(&mut self.map.player, self.config.player_spawn_tile_x);
        self.events.push(GameEvent::MapLoaded {
            index: self.campaign.current(),
        });
        Ok(())
    }

    fn reload_map(&mut self) -> Result<(), String> {
        let layout = self.campaign.reload(&self.registry)?;
        self.map.replace_layout(layout);
        map_loader::place_player(&mut self.map.player, self.config.player_spawn_tile_x);
        self.events.push(GameEvent::MapReloaded {
            index: self.campaign.current(),
        });
        Ok(())
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("map", &self.campaign.current())
            .field("elapsed_ms", &self.elapsed_ms)
            .field("sprites", &self.map.sprites.len())
            .finish_non_exhaustive()
    }
}
