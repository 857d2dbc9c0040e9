//! Read-only status readout for a HUD.

use crate::game::Game;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudSnapshot {
    pub seconds: u64,
    pub level: u32,
    pub health: i32,
    pub max_hp: i32,
    pub damage: i32,
    pub score: i32,
    pub exp: i32,
    pub to_next_level: i32,
    pub baddies: usize,
    pub map: u32,
    /// Seconds on the clock when the boss fell, once it has.
    pub done_secs: Option<u64>,
    pub win: bool,
}

impl HudSnapshot {
    pub fn capture(game: &Game) -> Self {
        let map = game.map();
        let creature = map.player.creature();
        let stats = map.player.player_stats();
        Self {
            seconds: game.seconds_passed(),
            level: stats.map_or(1, |s| s.level),
            health: creature.map_or(0, |c| c.health),
            max_hp: stats.map_or(0, |s| s.max_hp),
            damage: creature.map_or(0, |c| c.damage),
            score: stats.map_or(0, |s| s.score),
            exp: stats.map_or(0, |s| s.exp),
            to_next_level: stats.map_or(0, |s| s.to_next_level),
            baddies: map.live_creature_count(),
            map: game.current_map(),
            done_secs: game.done_secs(),
            win: stats.is_some_and(|s| s.win),
        }
    }

    /// In-game status lines.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Time: {}", self.seconds),
            format!("Level: {}", self.level),
            format!("HP: {}/{}", self.health, self.max_hp),
            format!("DMG: {}", self.damage),
            format!("Score: {}", self.score),
            format!("EXP: {}/{}", self.exp, self.to_next_level),
            format!("Baddies: {}", self.baddies),
        ]
    }

    /// End-of-game summary.
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Time: {}", self.done_secs.unwrap_or(self.seconds)),
            format!("HP: {}", self.health),
            format!("DMG: {}", self.damage),
            format!("Score: {}", self.score),
        ];
        if self.win {
            lines.push("you win :)".to_string());
        } else {
            lines.push("you lose :(".to_string());
            lines.push("the boss still stands".to_string());
        }
        lines
    }
}
