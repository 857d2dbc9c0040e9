//! Gravity and axis-separated movement against the tile grid.
//!
//! Each axis is resolved on its own: X first with the current Y, then Y with
//! the already-resolved X. A blocked move snaps the leading edge flush with the
//! blocking tile and hands the hit to the per-kind response in `behavior`.

use crate::behavior;
use crate::collision::tile_collision;
use crate::config::BoundaryPolicy;
use crate::coords::{round_px, tiles_to_pixels};
use crate::entity::Entity;
use crate::tilemap::TileGrid;

/// Grid plus the edge rule movement is resolved against.
#[derive(Debug, Clone, Copy)]
pub struct Terrain<'a> {
    pub grid: &'a TileGrid,
    pub boundary: BoundaryPolicy,
}

/// Result of a vertical step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalStep {
    pub old_y: f32,
    pub new_y: f32,
    pub collided: bool,
}

impl VerticalStep {
    /// The body ended lower than it started: contact after this step is a stomp.
    pub fn moved_down(&self) -> bool {
        self.old_y < self.new_y
    }
}

pub fn apply_gravity(entity: &mut Entity, gravity: f32, elapsed_ms: u64) {
    let Some(creature) = entity.creature() else {
        return;
    };
    if !creature.is_flying() {
        entity.body.vel.y += gravity * elapsed_ms as f32;
    }
}

/// Move vertically to `y`. Dropping into a lower pixel row means the creature
/// is no longer standing on anything.
pub fn set_y(entity: &mut Entity, y: f32) {
    let dropped = round_px(y) > round_px(entity.body.pos.y);
    entity.body.pos.y = y;
    if dropped {
        if let Some(creature) = entity.creature_mut() {
            creature.on_ground = false;
        }
    }
}

/// Horizontal half of a move. Returns true if a tile blocked it.
pub fn move_horizontal(entity: &mut Entity, terrain: Terrain<'_>, elapsed_ms: u64) -> bool {
    let dx = entity.body.vel.x;
    let new_x = entity.body.pos.x + dx * elapsed_ms as f32;
    let hit = tile_collision(
        terrain.grid,
        &entity.body,
        new_x,
        entity.body.pos.y,
        terrain.boundary,
    );
    let Some((tile_x, _)) = hit else {
        entity.body.pos.x = new_x;
        return false;
    };

    if dx > 0.0 {
        entity.body.pos.x = (tiles_to_pixels(tile_x) - entity.body.width) as f32;
    } else if dx < 0.0 {
        entity.body.pos.x = tiles_to_pixels(tile_x + 1) as f32;
    }
    behavior::collide_horizontal(entity);
    true
}

/// Vertical half of a move.
pub fn move_vertical(entity: &mut Entity, terrain: Terrain<'_>, elapsed_ms: u64) -> VerticalStep {
    let dy = entity.body.vel.y;
    let old_y = entity.body.pos.y;
    let new_y = old_y + dy * elapsed_ms as f32;
    let hit = tile_collision(
        terrain.grid,
        &entity.body,
        entity.body.pos.x,
        new_y,
        terrain.boundary,
    );

    let collided = match hit {
        None => {
            set_y(entity, new_y);
            false
        }
        Some((_, tile_y)) => {
            if dy > 0.0 {
                set_y(entity, (tiles_to_pixels(tile_y) - entity.body.height) as f32);
            } else if dy < 0.0 {
                set_y(entity, tiles_to_pixels(tile_y + 1) as f32);
            }
            behavior::collide_vertical(entity);
            true
        }
    };

    VerticalStep {
        old_y,
        new_y: entity.body.pos.y,
        collided,
    }
}

/// Gravity plus both movement halves, for creatures with no contact checks
/// between the axes.
pub fn step_creature(entity: &mut Entity, terrain: Terrain<'_>, gravity: f32, elapsed_ms: u64) {
    apply_gravity(entity, gravity, elapsed_ms);
    move_horizontal(entity, terrain, elapsed_ms);
    move_vertical(entity, terrain, elapsed_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::{LifeState, SpriteKind};
    use crate::templates::TemplateRegistry;
    use crate::tilemap::TileId;
    use glam::Vec2;

    const GRAVITY: f32 = 0.002;

    fn spawn(kind: SpriteKind, x: f32, y: f32) -> Entity {
        let mut e = TemplateRegistry::builtin(&GameConfig::default()).spawn(kind);
        e.body.pos = Vec2::new(x, y);
        e
    }

    fn floor_grid(width: i32, height: i32, floor_row: i32) -> TileGrid {
        let mut grid = TileGrid::new(width, height);
        for x in 0..width {
            grid.set_tile(x, floor_row, Some(TileId(0)));
        }
        grid
    }

    fn terrain(grid: &TileGrid) -> Terrain<'_> {
        Terrain {
            grid,
            boundary: BoundaryPolicy::LeftOnly,
        }
    }

    #[test]
    fn fall_and_land_flush_on_floor() {
        let grid = floor_grid(6, 6, 5);
        let mut player = spawn(SpriteKind::Player, 64.0, 0.0);
        for _ in 0..200 {
            step_creature(&mut player, terrain(&grid), GRAVITY, 16);
        }
        assert_eq!(player.body.pos.y, 320.0 - 64.0);
        assert_eq!(player.body.vel.y, 0.0);
        assert!(player.creature().expect("creature").on_ground);
    }

    #[test]
    fn enemies_hover_until_dying() {
        let grid = floor_grid(6, 6, 5);
        for kind in [SpriteKind::FlyCreep, SpriteKind::ZombieCreep, SpriteKind::Dio] {
            let mut enemy = spawn(kind, 64.0, 64.0);
            for _ in 0..10 {
                step_creature(&mut enemy, terrain(&grid), GRAVITY, 16);
            }
            assert_eq!(enemy.body.pos.y, 64.0, "{kind} should hover while alive");

            enemy.set_life_state(LifeState::Dying);
            step_creature(&mut enemy, terrain(&grid), GRAVITY, 16);
            assert!(enemy.body.vel.y > 0.0, "{kind} should fall once dying");
        }
    }

    #[test]
    fn moving_right_into_wall_lands_flush() {
        let mut grid = TileGrid::new(8, 4);
        grid.set_tile(4, 1, Some(TileId(0)));
        let mut zombie = spawn(SpriteKind::ZombieCreep, 150.0, 64.0);
        zombie.body.vel.x = 1.0;
        assert!(move_horizontal(&mut zombie, terrain(&grid), 40));
        assert_eq!(zombie.body.pos.x, (256 - 80) as f32);
        assert_eq!(zombie.body.vel.x, -1.0);
    }

    #[test]
    fn moving_left_into_wall_lands_flush() {
        let mut grid = TileGrid::new(8, 4);
        grid.set_tile(1, 1, Some(TileId(0)));
        let mut player = spawn(SpriteKind::Player, 140.0, 64.0);
        player.body.vel.x = -0.5;
        assert!(move_horizontal(&mut player, terrain(&grid), 40));
        assert_eq!(player.body.pos.x, 128.0);
        assert_eq!(player.body.vel.x, 0.0);
    }

    #[test]
    fn left_world_edge_stops_player() {
        let grid = TileGrid::new(8, 4);
        let mut player = spawn(SpriteKind::Player, 4.0, 64.0);
        player.body.vel.x = -0.5;
        assert!(move_horizontal(&mut player, terrain(&grid), 16));
        assert_eq!(player.body.pos.x, 0.0);
    }

    #[test]
    fn jumping_into_ceiling_snaps_below_it() {
        let mut grid = TileGrid::new(4, 6);
        grid.set_tile(1, 1, Some(TileId(0)));
        let mut player = spawn(SpriteKind::Player, 64.0, 140.0);
        player.body.vel.y = -0.95;
        let step = move_vertical(&mut player, terrain(&grid), 20);
        assert!(step.collided);
        assert_eq!(player.body.pos.y, 128.0);
        assert_eq!(player.body.vel.y, 0.0);
        assert!(!step.moved_down());
    }

    #[test]
    fn dropping_a_pixel_row_clears_ground() {
        let mut player = spawn(SpriteKind::Player, 0.0, 100.0);
        player.creature_mut().expect("creature").on_ground = true;
        set_y(&mut player, 100.3);
        assert!(player.creature().expect("creature").on_ground);
        set_y(&mut player, 101.0);
        assert!(!player.creature().expect("creature").on_ground);
    }

    #[test]
    fn vertical_step_reports_direction() {
        let grid = TileGrid::new(4, 6);
        let mut zombie = spawn(SpriteKind::ZombieCreep, 64.0, 10.0);
        zombie.body.vel.y = 0.5;
        let step = move_vertical(&mut zombie, terrain(&grid), 10);
        assert!(!step.collided);
        assert!(step.moved_down());
        assert_eq!(step.new_y, 15.0);
    }
}
