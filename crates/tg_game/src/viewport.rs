//! Screen-space view of a map: scroll offsets, the draw list, and waking
//! creatures that scroll into view.
//!
//! The view follows the player horizontally and is pinned to the bottom of the
//! map vertically. Nothing here moves the simulation except `wake_visible`.

use glam::IVec2;

use crate::behavior;
use crate::config::ScreenSize;
use crate::coords::{pixels_to_tiles, round_px, tiles_to_pixels, TILE_SIZE};
use crate::entity::EntityId;
use crate::tilemap::{TileId, TileMap};

/// Sprites are drawn this far below their logical position.
pub const SPRITE_DRAW_OFFSET_Y: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub screen: ScreenSize,
    pub offset: IVec2,
    /// Leftmost tile column that can be on screen.
    pub first_column: i32,
    /// Rightmost tile column that can be on screen, inclusive.
    pub last_column: i32,
}

impl Viewport {
    pub fn follow(map: &TileMap, screen: ScreenSize) -> Self {
        let map_width = tiles_to_pixels(map.width());
        let map_height = tiles_to_pixels(map.height());

        let mut offset_x = screen.width / 2 - round_px(map.player.body.pos.x) - TILE_SIZE;
        offset_x = offset_x.min(0);
        offset_x = offset_x.max(screen.width - map_width);
        let offset_y = screen.height - map_height;

        let first_column = pixels_to_tiles(-offset_x);
        let last_column = first_column + pixels_to_tiles(screen.width) + 1;

        Self {
            screen,
            offset: IVec2::new(offset_x, offset_y),
            first_column,
            last_column,
        }
    }

    /// Screen position of a sprite's logical position.
    pub fn sprite_position(&self, x: f32, y: f32) -> IVec2 {
        IVec2::new(
            round_px(x) + self.offset.x,
            round_px(y) + self.offset.y + SPRITE_DRAW_OFFSET_Y,
        )
    }

    pub fn is_on_screen_x(&self, screen_x: i32) -> bool {
        screen_x >= 0 && screen_x < self.screen.width
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawItem {
    Tile(TileId),
    /// Sprite id of the animation frame to show.
    Frame(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    pub item: DrawItem,
    pub position: IVec2,
}

/// Everything on screen, back to front: visible tiles row by row, the player,
/// then sprites in list order.
pub fn draw_list(map: &TileMap, view: &Viewport) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    for y in 0..map.height() {
        for x in view.first_column..=view.last_column {
            if let Some(tile) = map.grid.tile(x, y) {
                commands.push(DrawCommand {
                    item: DrawItem::Tile(tile),
                    position: IVec2::new(
                        tiles_to_pixels(x) + view.offset.x,
                        tiles_to_pixels(y) + view.offset.y,
                    ),
                });
            }
        }
    }

    let player = &map.player;
    commands.push(DrawCommand {
        item: DrawItem::Frame(player.animator.frame_id().to_string()),
        position: IVec2::new(
            round_px(player.body.pos.x) + view.offset.x,
            round_px(player.body.pos.y) + view.offset.y,
        ),
    });

    for sprite in &map.sprites {
        commands.push(DrawCommand {
            item: DrawItem::Frame(sprite.animator.frame_id().to_string()),
            position: view.sprite_position(sprite.body.pos.x, sprite.body.pos.y),
        });
    }
    commands
}

/// Start every resting creature whose left edge is on screen. Returns the ids
/// of the creatures that started moving.
pub fn wake_visible(map: &mut TileMap, view: &Viewport) -> Vec<EntityId> {
    let mut woken = Vec::new();
    for sprite in map.sprites.iter_mut() {
        if !sprite.is_creature() {
            continue;
        }
        let screen = view.sprite_position(sprite.body.pos.x, sprite.body.pos.y);
        if !view.is_on_screen_x(screen.x) {
            continue;
        }
        let before = sprite.body.vel.x;
        behavior::wake_up(sprite);
        if sprite.body.vel.x != before {
            log::debug!("{} {:?} woke up", sprite.kind, sprite.id);
            woken.push(sprite.id);
        }
    }
    woken
}
