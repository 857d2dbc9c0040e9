//! Collision queries: sprites against the tile grid, and sprites against each
//! other.
//!
//! Tile probes are single-axis: the caller moves along X or Y, never both, and
//! asks whether the box swept between the old and new position touches a solid
//! cell. Sprite pairs use their fixed hit boxes, rounded to whole pixels, with
//! strict overlap so touching edges do not count.

use crate::config::BoundaryPolicy;
use crate::coords::pixels_to_tiles_f;
use crate::entity::{Body, Entity};
use crate::tilemap::TileGrid;

/// Whether cell `(x, y)` blocks movement.
pub fn is_blocked(grid: &TileGrid, x: i32, y: i32, boundary: BoundaryPolicy) -> bool {
    match boundary {
        BoundaryPolicy::LeftOnly => x < 0 || grid.tile(x, y).is_some(),
        BoundaryPolicy::Enclosed => !grid.contains(x, y) || grid.tile(x, y).is_some(),
    }
}

/// First blocking tile touched by moving `body` from its current position to
/// `(new_x, new_y)`, scanning columns left to right and, within a column, rows
/// top to bottom.
pub fn tile_collision(
    grid: &TileGrid,
    body: &Body,
    new_x: f32,
    new_y: f32,
    boundary: BoundaryPolicy,
) -> Option<(i32, i32)> {
    let from_x = body.pos.x.min(new_x);
    let from_y = body.pos.y.min(new_y);
    let to_x = body.pos.x.max(new_x);
    let to_y = body.pos.y.max(new_y);

    let from_tile_x = pixels_to_tiles_f(from_x);
    let from_tile_y = pixels_to_tiles_f(from_y);
    let to_tile_x = pixels_to_tiles_f(to_x + body.width as f32 - 1.0);
    let to_tile_y = pixels_to_tiles_f(to_y + body.height as f32 - 1.0);

    for x in from_tile_x..=to_tile_x {
        for y in from_tile_y..=to_tile_y {
            if is_blocked(grid, x, y, boundary) {
                return Some((x, y));
            }
        }
    }
    None
}

/// True if two distinct sprites overlap. A creature that is no longer alive
/// (dying or dead) never collides with anything.
pub fn is_collision(a: &Entity, b: &Entity) -> bool {
    if a.id == b.id && a.kind == b.kind {
        return false;
    }
    if a.is_dead_creature() || b.is_dead_creature() {
        return false;
    }
    let (ax1, ay1, ax2, ay2) = a.body.hit_rect();
    let (bx1, by1, bx2, by2) = b.body.hit_rect();
    ax1 < bx2 && bx1 < ax2 && ay1 < by2 && by1 < ay2
}

/// Index of the first sprite in list order that `sprite` collides with.
pub fn sprite_collision(sprite: &Entity, others: &[Entity]) -> Option<usize> {
    others.iter().position(|other| is_collision(sprite, other))
}
