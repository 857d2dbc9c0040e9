//! The tile map: a fixed grid of tiles, the live sprites, and the player.
//!
//! The grid is static once loaded. The sprite list is ordered (insertion order
//! is update and draw order) and is compacted with an explicit sweep rather
//! than removed from mid-iteration. The player is held separately from the
//! sprite list and survives map reloads: a new layout is swapped in around it.

use crate::entity::{Entity, EntityId};

/// Index of a tile image (`'A'` is 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Option<TileId>>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![None; cell_count(width, height)],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile at `(x, y)`. Anything outside the stored grid reads as empty.
    pub fn tile(&self, x: i32, y: i32) -> Option<TileId> {
        if !self.contains(x, y) {
            return None;
        }
        self.tiles[self.index(x, y)]
    }

    /// Place (or clear) a tile. Writes outside the grid are dropped.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Option<TileId>) {
        if self.contains(x, y) {
            let i = self.index(x, y);
            self.tiles[i] = tile;
        } else {
            log::debug!("set_tile({x}, {y}) outside {}x{} grid", self.width, self.height);
        }
    }

    pub fn solid_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }
}

/// Cells in a `width` x `height` grid, counted in `usize` so large maps
/// cannot overflow `i32`.
fn cell_count(width: i32, height: i32) -> usize {
    width.max(0) as usize * height.max(0) as usize
}

/// Everything a map file describes, before the player is placed into it.
#[derive(Debug, Clone)]
pub struct MapLayout {
    pub grid: TileGrid,
    pub sprites: Vec<Entity>,
}

#[derive(Debug, Clone)]
pub struct TileMap {
    pub grid: TileGrid,
    pub sprites: Vec<Entity>,
    pub player: Entity,
    next_id: u32,
}

impl TileMap {
    pub fn new(layout: MapLayout, player: Entity) -> Self {
        let mut map = Self {
            grid: TileGrid::new(0, 0),
            sprites: Vec::new(),
            player,
            next_id: 1,
        };
        map.replace_layout(layout);
        map
    }

    /// Swap in a freshly loaded layout, keeping the same player entity.
    /// Sprite ids are reassigned so none can alias the player's.
    pub fn replace_layout(&mut self, layout: MapLayout) {
        self.grid = layout.grid;
        self.sprites.clear();
        self.next_id = self.player.id.0.wrapping_add(1).max(1);
        for sprite in layout.sprites {
            self.add_sprite(sprite);
        }
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn add_sprite(&mut self, mut sprite: Entity) -> EntityId {
        if self.next_id == self.player.id.0 {
            self.next_id = self.next_id.wrapping_add(1);
        }
        sprite.id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let id = sprite.id;
        self.sprites.push(sprite);
        id
    }

    pub fn remove_sprite(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.sprites.iter().position(|s| s.id == id)?;
        Some(self.sprites.remove(index))
    }

    pub fn sprite(&self, id: EntityId) -> Option<&Entity> {
        self.sprites.iter().find(|s| s.id == id)
    }

    /// Creatures still in the NORMAL state, player excluded.
    pub fn live_creature_count(&self) -> usize {
        self.sprites.iter().filter(|s| s.is_alive_creature()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::SpriteKind;
    use crate::templates::TemplateRegistry;

    #[test]
    fn grid_reads_outside_bounds_as_empty() {
        let mut grid = TileGrid::new(4, 3);
        grid.set_tile(0, 0, Some(TileId(0)));
        grid.set_tile(3, 2, Some(TileId(1)));
        assert_eq!(grid.tile(0, 0), Some(TileId(0)));
        assert_eq!(grid.tile(3, 2), Some(TileId(1)));
        assert_eq!(grid.tile(-1, 0), None);
        assert_eq!(grid.tile(4, 0), None);
        assert_eq!(grid.tile(0, 3), None);
        assert_eq!(grid.tile(0, 1_000_000), None);
        assert_eq!(grid.solid_count(), 2);
    }

    #[test]
    fn cell_count_does_not_wrap_on_huge_maps() {
        assert_eq!(cell_count(70_000, 40_000), 2_800_000_000);
        assert_eq!(cell_count(4, 3), 12);
        assert_eq!(cell_count(-1, 5), 0);
    }

    #[test]
    fn tall_grid_indexes_last_row() {
        let mut grid = TileGrid::new(3, 50_000);
        grid.set_tile(2, 49_999, Some(TileId(4)));
        assert_eq!(grid.tile(2, 49_999), Some(TileId(4)));
        assert_eq!(grid.solid_count(), 1);
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut grid = TileGrid::new(2, 2);
        grid.set_tile(5, 5, Some(TileId(0)));
        assert_eq!(grid.solid_count(), 0);
    }

    #[test]
    fn sprite_ids_never_alias_player() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        let player = registry.spawn(SpriteKind::Player);
        let layout = MapLayout {
            grid: TileGrid::new(4, 4),
            sprites: vec![
                registry.spawn(SpriteKind::FlyCreep),
                registry.spawn(SpriteKind::Heart),
            ],
        };
        let map = TileMap::new(layout, player);
        assert_eq!(map.sprites.len(), 2);
        for s in &map.sprites {
            assert_ne!(s.id, map.player.id);
        }
        assert_ne!(map.sprites[0].id, map.sprites[1].id);
    }

    #[test]
    fn replace_layout_keeps_player() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        let mut player = registry.spawn(SpriteKind::Player);
        player.player_stats_mut().expect("player stats").score = 42;
        let mut map = TileMap::new(
            MapLayout {
                grid: TileGrid::new(2, 2),
                sprites: vec![registry.spawn(SpriteKind::Goal)],
            },
            player,
        );
        map.replace_layout(MapLayout {
            grid: TileGrid::new(5, 1),
            sprites: Vec::new(),
        });
        assert_eq!(map.width(), 5);
        assert!(map.sprites.is_empty());
        assert_eq!(map.player.player_stats().expect("player stats").score, 42);
    }

    #[test]
    fn remove_sprite_by_id() {
        let registry = TemplateRegistry::builtin(&GameConfig::default());
        let mut map = TileMap::new(
            MapLayout {
                grid: TileGrid::new(2, 2),
                sprites: Vec::new(),
            },
            registry.spawn(SpriteKind::Player),
        );
        let a = map.add_sprite(registry.spawn(SpriteKind::Heart));
        let b = map.add_sprite(registry.spawn(SpriteKind::ZombieCreep));
        assert!(map.remove_sprite(a).is_some());
        assert!(map.remove_sprite(a).is_none());
        assert!(map.sprite(b).is_some());
        assert_eq!(map.live_creature_count(), 1);
    }
}
