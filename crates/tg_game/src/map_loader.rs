//! Text map parsing and campaign progression.
//!
//! A map file is one line per tile row. Lines starting with `#` are comments.
//! `'A'` onwards are tiles, the spawn characters registered in the templates
//! place sprites, and anything else is empty space. The campaign walks
//! `map1.txt`, `map2.txt`, ... and wraps back to the first map once the next
//! one cannot be read.

use std::fs;
use std::path::{Path, PathBuf};

use crate::coords::tiles_to_pixels;
use crate::entity::{Entity, LifeState};
use crate::templates::TemplateRegistry;
use crate::tilemap::{MapLayout, TileGrid};

/// Build a layout from map text. Parsing never fails: unknown characters are
/// empty space and short rows are padded with empty space.
pub fn parse_map(text: &str, registry: &TemplateRegistry) -> MapLayout {
    let lines: Vec<&str> = text.lines().filter(|line| !line.starts_with('#')).collect();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0) as i32;
    let height = lines.len() as i32;

    let mut grid = TileGrid::new(width, height);
    let mut sprites = Vec::new();
    for (y, line) in lines.iter().enumerate() {
        let y = y as i32;
        for (x, ch) in line.chars().enumerate() {
            let x = x as i32;
            if let Some(tile) = registry.tile_for_char(ch) {
                grid.set_tile(x, y, Some(tile));
            } else if let Some(kind) = registry.kind_for_char(ch) {
                let mut sprite = registry.spawn(kind);
                place_in_tile(&mut sprite, x, y);
                sprites.push(sprite);
            }
        }
    }

    log::debug!(
        "parsed {}x{} map: {} tiles, {} sprites",
        width,
        height,
        grid.solid_count(),
        sprites.len()
    );
    MapLayout { grid, sprites }
}

/// Centre a sprite horizontally in tile `(tile_x, tile_y)` and stand it on the
/// tile's bottom edge.
pub fn place_in_tile(sprite: &mut Entity, tile_x: i32, tile_y: i32) {
    let x = tiles_to_pixels(tile_x) + (tiles_to_pixels(1) - sprite.body.width) / 2;
    let y = tiles_to_pixels(tile_y + 1) - sprite.body.height;
    sprite.body.pos.x = x as f32;
    sprite.body.pos.y = y as f32;
}

/// Put the player back at the start of a freshly loaded map, alive.
pub fn place_player(player: &mut Entity, spawn_tile_x: i32) {
    player.set_life_state(LifeState::Normal);
    player.body.pos.x = tiles_to_pixels(spawn_tile_x) as f32;
    player.body.pos.y = 0.0;
}

pub fn load_map_from_path(path: &Path, registry: &TemplateRegistry) -> Result<MapLayout, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(parse_map(&raw, registry))
}

/// Where numbered maps come from.
pub trait MapSource {
    /// Text of map `index` (1-based).
    fn read_map(&self, index: u32) -> Result<String, String>;
}

/// `map{N}.txt` files in one directory.
#[derive(Debug, Clone)]
pub struct MapDirectory {
    root: PathBuf,
}

impl MapDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn map_path(&self, index: u32) -> PathBuf {
        self.root.join(format!("map{index}.txt"))
    }
}

impl MapSource for MapDirectory {
    fn read_map(&self, index: u32) -> Result<String, String> {
        let path = self.map_path(index);
        fs::read_to_string(&path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
    }
}

/// Maps held in memory; entry 0 is map 1.
#[derive(Debug, Clone, Default)]
pub struct MemoryMaps {
    maps: Vec<String>,
}

impl MemoryMaps {
    pub fn new<I, S>(maps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            maps: maps.into_iter().map(Into::into).collect(),
        }
    }
}

impl MapSource for MemoryMaps {
    fn read_map(&self, index: u32) -> Result<String, String> {
        index
            .checked_sub(1)
            .and_then(|i| self.maps.get(i as usize))
            .cloned()
            .ok_or_else(|| format!("map {index} not found"))
    }
}

/// Position in a cyclic sequence of maps.
pub struct Campaign {
    source: Box<dyn MapSource>,
    current: u32,
}

impl Campaign {
    pub fn new(source: Box<dyn MapSource>) -> Self {
        Self { source, current: 0 }
    }

    /// Index of the map last loaded, 0 before the first load.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Advance to the next readable map, wrapping to map 1 when the sequence
    /// runs out. Fails only if map 1 itself cannot be read.
    pub fn load_next(&mut self, registry: &TemplateRegistry) -> Result<MapLayout, String> {
        loop {
            self.current += 1;
            match self.source.read_map(self.current) {
                Ok(text) => {
                    log::info!("loaded map {}", self.current);
                    return Ok(parse_map(&text, registry));
                }
                Err(e) => {
                    log::warn!("could not load map {}: {e}", self.current);
                    if self.current == 1 {
                        return Err(format!("no maps available: {e}"));
                    }
                    log::info!("campaign finished, wrapping to map 1");
                    self.current = 0;
                }
            }
        }
    }

    /// Load the current map again from scratch.
    pub fn reload(&self, registry: &TemplateRegistry) -> Result<MapLayout, String> {
        let text = self
            .source
            .read_map(self.current)
            .map_err(|e| format!("Failed to reload map {}: {e}", self.current))?;
        log::info!("reloaded map {}", self.current);
        Ok(parse_map(&text, registry))
    }
}

impl std::fmt::Debug for Campaign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Campaign")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
