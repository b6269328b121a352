use bevy::prelude::*;

/// Builds the [`WorldMap`] resource. Call [`WorldMap::new`] directly and
/// `insert_resource` it yourself if the host already owns dungeon
/// generation (out of scope here, per spec.md §1) — this plugin only wires
/// up the resource with an empty all-floor grid so the crate is drivable
/// standalone.
pub struct MapPlugin {
    pub width: u32,
    pub height: u32,
}

impl Default for MapPlugin {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
        }
    }
}

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WorldMap::new(self.width, self.height));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileType {
    Floor,
    Wall,
}

impl TileType {
    pub fn is_floor(&self) -> bool {
        matches!(self, TileType::Floor)
    }
}

/// Row-major `width x height` dungeon tile grid (spec.md §3 "Dungeon tile
/// map"). Simplified from the teacher's chunked `WorldMap` (no chunk
/// paging — a roguelike floor fits comfortably in one flat `Vec`) but keeps
/// its resource shape and bounds-checked accessor style.
#[derive(Resource, Debug, Clone)]
pub struct WorldMap {
    pub width: u32,
    pub height: u32,
    tiles: Vec<TileType>,
}

impl WorldMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Floor; (width * height) as usize],
        }
    }

    /// Builds from an explicit row-major tile list (e.g. parsed from a
    /// host's dungeon generator). Panics if `tiles.len() != width * height`
    /// — a mismatched grid is a program bug (spec.md §7 "map errors").
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<TileType>) -> Self {
        assert_eq!(
            tiles.len(),
            (width * height) as usize,
            "WorldMap::from_tiles: tile count does not match width * height"
        );
        Self {
            width,
            height,
            tiles,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as u32 * self.width + x as u32) as usize)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<TileType> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).map(|t| t.is_floor()).unwrap_or(false)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileType) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// The 4-connected neighbours of `(x, y)` that are in bounds, in the
    /// fixed enumeration order left/right/up/down used throughout this
    /// crate (movement leaves, Dijkstra relaxation, followers).
    pub fn neighbors4(&self, x: i32, y: i32) -> [(i32, i32); 4] {
        [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_not_floor() {
        let map = WorldMap::new(4, 4);
        assert!(!map.is_floor(-1, 0));
        assert!(!map.is_floor(4, 0));
        assert!(map.is_floor(0, 0));
    }

    #[test]
    fn from_tiles_rejects_mismatched_length() {
        let result = std::panic::catch_unwind(|| {
            WorldMap::from_tiles(2, 2, vec![TileType::Floor; 3]);
        });
        assert!(result.is_err());
    }
}
