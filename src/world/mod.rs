pub mod map;

use bevy::prelude::*;

pub use map::{TileType, WorldMap};

/// Wires [`map::WorldMap`]. The map is the only world-scoped state this
/// crate owns — everything else (entity spawning, dungeon generation,
/// rendering) is the host's job per spec.md §1.
pub struct WorldPlugin {
    pub width: u32,
    pub height: u32,
}

impl Default for WorldPlugin {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
        }
    }
}

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(map::MapPlugin {
            width: self.width,
            height: self.height,
        });
    }
}
