use bevy::prelude::*;

pub mod log;
pub mod tick;

pub use log::DecisionLog;
pub use tick::TickCount;

/// Wires the tick counter and decision log that every other plugin depends on.
///
/// Mirrors the teacher's `CorePlugin`: kept minimal, added to the app before
/// any domain plugin so their `Res<TickCount>` / `ResMut<DecisionLog>` lookups
/// never miss.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TickCount::default())
            .insert_resource(DecisionLog::new(500))
            .add_systems(Update, tick::tick_system);
    }
}
