use bevy::prelude::*;

/// Tracks how many AI ticks have elapsed.
///
/// A tick advances once per player action committed (spec.md §5), not once
/// per render frame — the host's turn sequencer (out of scope here) is
/// responsible for calling [`TickCount::advance`] exactly once per turn,
/// after the player has consumed all of their sub-action slots.
#[derive(Resource, Debug, Default)]
pub struct TickCount {
    pub current: u64,
}

impl TickCount {
    pub fn advance(&mut self) {
        self.current += 1;
    }

    /// Staggers per-entity cadence the way the teacher's `should_run` does:
    /// offsetting by entity index spreads expensive work (map regeneration,
    /// deep BT re-evaluation) across ticks instead of bursting every entity
    /// on the same frame.
    pub fn should_run(&self, entity: Entity, interval: u64) -> bool {
        let entity_id = entity.index() as u64;
        (self.current + entity_id).is_multiple_of(interval.max(1))
    }
}

/// Advances [`TickCount`] once per `Update` pass. Useful for the demo binary
/// and tests driving the crate standalone; a host with its own turn
/// sequencer should call [`TickCount::advance`] directly instead of
/// scheduling this system.
pub fn tick_system(mut tick: ResMut<TickCount>) {
    tick.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_run_staggers_by_entity_index() {
        let tick = TickCount { current: 10 };
        let e0 = Entity::from_raw(0);
        let e3 = Entity::from_raw(3);
        assert!(tick.should_run(e0, 10));
        assert!(!tick.should_run(e3, 10));
    }

    #[test]
    fn should_run_never_divides_by_zero() {
        let tick = TickCount { current: 5 };
        let e = Entity::from_raw(0);
        assert!(tick.should_run(e, 0));
    }
}
