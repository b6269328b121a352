use bevy::prelude::*;
use std::ops::RangeInclusive;

/// Tunable thresholds shared by the decision core, in the shape of the
/// teacher's `NervousSystemConfig`/`DriveConfig`: a `Resource` with a
/// `Default` impl so a host can retune without touching the factories that
/// build individual entities' FSM/BT trees.
#[derive(Resource, Debug, Clone)]
pub struct AiCoreConfig {
    /// `EnemyAvailable`/`FindEnemy` sight radius (`SIGHT_NEIGHBORHOOD` in
    /// the original source).
    pub sight_radius: f32,
    /// `PlayerAvailable` radius used by healer-type FSMs.
    pub player_sight_radius: f32,
    /// Distance beyond which a pursuing entity gives up and resumes
    /// patrol/crafting (Berserker/Crafter scenarios, spec.md §8).
    pub disengage_radius: f32,
    /// `HitpointsLessThan` threshold for `PatchUp`/`HealSelf` leaves.
    pub low_hp_threshold: f32,
    /// `PlayerHitpointsLessThan` threshold for the healer FSM.
    pub player_low_hp_threshold: f32,
    pub heal_player_amount: f32,
    pub heal_player_cooldown: f32,
    /// `Patrol(d)` distance before returning to the patrol point.
    pub patrol_distance: f32,
    /// Number of heals a crafter plants before heading to rest.
    pub heals_needed: u32,
    pub sleep_timer: f32,
    /// `PlantHeal`'s respawn offset range on both axes (§G: `5..=10` in the
    /// original, exposed here since the dungeon size is no longer fixed).
    pub plant_heal_respawn_range: RangeInclusive<i32>,
    /// `InertialUtilitySelector` defaults (spec.md §4.F).
    pub inertia_bonus: f32,
    pub inertia_cooldown: f32,
    /// How many ticks between Dijkstra map regenerations when driven by
    /// [`crate::core::tick::TickCount::should_run`] rather than an explicit
    /// "seeds changed" event.
    pub map_regen_interval: u64,
}

impl Default for AiCoreConfig {
    fn default() -> Self {
        Self {
            sight_radius: 3.0,
            player_sight_radius: 5.0,
            disengage_radius: 5.0,
            low_hp_threshold: 30.0,
            player_low_hp_threshold: 30.0,
            heal_player_amount: 200.0,
            heal_player_cooldown: 10.0,
            patrol_distance: 3.0,
            heals_needed: 3,
            sleep_timer: 5.0,
            plant_heal_respawn_range: 5..=10,
            inertia_bonus: 100.0,
            inertia_cooldown: 10.0,
            map_regen_interval: 1,
        }
    }
}
