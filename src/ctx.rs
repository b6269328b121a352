//! The shared per-entity evaluation context threaded through predicates,
//! FSM leaves, and BT leaves.
//!
//! Grounded in the teacher's `ActionContext`/`CompletionContext` pattern
//! (`agent/actions/registry.rs`): a borrowed `'a` struct assembled once per
//! system call from that tick's `Query` item, passed down by `&mut`
//! reference instead of re-querying or holding trait objects. One context
//! type is shared by predicates and leaves (rather than two overlapping
//! ones) so a leaf that both reads and mutates the same component
//! (`PlantHeal` reading `NextHealPosition` then rerolling it) never needs
//! two conflicting mutable borrows of the same field.

use bevy::prelude::*;

use crate::config::AiCoreConfig;
use crate::position::{
    Action, NextHealPosition, NumHealsPlanted, PatrolPos, Position, RestingBase, SleepState, Team,
};
use crate::world_view::WorldSnapshot;

pub struct EntityCtx<'a> {
    pub world: &'a WorldSnapshot,
    pub config: &'a AiCoreConfig,
    pub entity: Entity,
    pub position: Position,
    pub team: Team,
    pub hitpoints: f32,
    pub action: &'a mut Action,
    pub patrol_pos: Option<&'a mut PatrolPos>,
    pub resting_base: Option<RestingBase>,
    pub next_heal_position: Option<&'a mut NextHealPosition>,
    pub sleep_state: Option<&'a mut SleepState>,
    pub heals_planted: Option<&'a mut NumHealsPlanted>,
    /// Outbound `Say` requests (BT leaf, spec.md §4.E), flushed by a
    /// separate system onto every entity's `Expression` component — the
    /// deferred-mutation region spec.md §4.A requires, since a leaf has no
    /// direct way to reach arbitrary *other* entities' components.
    pub say_queue: &'a mut Vec<(String, [f32; 4])>,
}

impl<'a> EntityCtx<'a> {
    pub fn snapshot(&self) -> crate::world_view::EntitySnapshot {
        crate::world_view::EntitySnapshot {
            entity: self.entity,
            position: self.position,
            team: self.team,
            hitpoints: self.hitpoints,
            is_hive: false,
            is_buff: false,
            has_shoot_damage: false,
            is_player: false,
            player_healing_cooldown: 0.0,
        }
    }
}
