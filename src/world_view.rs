//! The "world interface" (spec.md §4.A) as consumed by predicates, FSM
//! leaves, and BT leaves.
//!
//! Bevy's own `Query`/`Res`/`Commands` already satisfy §4.A's five
//! contracts (typed queries, component read/write, liveness, deferred
//! mutation via `Commands`) directly, so nothing here re-implements them.
//! What *is* needed is a read-only snapshot of "every other entity" that
//! a predicate or leaf can search without holding a live, borrow-checked
//! `Query` (predicates/leaves are plain functions called from inside a
//! system that already holds the query) — grounded in the teacher's
//! `ActionContext`/`CompletionContext` pattern (`agent/actions/registry.rs`,
//! `agent/actions/types.rs`): a small `'a`-borrowed context struct built
//! once per system call and passed down by reference.
use bevy::prelude::*;

use crate::position::{Hitpoints, PlayerHealingCooldown, Position, Team};

#[derive(Debug, Clone, Copy)]
pub struct EntitySnapshot {
    pub entity: Entity,
    pub position: Position,
    pub team: Team,
    pub hitpoints: f32,
    pub is_hive: bool,
    pub is_buff: bool,
    pub has_shoot_damage: bool,
    pub is_player: bool,
    pub player_healing_cooldown: f32,
}

/// Snapshot of every entity's world-relevant attributes for one tick.
/// Rebuilt each tick (spec.md §4.A "queries are cached across ticks" —
/// here the snapshot itself is the cache, rebuilt cheaply from Bevy's
/// already-cached `Query`).
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldSnapshot {
    pub entities: Vec<EntitySnapshot>,
    pub player: Option<Entity>,
}

impl WorldSnapshot {
    pub fn get(&self, entity: Entity) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|s| s.entity == entity)
    }

    pub fn player(&self) -> Option<&EntitySnapshot> {
        self.player.and_then(|p| self.get(p))
    }

    /// Closest entity on a different team within `max_distance`, ties
    /// broken by iteration order (spec.md §4.B "Closest-foe rule").
    pub fn closest_foe(&self, from: &EntitySnapshot, max_distance: f32) -> Option<&EntitySnapshot> {
        self.entities
            .iter()
            .filter(|other| other.entity != from.entity && other.team != from.team)
            .map(|other| (other, from.position.distance_euclidean(other.position)))
            .filter(|(_, d)| *d <= max_distance)
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(s, _)| s)
    }

    pub fn closest_buff(&self, from: &EntitySnapshot) -> Option<&EntitySnapshot> {
        self.entities
            .iter()
            .filter(|other| other.is_buff)
            .map(|other| (other, from.position.distance_euclidean(other.position)))
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(s, _)| s)
    }
}

/// Rebuilds [`WorldSnapshot`] from the live ECS world. Hosts call this (or
/// an equivalent system) once per tick, before `tick(world)`.
pub fn refresh_world_snapshot(
    mut snapshot: ResMut<WorldSnapshot>,
    query: Query<(
        Entity,
        &Position,
        &Team,
        &Hitpoints,
        Option<&crate::position::Hive>,
        Option<&crate::position::Buff>,
        Option<&crate::position::ShootDamage>,
        Option<&crate::position::Player>,
        Option<&PlayerHealingCooldown>,
    )>,
) {
    snapshot.entities.clear();
    snapshot.player = None;
    for (entity, position, team, hp, hive, buff, shoot, player, cooldown) in &query {
        if player.is_some() {
            snapshot.player = Some(entity);
        }
        snapshot.entities.push(EntitySnapshot {
            entity,
            position: *position,
            team: *team,
            hitpoints: hp.0,
            is_hive: hive.is_some(),
            is_buff: buff.is_some(),
            has_shoot_damage: shoot.is_some(),
            is_player: player.is_some(),
            player_healing_cooldown: cooldown.map(|c| c.0).unwrap_or(0.0),
        });
    }
}
