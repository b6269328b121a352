//! Composable AI decision core for a grid-based turn-based roguelike:
//! hierarchical FSMs, behaviour trees, utility selectors, and Dijkstra-map
//! navigation, wired together as a Bevy ECS plugin in the teacher's idiom.

pub mod blackboard;
pub mod bt;
pub mod config;
pub mod core;
pub mod ctx;
pub mod dmap;
pub mod error;
pub mod follower;
pub mod fsm;
pub mod position;
pub mod predicate;
pub mod rng;
pub mod utility;
pub mod world;
pub mod world_view;

use bevy::prelude::*;
use bevy_rand::prelude::{EntropyPlugin, GlobalEntropy, WyRand};
use std::collections::HashMap;

use crate::blackboard::Blackboard;
use crate::bt::BtRoot;
use crate::config::AiCoreConfig;
use crate::core::log::DecisionLog;
use crate::ctx::EntityCtx;
use crate::dmap::DijkstraMap;
use crate::follower::DMapFollower;
use crate::fsm::FsmRoot;
use crate::position::{
    Action, ActionSlot, ExplorationStatus, Hitpoints, Hive, NextHealPosition, NumHealsPlanted,
    PatrolPos, Player, Position, RestingBase, ShootDamage, SleepState, Team,
};
use crate::world::WorldMap;
use crate::world_view::{refresh_world_snapshot, WorldSnapshot};

/// The six named Dijkstra maps spec.md §4.G defines, keyed the way the
/// original source names them (`"approach_map"`, `"flee_map"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapName {
    Approach,
    Flee,
    Hive,
    Ally,
    Exploration,
    Mage,
}

impl MapName {
    pub fn key(&self) -> &'static str {
        match self {
            MapName::Approach => "approach_map",
            MapName::Flee => "flee_map",
            MapName::Hive => "hive_map",
            MapName::Ally => "ally_map",
            MapName::Exploration => "exploration_map",
            MapName::Mage => "mage_map",
        }
    }
}

#[derive(Resource, Default)]
pub struct NamedDijkstraMaps(pub HashMap<String, DijkstraMap>);

/// Wires every component of the decision core. Mirrors the teacher's
/// `AgentPlugin`/`WorldPlugin`/`CorePlugin` composition: `CorePlugin` first
/// (tick counter, decision log), then world state, then the per-tick
/// systems that drive FSM/BT roots and followers.
pub struct AiCorePlugin;

impl Plugin for AiCorePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EntropyPlugin<WyRand>>() {
            app.add_plugins(EntropyPlugin::<WyRand>::default());
        }
        app.add_plugins(core::CorePlugin)
            .insert_resource(AiCoreConfig::default())
            .insert_resource(WorldSnapshot::default())
            .insert_resource(NamedDijkstraMaps::default())
            .add_systems(
                Update,
                (
                    refresh_world_snapshot,
                    tick_decision_structures.after(refresh_world_snapshot),
                    flush_say_queue.after(tick_decision_structures),
                    follow_dmaps_system.after(tick_decision_structures),
                ),
            );
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct SayQueue(pub Vec<(String, [f32; 4])>);

/// Runtime surface (`tick`, spec.md §6): advances every entity with an FSM
/// or BT root exactly once.
#[allow(clippy::too_many_arguments)]
pub fn tick_decision_structures(
    mut rng: GlobalEntropy<WyRand>,
    world_snapshot: Res<WorldSnapshot>,
    config: Res<AiCoreConfig>,
    mut log: ResMut<DecisionLog>,
    mut fsm_query: Query<(
        Entity,
        &mut FsmRoot,
        &Position,
        &Team,
        &Hitpoints,
        &mut ActionSlot,
        &mut SayQueue,
        Option<&PatrolPos>,
        Option<&RestingBase>,
        Option<&mut NextHealPosition>,
        Option<&mut SleepState>,
        Option<&mut NumHealsPlanted>,
    )>,
    mut bt_query: Query<(
        Entity,
        &mut BtRoot,
        &mut Blackboard,
        &Position,
        &Team,
        &Hitpoints,
        &mut ActionSlot,
        &mut SayQueue,
        Option<&mut NextHealPosition>,
        Option<&mut SleepState>,
        Option<&mut NumHealsPlanted>,
    )>,
) {
    for (
        entity,
        mut root,
        position,
        team,
        hp,
        mut action_slot,
        mut say_queue,
        patrol_pos,
        resting_base,
        mut next_heal,
        mut sleep_state,
        mut heals_planted,
    ) in &mut fsm_query
    {
        let mut action = Action::Nop;
        let mut patrol_pos_owned = patrol_pos.copied();
        let mut next_heal_owned = next_heal.as_deref().copied();
        let mut sleep_state_owned = sleep_state.as_deref().copied();
        let mut heals_planted_owned = heals_planted.as_deref().copied();
        {
            let mut ctx = EntityCtx {
                world: &world_snapshot,
                config: &config,
                entity,
                position: *position,
                team: *team,
                hitpoints: hp.0,
                action: &mut action,
                patrol_pos: patrol_pos_owned.as_mut(),
                resting_base: resting_base.copied(),
                next_heal_position: next_heal_owned.as_mut(),
                sleep_state: sleep_state_owned.as_mut(),
                heals_planted: heals_planted_owned.as_mut(),
                say_queue: &mut say_queue.0,
            };
            root.0.act(1.0, &mut ctx, &config, &mut *rng, &mut log);
        }
        action_slot.set(action);
        // Leaves/predicates mutate owned copies above (`EntityCtx` borrows
        // plain `&mut T`, not a live ECS `Mut<T>`); write them back into the
        // actual components now that the borrow of `ctx` has ended, or the
        // `AtRestingBase`/`FinishedSleeping` latches and `PlantHeal`'s
        // planted-count/reroll never reach the ECS.
        if let (Some(owned), Some(component)) = (next_heal_owned, next_heal.as_mut()) {
            **component = owned;
        }
        if let (Some(owned), Some(component)) = (sleep_state_owned, sleep_state.as_mut()) {
            **component = owned;
        }
        if let (Some(owned), Some(component)) = (heals_planted_owned, heals_planted.as_mut()) {
            **component = owned;
        }
    }

    for (
        entity,
        mut root,
        mut bb,
        position,
        team,
        hp,
        mut action_slot,
        mut say_queue,
        mut next_heal,
        mut sleep_state,
        mut heals_planted,
    ) in &mut bt_query
    {
        let mut action = Action::Nop;
        let mut next_heal_owned = next_heal.as_deref().copied();
        let mut sleep_state_owned = sleep_state.as_deref().copied();
        let mut heals_planted_owned = heals_planted.as_deref().copied();
        {
            let mut ctx = EntityCtx {
                world: &world_snapshot,
                config: &config,
                entity,
                position: *position,
                team: *team,
                hitpoints: hp.0,
                action: &mut action,
                patrol_pos: None,
                resting_base: None,
                next_heal_position: next_heal_owned.as_mut(),
                sleep_state: sleep_state_owned.as_mut(),
                heals_planted: heals_planted_owned.as_mut(),
                say_queue: &mut say_queue.0,
            };
            root.0.update_logged(&mut ctx, &mut bb, &config, &mut *rng, &mut log);
        }
        action_slot.set(action);
        if let (Some(owned), Some(component)) = (next_heal_owned, next_heal.as_mut()) {
            **component = owned;
        }
        if let (Some(owned), Some(component)) = (sleep_state_owned, sleep_state.as_mut()) {
            **component = owned;
        }
        if let (Some(owned), Some(component)) = (heals_planted_owned, heals_planted.as_mut()) {
            **component = owned;
        }
    }
}

/// Flushes every queued `Say` request (BT leaf, spec.md §4.E) onto the
/// `Expression` component of all entities that carry one.
fn flush_say_queue(
    mut say_queries: Query<&mut SayQueue>,
    mut expressions: Query<&mut crate::position::Expression>,
) {
    let mut pending = Vec::new();
    for mut queue in &mut say_queries {
        pending.append(&mut queue.0);
    }
    if pending.is_empty() {
        return;
    }
    for (text, color) in pending {
        for mut expr in &mut expressions {
            expr.text = text.clone();
            expr.color = color;
        }
    }
}

/// Runtime surface (`regenerate_maps`, spec.md §6). `which` selects which
/// named maps to recompute; flee/mage implicitly require the approach map,
/// so passing them alone still recomputes approach first if it is stale
/// (cadence rule, spec.md §4.G).
pub fn regenerate_maps(
    world_map: &WorldMap,
    snapshot: &WorldSnapshot,
    exploration: &[(Position, ExplorationStatus)],
    which: &[MapName],
) -> NamedDijkstraMaps {
    let mut maps = NamedDijkstraMaps::default();
    let player_positions: Vec<_> = snapshot
        .entities
        .iter()
        .filter(|e| e.team == Team::PLAYER)
        .map(|e| e.position.0)
        .collect();

    let needs_approach = which.iter().any(|m| {
        matches!(m, MapName::Approach | MapName::Flee | MapName::Mage)
    });
    let approach = if needs_approach {
        Some(dmap::gen_approach_map(world_map, player_positions.iter().copied()))
    } else {
        None
    };

    for name in which {
        match name {
            MapName::Approach => {
                if let Some(a) = &approach {
                    maps.0.insert(name.key().to_string(), a.clone());
                }
            }
            MapName::Flee => {
                if let Some(a) = &approach {
                    maps.0.insert(name.key().to_string(), dmap::gen_flee_map(a, world_map));
                }
            }
            MapName::Hive => {
                let hive_positions = snapshot.entities.iter().filter(|e| e.is_hive).map(|e| e.position.0);
                maps.0.insert(name.key().to_string(), dmap::gen_hive_map(world_map, hive_positions));
            }
            MapName::Ally => {
                let ally_positions = snapshot
                    .entities
                    .iter()
                    .filter(|e| e.team.0 == 1 && !e.has_shoot_damage)
                    .map(|e| e.position.0);
                maps.0.insert(name.key().to_string(), dmap::gen_ally_map(world_map, ally_positions));
            }
            MapName::Exploration => {
                let unexplored = exploration
                    .iter()
                    .filter(|(_, status)| !status.explored)
                    .map(|(pos, _)| pos.0);
                maps.0
                    .insert(name.key().to_string(), dmap::gen_exploration_map(world_map, unexplored));
            }
            MapName::Mage => {
                if let (Some(a), Some(player_pos)) = (&approach, player_positions.first()) {
                    maps.0
                        .insert(name.key().to_string(), dmap::gen_mage_map(world_map, a, *player_pos));
                }
            }
        }
    }
    maps
}

/// Runtime surface (`follow_dmaps`, spec.md §6): the per-tick system form.
/// `include_player` gates whether the player's own follower component (if
/// any) is considered — non-players always follow when they carry a
/// [`DMapFollower`] and no FSM/BT root.
pub fn follow_dmaps_system(
    maps: Res<NamedDijkstraMaps>,
    world_map: Res<WorldMap>,
    mut query: Query<
        (Entity, &Position, &mut ActionSlot, &DMapFollower, Option<&Player>),
        (Without<FsmRoot>, Without<BtRoot>),
    >,
) {
    for (entity, position, mut action_slot, follower, player) in &mut query {
        let is_player = player.is_some();
        if !follower::should_follow(is_player, action_slot.0) {
            continue;
        }
        let action = follower::choose_move(entity, *position, follower, &maps.0, &world_map);
        action_slot.set(action);
    }
}
