//! Headless demo binary (`SPEC_FULL.md` §A): exercises `tick`,
//! `regenerate_maps`, and `follow_dmaps` against a toy dungeon with
//! `MinimalPlugins` — no window, no asset/render plugins — so the crate is
//! demonstrably runnable without pulling in rendering.
//!
//! Spawns a player, a berserker (FSM: patrol until a foe is sighted, then
//! chase), and a scout that abandons its FSM/BT root in favour of an
//! approach-map follower once the player commits an `Explore` action, then
//! drives a handful of ticks, logging each entity's chosen action.

use ai_core::bt::{BehaviorNode, BtLeaf, BtRoot};
use ai_core::follower::DMapFollower;
use ai_core::fsm::{Composite, FsmRoot, Leaf, StateMachine};
use ai_core::position::{ActionSlot, Hitpoints, PatrolPos, Player, Position, Team};
use ai_core::predicate::Predicate;
use ai_core::world::WorldMap;
use ai_core::{AiCorePlugin, MapName, NamedDijkstraMaps, SayQueue};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_rand::prelude::{EntropyPlugin, WyRand};

const DUNGEON_SIZE: u32 = 9;

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), EntropyPlugin::<WyRand>::default()))
        .insert_resource(WorldMap::new(DUNGEON_SIZE, DUNGEON_SIZE))
        .add_plugins(AiCorePlugin)
        .add_systems(Startup, spawn_demo_entities)
        .add_systems(
            Update,
            (
                regenerate_approach_map.before(ai_core::tick_decision_structures),
                report_actions.after(ai_core::follow_dmaps_system),
            ),
        );

    for tick in 0..8 {
        tracing::info!("--- tick {tick} ---");
        app.update();
    }
}

/// `MoveToEnemy`/`EnemyAvailable` treat the player as the only foe on team 0
/// here, so the berserker has something to react to (spec.md §8
/// "Berserker" scenario).
fn spawn_demo_entities(mut commands: Commands) {
    commands.spawn((
        Position::new(4, 4),
        Team::PLAYER,
        Hitpoints(100.0),
        Player,
        ActionSlot::default(),
        SayQueue::default(),
    ));

    let patrol = StateMachine::leaf(Leaf::Patrol(2.0));
    let chase = StateMachine::leaf(Leaf::MoveToEnemy);
    let mut composite = Composite::new(vec![patrol, chase]);
    composite.add_transition(0, Predicate::EnemyAvailable(3.0), 1);
    composite.add_transition(1, Predicate::not(Predicate::EnemyAvailable(5.0)), 0);
    let mut berserker_fsm = StateMachine::composite(composite);
    berserker_fsm.enter();

    commands.spawn((
        Position::new(1, 1),
        Team(1),
        Hitpoints(30.0),
        ActionSlot::default(),
        SayQueue::default(),
        PatrolPos(IVec2::new(1, 1)),
        FsmRoot(berserker_fsm),
    ));

    let scout_tree = BehaviorNode::Selector(vec![
        BehaviorNode::leaf(BtLeaf::IsLowHp(10.0)),
        BehaviorNode::leaf(BtLeaf::RandomMove),
    ]);

    commands.spawn((
        Position::new(7, 7),
        Team(1),
        Hitpoints(50.0),
        ActionSlot::default(),
        SayQueue::default(),
        ai_core::blackboard::Blackboard::new(),
        BtRoot(scout_tree),
    ));

    commands.spawn((
        Position::new(8, 0),
        Team(1),
        Hitpoints(20.0),
        ActionSlot::default(),
        DMapFollower::new(vec![(
            MapName::Approach.key().to_string(),
            (|_entity, value| value) as ai_core::follower::WeightFn,
        )]),
    ));
}

/// Rebuilds the approach map every tick so the follower above has somewhere
/// to descend toward — a host's real cadence is driven by seed movement
/// (spec.md §4.G "Cadence"), simplified here since this demo's player never
/// moves.
fn regenerate_approach_map(
    world_map: Res<WorldMap>,
    player_query: Query<&Position, With<Player>>,
    mut maps: ResMut<NamedDijkstraMaps>,
) {
    let player_positions: Vec<_> = player_query.iter().map(|p| p.0).collect();
    let approach = ai_core::dmap::gen_approach_map(&world_map, player_positions.into_iter());
    maps.0.insert(MapName::Approach.key().to_string(), approach);
}

fn report_actions(query: Query<(Entity, &ActionSlot), Changed<ActionSlot>>) {
    for (entity, slot) in &query {
        tracing::info!("entity {entity:?} chose {:?}", slot.0);
    }
}
