//! Dijkstra-map followers (spec.md §4.H): per-entity weighted sums over
//! named maps that choose a move action, grounded on `w4/dmapFollower.cpp`.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::dmap::{DijkstraMap, INVALID};
use crate::position::{Action, Position};
use crate::world::WorldMap;

pub type WeightFn = fn(Entity, f32) -> f32;

/// An entity's follower config: a list of `(map-name, weight-fn)` pairs
/// (spec.md §3 "DMap follower").
#[derive(Component, Clone)]
pub struct DMapFollower {
    pub maps: Vec<(String, WeightFn)>,
}

impl DMapFollower {
    pub fn new(maps: Vec<(String, WeightFn)>) -> Self {
        Self { maps }
    }
}

/// The five move candidates in fixed enumeration order (spec.md §4.H
/// "ties: lexicographic order of enumeration").
const CANDIDATES: [Action; 5] = [
    Action::Nop,
    Action::Left,
    Action::Right,
    Action::Up,
    Action::Down,
];

/// Picks the move action that minimizes the weighted sum of the listed
/// maps' values at the candidate target tile. Out-of-range targets read as
/// [`INVALID`] (spec.md §4.H).
pub fn choose_move(
    entity: Entity,
    position: Position,
    follower: &DMapFollower,
    maps: &HashMap<String, DijkstraMap>,
    _world: &WorldMap,
) -> Action {
    let mut best_action = Action::Nop;
    let mut best_total = f32::INFINITY;
    for action in CANDIDATES {
        let target = position.0 + action.delta();
        let mut total = 0.0;
        for (name, weight_fn) in &follower.maps {
            let value = maps
                .get(name)
                .map(|m| m.get(target.x, target.y))
                .unwrap_or(INVALID);
            total += weight_fn(entity, value);
        }
        if total < best_total {
            best_total = total;
            best_action = action;
        }
    }
    best_action
}

/// Decides whether the follower should act at all this tick (spec.md
/// §4.H): a player follower only acts when the committed action is
/// `Explore`; a non-player follower acts whenever it has no FSM/BT root
/// (callers check that by construction — this crate ships followers and
/// FSM/BT roots as mutually exclusive components on a given entity).
pub fn should_follow(is_player: bool, current_action: Action) -> bool {
    !is_player || current_action == Action::Explore
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldMap;

    fn toward_seed(_entity: Entity, value: f32) -> f32 {
        value
    }

    #[test]
    fn follower_descends_the_gradient() {
        let world = WorldMap::new(5, 5);
        let approach =
            crate::dmap::gen_approach_map(&world, std::iter::once(bevy::math::IVec2::new(4, 2)));
        let mut maps = HashMap::new();
        maps.insert("approach_map".to_string(), approach);

        let follower = DMapFollower::new(vec![("approach_map".to_string(), toward_seed as WeightFn)]);
        let action = choose_move(
            Entity::from_raw(0),
            Position::new(2, 2),
            &follower,
            &maps,
            &world,
        );
        assert_eq!(action, Action::Right);
    }

    #[test]
    fn should_follow_gates_player_on_explore_action() {
        assert!(!should_follow(true, Action::Attack));
        assert!(should_follow(true, Action::Explore));
        assert!(should_follow(false, Action::Attack));
    }
}
