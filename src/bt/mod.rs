//! Behaviour tree (spec.md §4.E): tagged-variant compound/leaf tree with the
//! conventional tri-state contract.

pub mod leaves;

use bevy::prelude::*;
use rand::Rng;

pub use leaves::BtLeaf;

use crate::blackboard::Blackboard;
use crate::config::AiCoreConfig;
use crate::core::log::DecisionLog;
use crate::ctx::EntityCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Running,
    Success,
    Fail,
}

#[derive(Debug, Clone)]
pub enum BehaviorNode {
    Sequence(Vec<BehaviorNode>),
    Selector(Vec<BehaviorNode>),
    Parallel(Vec<BehaviorNode>),
    Negate(Box<BehaviorNode>),
    Leaf(BtLeaf),
    /// Utility selectors (spec.md §4.F) — themselves BT compound nodes,
    /// implemented in `crate::utility` to keep the scoring/inertia logic
    /// out of this module's recursion.
    UtilitySelector(Vec<crate::utility::UtilityChild>),
    RandomUtilitySelector(Vec<crate::utility::UtilityChild>),
    InertialUtilitySelector(Vec<crate::utility::UtilityChild>, crate::utility::InertialState),
}

impl BehaviorNode {
    pub fn leaf(leaf: BtLeaf) -> Self {
        BehaviorNode::Leaf(leaf)
    }

    pub fn negate(child: BehaviorNode) -> Self {
        BehaviorNode::Negate(Box::new(child))
    }

    pub fn update(
        &mut self,
        ctx: &mut EntityCtx<'_>,
        bb: &mut Blackboard,
        config: &AiCoreConfig,
        rng: &mut impl Rng,
    ) -> BtStatus {
        match self {
            BehaviorNode::Sequence(children) => {
                for child in children.iter_mut() {
                    let result = child.update(ctx, bb, config, rng);
                    if result != BtStatus::Success {
                        return result;
                    }
                }
                BtStatus::Success
            }
            BehaviorNode::Selector(children) => {
                for child in children.iter_mut() {
                    let result = child.update(ctx, bb, config, rng);
                    if result != BtStatus::Fail {
                        return result;
                    }
                }
                BtStatus::Fail
            }
            BehaviorNode::Parallel(children) => {
                let mut terminal = None;
                for child in children.iter_mut() {
                    let result = child.update(ctx, bb, config, rng);
                    if result != BtStatus::Running && terminal.is_none() {
                        terminal = Some(result);
                    }
                }
                terminal.unwrap_or(BtStatus::Running)
            }
            BehaviorNode::Negate(child) => match child.update(ctx, bb, config, rng) {
                BtStatus::Success => BtStatus::Fail,
                BtStatus::Fail => BtStatus::Success,
                BtStatus::Running => BtStatus::Running,
            },
            BehaviorNode::Leaf(leaf) => leaf.update(ctx, bb, config, rng),
            BehaviorNode::UtilitySelector(children) => {
                // Logging needs a `DecisionLog`; callers that care about the
                // ring buffer go through `update_logged` instead.
                let mut sink = DecisionLog::new(0);
                crate::utility::ranked_update(children, ctx, bb, config, rng, &mut sink)
            }
            BehaviorNode::RandomUtilitySelector(children) => {
                let mut sink = DecisionLog::new(0);
                crate::utility::softmax_update(children, ctx, bb, config, rng, &mut sink)
            }
            BehaviorNode::InertialUtilitySelector(children, state) => {
                let mut sink = DecisionLog::new(0);
                crate::utility::inertial_update(children, state, ctx, bb, config, rng, &mut sink)
            }
        }
    }

    /// Identical to [`Self::update`] but threads a real [`DecisionLog`]
    /// through to utility selectors so their picks are recorded. Plain
    /// compound/leaf nodes don't log (only the teacher's arbitration layer
    /// did, in its idiom) — only the decision points spec.md calls out
    /// (FSM transitions, utility picks) do.
    pub fn update_logged(
        &mut self,
        ctx: &mut EntityCtx<'_>,
        bb: &mut Blackboard,
        config: &AiCoreConfig,
        rng: &mut impl Rng,
        log: &mut DecisionLog,
    ) -> BtStatus {
        match self {
            BehaviorNode::UtilitySelector(children) => {
                crate::utility::ranked_update(children, ctx, bb, config, rng, log)
            }
            BehaviorNode::RandomUtilitySelector(children) => {
                crate::utility::softmax_update(children, ctx, bb, config, rng, log)
            }
            BehaviorNode::InertialUtilitySelector(children, state) => {
                crate::utility::inertial_update(children, state, ctx, bb, config, rng, log)
            }
            BehaviorNode::Sequence(children) => {
                for child in children.iter_mut() {
                    let result = child.update_logged(ctx, bb, config, rng, log);
                    if result != BtStatus::Success {
                        return result;
                    }
                }
                BtStatus::Success
            }
            BehaviorNode::Selector(children) => {
                for child in children.iter_mut() {
                    let result = child.update_logged(ctx, bb, config, rng, log);
                    if result != BtStatus::Fail {
                        return result;
                    }
                }
                BtStatus::Fail
            }
            BehaviorNode::Parallel(children) => {
                let mut terminal = None;
                for child in children.iter_mut() {
                    let result = child.update_logged(ctx, bb, config, rng, log);
                    if result != BtStatus::Running && terminal.is_none() {
                        terminal = Some(result);
                    }
                }
                terminal.unwrap_or(BtStatus::Running)
            }
            BehaviorNode::Negate(child) => match child.update_logged(ctx, bb, config, rng, log) {
                BtStatus::Success => BtStatus::Fail,
                BtStatus::Fail => BtStatus::Success,
                BtStatus::Running => BtStatus::Running,
            },
            BehaviorNode::Leaf(leaf) => {
                let result = leaf.update(ctx, bb, config, rng);
                log.behavior(ctx.entity, "leaf", &format!("{result:?}"));
                result
            }
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct BtRoot(pub BehaviorNode);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Action, PatrolPos, Position, Team};
    use crate::world_view::WorldSnapshot;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn base_ctx<'a>(
        world: &'a WorldSnapshot,
        config: &'a AiCoreConfig,
        action: &'a mut Action,
        patrol_pos: &'a mut PatrolPos,
        say_queue: &'a mut Vec<(String, [f32; 4])>,
    ) -> EntityCtx<'a> {
        EntityCtx {
            world,
            config,
            entity: Entity::from_raw(0),
            position: Position::new(0, 0),
            team: Team(1),
            hitpoints: 50.0,
            action,
            patrol_pos: Some(patrol_pos),
            resting_base: None,
            next_heal_position: None,
            sleep_state: None,
            heals_planted: None,
            say_queue,
        }
    }

    #[test]
    fn sequence_fails_fast_on_first_non_success() {
        let world = WorldSnapshot::default();
        let config = AiCoreConfig::default();
        let mut action = Action::Nop;
        let mut patrol_pos = PatrolPos(bevy::math::IVec2::ZERO);
        let mut say_queue = Vec::new();
        let mut ctx = base_ctx(&world, &config, &mut action, &mut patrol_pos, &mut say_queue);
        let mut bb = Blackboard::new();
        let mut rng = StdRng::seed_from_u64(0);

        let mut tree = BehaviorNode::Sequence(vec![
            BehaviorNode::leaf(BtLeaf::IsLowHp(10.0)),
            BehaviorNode::leaf(BtLeaf::PatchUp(100.0)),
        ]);
        let status = tree.update(&mut ctx, &mut bb, &config, &mut rng);
        assert_eq!(status, BtStatus::Fail);
    }

    #[test]
    fn selector_returns_first_non_fail() {
        let world = WorldSnapshot::default();
        let config = AiCoreConfig::default();
        let mut action = Action::Nop;
        let mut patrol_pos = PatrolPos(bevy::math::IVec2::ZERO);
        let mut say_queue = Vec::new();
        let mut ctx = base_ctx(&world, &config, &mut action, &mut patrol_pos, &mut say_queue);
        let mut bb = Blackboard::new();
        let mut rng = StdRng::seed_from_u64(0);

        let mut tree = BehaviorNode::Selector(vec![
            BehaviorNode::leaf(BtLeaf::IsLowHp(10.0)),
            BehaviorNode::leaf(BtLeaf::PatchUp(100.0)),
        ]);
        let status = tree.update(&mut ctx, &mut bb, &config, &mut rng);
        assert_eq!(status, BtStatus::Running);
        assert_eq!(action, Action::HealSelf);
    }

    #[test]
    fn negate_swaps_success_and_fail_but_not_running() {
        let world = WorldSnapshot::default();
        let config = AiCoreConfig::default();
        let mut action = Action::Nop;
        let mut patrol_pos = PatrolPos(bevy::math::IVec2::ZERO);
        let mut say_queue = Vec::new();
        let mut ctx = base_ctx(&world, &config, &mut action, &mut patrol_pos, &mut say_queue);
        let mut bb = Blackboard::new();
        let mut rng = StdRng::seed_from_u64(0);

        let mut tree = BehaviorNode::negate(BehaviorNode::leaf(BtLeaf::IsLowHp(100.0)));
        assert_eq!(
            tree.update(&mut ctx, &mut bb, &config, &mut rng),
            BtStatus::Fail
        );

        let mut tree2 = BehaviorNode::negate(BehaviorNode::leaf(BtLeaf::RandomMove));
        assert_eq!(
            tree2.update(&mut ctx, &mut bb, &config, &mut rng),
            BtStatus::Running
        );
    }
}
