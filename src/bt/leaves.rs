use bevy::prelude::*;
use rand::Rng;

use super::BtStatus;
use crate::blackboard::{BbIndex, Blackboard};
use crate::config::AiCoreConfig;
use crate::ctx::EntityCtx;
use crate::position::{self, Action, Position};

/// Behaviour tree leaf (action/condition) nodes (spec.md §4.E).
#[derive(Debug, Clone)]
pub enum BtLeaf {
    MoveToEntity(BbIndex<Entity>),
    MoveToPosition(BbIndex<IVec2>),
    IsLowHp(f32),
    FindEnemy(f32, BbIndex<Entity>),
    FindBuff(BbIndex<Entity>),
    Flee(BbIndex<Entity>),
    Patrol(f32, BbIndex<IVec2>),
    MoveToNextWaypoint {
        waypoints: Vec<Position>,
        index: usize,
    },
    Say(String, [f32; 4]),
    PatchUp(f32),
    RandomMove,
}

impl BtLeaf {
    /// Builds a `Patrol` leaf, seeding `posBB` with the entity's current
    /// position at construction time (spec.md §4.E "on construction, seed
    /// posBB with the entity's current position").
    pub fn patrol(d: f32, bb: &mut Blackboard, current_position: IVec2) -> Self {
        let idx = bb.register::<IVec2>("patrol_pos", current_position);
        BtLeaf::Patrol(d, idx)
    }

    pub fn update(
        &mut self,
        ctx: &mut EntityCtx<'_>,
        bb: &mut Blackboard,
        config: &AiCoreConfig,
        rng: &mut impl Rng,
    ) -> BtStatus {
        match self {
            BtLeaf::MoveToEntity(target_bb) => {
                let target = bb.get(*target_bb);
                match ctx.world.get(target) {
                    None => BtStatus::Fail,
                    Some(snapshot) if snapshot.position == ctx.position => BtStatus::Success,
                    Some(snapshot) => {
                        move_or_nop(ctx, snapshot.position, false);
                        BtStatus::Running
                    }
                }
            }
            BtLeaf::MoveToPosition(pos_bb) => {
                let target = Position(bb.get(*pos_bb));
                if target == ctx.position {
                    BtStatus::Success
                } else {
                    move_or_nop(ctx, target, false);
                    BtStatus::Running
                }
            }
            BtLeaf::IsLowHp(t) => {
                if ctx.hitpoints < *t {
                    BtStatus::Success
                } else {
                    BtStatus::Fail
                }
            }
            BtLeaf::FindEnemy(d, target_bb) => {
                let snapshot = ctx.snapshot();
                match ctx.world.closest_foe(&snapshot, *d) {
                    Some(foe) => {
                        bb.set(*target_bb, foe.entity);
                        BtStatus::Success
                    }
                    None => BtStatus::Fail,
                }
            }
            BtLeaf::FindBuff(target_bb) => {
                let snapshot = ctx.snapshot();
                match ctx.world.closest_buff(&snapshot) {
                    Some(buff) => {
                        bb.set(*target_bb, buff.entity);
                        BtStatus::Success
                    }
                    None => BtStatus::Fail,
                }
            }
            BtLeaf::Flee(target_bb) => {
                let target = bb.get(*target_bb);
                match ctx.world.get(target) {
                    None => BtStatus::Fail,
                    Some(snapshot) => {
                        move_or_nop(ctx, snapshot.position, true);
                        BtStatus::Running
                    }
                }
            }
            BtLeaf::Patrol(d, pos_bb) => {
                let anchor = Position(bb.get(*pos_bb));
                if ctx.position.distance_euclidean(anchor) > *d {
                    move_or_nop(ctx, anchor, false);
                } else {
                    *ctx.action = crate::rng::random_cardinal_move(rng);
                }
                BtStatus::Running
            }
            BtLeaf::MoveToNextWaypoint { waypoints, index } => {
                if waypoints.is_empty() {
                    *ctx.action = Action::Nop;
                    return BtStatus::Success;
                }
                let target = waypoints[*index];
                if target == ctx.position {
                    *index = (*index + 1) % waypoints.len();
                    BtStatus::Success
                } else {
                    move_or_nop(ctx, target, false);
                    BtStatus::Running
                }
            }
            BtLeaf::Say(text, color) => {
                ctx.say_queue.push((text.clone(), *color));
                BtStatus::Success
            }
            BtLeaf::PatchUp(t) => {
                if ctx.hitpoints >= *t {
                    BtStatus::Success
                } else {
                    *ctx.action = Action::HealSelf;
                    BtStatus::Running
                }
            }
            BtLeaf::RandomMove => {
                *ctx.action = crate::rng::random_cardinal_move(rng);
                BtStatus::Running
            }
        }
    }
}

fn move_or_nop(ctx: &mut EntityCtx<'_>, target: Position, inverse: bool) {
    match position::move_towards(ctx.position, target) {
        Some(action) => *ctx.action = if inverse { action.inverse() } else { action },
        None => *ctx.action = Action::Nop,
    }
}
