use rand::Rng;

use crate::config::AiCoreConfig;
use crate::ctx::EntityCtx;
use crate::position::{self, Action, Position};

/// FSM leaf states (spec.md §4.C). Each writes `ctx.action`; several also
/// mutate their own target component (`PlantHeal` rerolling
/// `NextHealPosition`, `Patrol` wandering when close enough to its anchor).
#[derive(Debug, Clone)]
pub enum Leaf {
    MoveToEnemy,
    FleeFromEnemy,
    Patrol(f32),
    MoveToPlayer,
    MoveToRestingBase,
    MoveToNextPosition,
    HealSelf,
    HealPlayer,
    PlantHeal,
    Sleep,
    Nop,
}

impl Leaf {
    pub fn act(&self, ctx: &mut EntityCtx<'_>, config: &AiCoreConfig, rng: &mut impl Rng) {
        match self {
            Leaf::MoveToEnemy => {
                let snapshot = ctx.snapshot();
                if let Some(foe) = ctx.world.closest_foe(&snapshot, f32::INFINITY) {
                    move_towards_or_nop(ctx, foe.position, false);
                } else {
                    *ctx.action = Action::Nop;
                }
            }
            Leaf::FleeFromEnemy => {
                let snapshot = ctx.snapshot();
                if let Some(foe) = ctx.world.closest_foe(&snapshot, f32::INFINITY) {
                    move_towards_or_nop(ctx, foe.position, true);
                } else {
                    *ctx.action = Action::Nop;
                }
            }
            Leaf::Patrol(d) => patrol(ctx, *d, rng),
            Leaf::MoveToPlayer => {
                if let Some(player) = ctx.world.player() {
                    move_towards_or_nop(ctx, player.position, false);
                } else {
                    *ctx.action = Action::Nop;
                }
            }
            Leaf::MoveToRestingBase => {
                if let Some(base) = ctx.resting_base {
                    move_towards_or_nop(ctx, base.position(), false);
                } else {
                    *ctx.action = Action::Nop;
                }
            }
            Leaf::MoveToNextPosition => {
                if let Some(target) = ctx.next_heal_position.as_deref() {
                    move_towards_or_nop(ctx, target.position(), false);
                } else {
                    *ctx.action = Action::Nop;
                }
            }
            Leaf::HealSelf => *ctx.action = Action::HealSelf,
            Leaf::HealPlayer => *ctx.action = Action::HealPlayer,
            Leaf::PlantHeal => plant_heal(ctx, config, rng),
            Leaf::Sleep => *ctx.action = Action::Sleep,
            Leaf::Nop => *ctx.action = Action::Nop,
        }
    }
}

fn move_towards_or_nop(ctx: &mut EntityCtx<'_>, target: Position, inverse: bool) {
    match position::move_towards(ctx.position, target) {
        Some(action) => *ctx.action = if inverse { action.inverse() } else { action },
        None => *ctx.action = Action::Nop,
    }
}

fn patrol(ctx: &mut EntityCtx<'_>, max_distance: f32, rng: &mut impl Rng) {
    let Some(anchor) = ctx.patrol_pos.as_deref().copied() else {
        *ctx.action = Action::Nop;
        return;
    };
    if ctx.position.distance_euclidean(anchor.position()) > max_distance {
        move_towards_or_nop(ctx, anchor.position(), false);
    } else {
        *ctx.action = crate::rng::random_cardinal_move(rng);
    }
}

fn plant_heal(ctx: &mut EntityCtx<'_>, config: &AiCoreConfig, rng: &mut impl Rng) {
    let Some(target) = ctx.next_heal_position.as_deref().copied() else {
        *ctx.action = Action::Nop;
        return;
    };
    if ctx.position != target.position() {
        *ctx.action = Action::Nop;
        return;
    }
    *ctx.action = Action::PlantHeal;
    if let Some(heals) = ctx.heals_planted.as_deref_mut() {
        heals.planted += 1;
    }
    if let Some(slot) = ctx.next_heal_position.as_deref_mut() {
        let range = config.plant_heal_respawn_range.clone();
        let dx = rng.random_range(range.clone());
        let dy = rng.random_range(range);
        slot.0 = ctx.position.0 + bevy::math::IVec2::new(dx, dy);
    }
}
