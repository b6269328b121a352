//! Boolean predicate algebra over `(world, entity)` (spec.md §4.B).
//!
//! Predicates are a tagged-variant tree ([`Predicate`]) per the
//! "polymorphic node hierarchies" redesign note (spec.md §9): no trait
//! objects, no owning pointers, just an enum with `Not`/`And`/`Or` folds.
//! Evaluation reads and, for the two latch predicates, writes through a
//! shared [`crate::ctx::EntityCtx`] assembled by the caller.

use crate::ctx::EntityCtx;

#[derive(Debug, Clone)]
pub enum Predicate {
    EnemyAvailable(f32),
    HitpointsLessThan(f32),
    PlayerAvailable(f32),
    PlayerHitpointsLessThan(f32),
    PlayerHealingCooldown,
    AtRestingBase,
    AtNextHealPosition,
    AlwaysTrue,
    WorkDone,
    FinishedSleeping,
    Not(Box<Predicate>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn not(p: Predicate) -> Predicate {
        Predicate::Not(Box::new(p))
    }

    pub fn and(a: Predicate, b: Predicate) -> Predicate {
        Predicate::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Predicate, b: Predicate) -> Predicate {
        Predicate::Or(Box::new(a), Box::new(b))
    }

    /// Left-fold of [`Predicate::and`] over `ps`; `true` (via `AlwaysTrue`)
    /// on an empty iterator.
    pub fn all(ps: impl IntoIterator<Item = Predicate>) -> Predicate {
        ps.into_iter()
            .fold(Predicate::AlwaysTrue, |acc, p| Predicate::and(acc, p))
    }

    pub fn eval(&self, ctx: &mut EntityCtx<'_>) -> bool {
        match self {
            Predicate::EnemyAvailable(d) => {
                let snapshot = ctx.snapshot();
                ctx.world.closest_foe(&snapshot, *d).is_some()
            }
            Predicate::HitpointsLessThan(t) => ctx.hitpoints < *t,
            Predicate::PlayerAvailable(d) => ctx
                .world
                .player()
                .is_some_and(|p| ctx.position.distance_euclidean(p.position) <= *d),
            Predicate::PlayerHitpointsLessThan(t) => {
                ctx.world.player().is_some_and(|p| p.hitpoints < *t)
            }
            Predicate::PlayerHealingCooldown => ctx
                .world
                .player()
                .is_some_and(|p| p.player_healing_cooldown > 0.0),
            Predicate::AtRestingBase => {
                let at_base = ctx
                    .resting_base
                    .is_some_and(|base| base.position() == ctx.position);
                if at_base
                    && let Some(sleep) = ctx.sleep_state.as_deref_mut()
                    && sleep.time_left == 0.0
                {
                    // Edge-triggered latch (spec.md §9 open question):
                    // only (re)seed on the false->true transition. An
                    // already-counting-down sleep is left alone.
                    sleep.time_left = sleep.timer;
                    sleep.should_sleep = true;
                }
                at_base
            }
            Predicate::AtNextHealPosition => ctx
                .next_heal_position
                .as_deref()
                .is_some_and(|pos| pos.position() == ctx.position),
            Predicate::AlwaysTrue => true,
            Predicate::WorkDone => ctx
                .heals_planted
                .as_deref()
                .is_some_and(|h| h.planted == h.needed),
            Predicate::FinishedSleeping => {
                let Some(sleep) = ctx.sleep_state.as_deref_mut() else {
                    return false;
                };
                let finished = sleep.should_sleep && sleep.time_left == 0.0;
                if finished {
                    sleep.should_sleep = false;
                    if let Some(heals) = ctx.heals_planted.as_deref_mut() {
                        heals.planted = 0;
                    }
                }
                finished
            }
            Predicate::Not(p) => !p.eval(ctx),
            Predicate::And(a, b) => a.eval(ctx) && b.eval(ctx),
            Predicate::Or(a, b) => a.eval(ctx) || b.eval(ctx),
        }
    }
}
