//! Hierarchical finite state machine (spec.md §4.C).
//!
//! A [`StateMachine`] is either a leaf wrapping one [`leaves::Leaf`] or a
//! composite owning an ordered list of children plus, per child, an
//! ordered transition list. This is the "graph of children" redesign note
//! (spec.md §9) made concrete: index-based references within one
//! composite, no back-pointers, ownership structural and recursive.

pub mod leaves;

use bevy::prelude::*;
use rand::Rng;

pub use leaves::Leaf;

use crate::config::AiCoreConfig;
use crate::core::log::DecisionLog;
use crate::ctx::EntityCtx;
use crate::predicate::Predicate;

#[derive(Debug, Clone)]
pub enum StateMachine {
    Leaf(Leaf),
    Composite(Composite),
}

#[derive(Debug, Clone)]
pub struct Composite {
    children: Vec<StateMachine>,
    /// `transitions[i]` is the ordered `(predicate, target)` list evaluated
    /// while `current == i` (spec.md §4.C "scan transitions in insertion
    /// order").
    transitions: Vec<Vec<(Predicate, usize)>>,
    current: usize,
}

impl Composite {
    pub fn new(children: Vec<StateMachine>) -> Self {
        let transitions = children.iter().map(|_| Vec::new()).collect();
        Self {
            children,
            transitions,
            current: 0,
        }
    }

    /// Appends a `(predicate, from -> to)` transition. Panics if either
    /// index is out of range for this composite's sibling list — a
    /// malformed transition is a construction-time program bug (spec.md
    /// §7 "shape errors").
    pub fn add_transition(&mut self, from: usize, predicate: Predicate, to: usize) -> &mut Self {
        assert!(
            from < self.children.len(),
            "{}",
            crate::error::AiCoreError::TransitionTargetOutOfRange {
                target: from,
                len: self.children.len()
            }
        );
        assert!(
            to < self.children.len(),
            "{}",
            crate::error::AiCoreError::TransitionTargetOutOfRange {
                target: to,
                len: self.children.len()
            }
        );
        self.transitions[from].push((predicate, to));
        self
    }
}

impl StateMachine {
    pub fn leaf(leaf: Leaf) -> Self {
        StateMachine::Leaf(leaf)
    }

    pub fn composite(composite: Composite) -> Self {
        StateMachine::Composite(composite)
    }

    /// Invoked when this machine becomes the active child of its parent
    /// (or is the root, entered once at construction). Recurses into the
    /// current child so nested composites activate their own initial
    /// state.
    pub fn enter(&mut self) {
        if let StateMachine::Composite(c) = self {
            c.children[c.current].enter();
        }
    }

    pub fn exit(&mut self) {
        if let StateMachine::Composite(c) = self {
            c.children[c.current].exit();
        }
    }

    /// `dt` is accepted for contract parity with spec.md §4.C's
    /// `act(dt, world, entity)` but unused: every tick here is a fixed
    /// one-tick step (spec.md §1 non-goal "no continuous-time simulation").
    pub fn act(
        &mut self,
        _dt: f32,
        ctx: &mut EntityCtx<'_>,
        config: &AiCoreConfig,
        rng: &mut impl Rng,
        log: &mut DecisionLog,
    ) {
        match self {
            StateMachine::Leaf(leaf) => leaf.act(ctx, config, rng),
            StateMachine::Composite(c) => {
                let mut fired = None;
                for (predicate, target) in &c.transitions[c.current] {
                    if predicate.eval(ctx) {
                        fired = Some(*target);
                        break;
                    }
                }
                if let Some(target) = fired {
                    c.children[c.current].exit();
                    let from = c.current;
                    c.current = target;
                    c.children[c.current].enter();
                    log.transition(ctx.entity, from, target);
                }
                c.children[c.current].act(_dt, ctx, config, rng, log);
            }
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct FsmRoot(pub StateMachine);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Action, NumHealsPlanted, PatrolPos, Position, RestingBase, SleepState, Team};
    use crate::world_view::WorldSnapshot;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn make_ctx<'a>(
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
            hitpoints: 100.0,
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
    fn berserker_transitions_into_move_to_enemy_when_foe_in_sight() {
        let mut world = WorldSnapshot::default();
        world.entities.push(crate::world_view::EntitySnapshot {
            entity: Entity::from_raw(1),
            position: Position::new(2, 0),
            team: Team(0),
            hitpoints: 10.0,
            is_hive: false,
            is_buff: false,
            has_shoot_damage: false,
            is_player: true,
            player_healing_cooldown: 0.0,
        });
        world.player = Some(Entity::from_raw(1));

        let config = AiCoreConfig::default();
        let mut action = Action::Nop;
        let mut patrol_pos = PatrolPos(bevy::math::IVec2::ZERO);
        let mut log = DecisionLog::new(10);
        let mut rng = StdRng::seed_from_u64(0);

        let patrol = StateMachine::leaf(Leaf::Patrol(3.0));
        let chase = StateMachine::leaf(Leaf::MoveToEnemy);
        let mut composite = Composite::new(vec![patrol, chase]);
        composite.add_transition(0, Predicate::EnemyAvailable(3.0), 1);
        composite.add_transition(1, Predicate::not(Predicate::EnemyAvailable(5.0)), 0);
        let mut fsm = StateMachine::composite(composite);
        fsm.enter();

        let mut say_queue = Vec::new();
        let mut ctx = make_ctx(&world, &config, &mut action, &mut patrol_pos, &mut say_queue);
        fsm.act(1.0, &mut ctx, &config, &mut rng, &mut log);

        assert_eq!(action, Action::Right);
    }
}
