//! Berserker scenario (spec.md §8, scenario 1): a patrolling entity whose
//! FSM chases the nearest foe once sighted, and returns to patrol once the
//! foe is out of range.

use ai_core::AiCorePlugin;
use ai_core::SayQueue;
use ai_core::fsm::{Composite, FsmRoot, Leaf, StateMachine};
use ai_core::position::{Action, ActionSlot, Buff, Hitpoints, PatrolPos, Player, Position, Team};
use ai_core::predicate::Predicate;
use ai_core::world::WorldMap;
use bevy::prelude::*;

fn berserker_fsm() -> StateMachine {
    let patrol = StateMachine::leaf(Leaf::Patrol(2.0));
    let chase = StateMachine::leaf(Leaf::MoveToEnemy);
    let mut composite = Composite::new(vec![patrol, chase]);
    composite.add_transition(0, Predicate::EnemyAvailable(3.0), 1);
    composite.add_transition(1, Predicate::not(Predicate::EnemyAvailable(5.0)), 0);
    let mut fsm = StateMachine::composite(composite);
    fsm.enter();
    fsm
}

fn new_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(WorldMap::new(16, 16))
        .add_plugins(AiCorePlugin);
    app
}

#[test]
fn patrols_until_a_foe_is_sighted_then_chases_it() {
    let mut app = new_app();

    let berserker = app
        .world_mut()
        .spawn((
            Position::new(5, 5),
            Team(1),
            Hitpoints(40.0),
            ActionSlot::default(),
            SayQueue::default(),
            PatrolPos(IVec2::new(5, 5)),
            FsmRoot(berserker_fsm()),
        ))
        .id();

    // No foe yet: at distance 0 from its own patrol anchor, it picks a
    // uniformly random cardinal move (spec.md §4.C "Patrol").
    app.update();
    let action = app.world().get::<ActionSlot>(berserker).unwrap().0;
    assert!(action.is_move());

    // Foe (the player) appears at distance 2 (SIGHT_NEIGHBORHOOD = 3).
    let player = app
        .world_mut()
        .spawn((
            Position::new(7, 5),
            Team::PLAYER,
            Hitpoints(10.0),
            Player,
            ActionSlot::default(),
            SayQueue::default(),
        ))
        .id();

    app.update();
    let action = app.world().get::<ActionSlot>(berserker).unwrap().0;
    assert_eq!(action, Action::Right, "should step toward the foe to its east");

    // Foe moves out beyond the disengage radius (distance 5): reverts to patrol.
    app.world_mut().get_mut::<Position>(player).unwrap().0 = IVec2::new(20, 20);

    app.update();
    // Far from its patrol anchor (5,5) it is now, not more than 2.0 away
    // since it hasn't moved; the FSM is back in Patrol, which at distance 0
    // from its own anchor picks a uniformly random cardinal move — not the
    // chase leaf's deterministic `Right`.
    let action_after = app.world().get::<ActionSlot>(berserker).unwrap().0;
    assert!(action_after.is_move() || action_after == Action::Nop);
}

#[test]
fn buff_marker_does_not_interfere_with_foe_detection() {
    // A Buff-tagged entity on the same team as the berserker must never be
    // treated as a foe by `EnemyAvailable`/`closest_foe` (team equality is
    // the only criterion, spec.md §4.B).
    let mut app = new_app();
    let berserker = app
        .world_mut()
        .spawn((
            Position::new(0, 0),
            Team(1),
            Hitpoints(40.0),
            ActionSlot::default(),
            SayQueue::default(),
            PatrolPos(IVec2::new(0, 0)),
            FsmRoot(berserker_fsm()),
        ))
        .id();
    app.world_mut().spawn((
        Position::new(1, 0),
        Team(1),
        Hitpoints(10.0),
        Buff,
        ActionSlot::default(),
        SayQueue::default(),
    ));

    app.update();
    let action = app.world().get::<ActionSlot>(berserker).unwrap().0;
    // Never chases a same-team buff entity.
    assert_ne!(action, Action::Right);
}
