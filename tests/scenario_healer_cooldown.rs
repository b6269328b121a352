//! Healer cooldown scenario (spec.md §8, scenario 2): a healer adjacent to
//! the player selects `HealPlayer` while the player's HP is low and their
//! healing cooldown is zero; once the host applies the heal and sets a
//! cooldown, the healer falls back to its move branch until the cooldown
//! expires.

use ai_core::AiCorePlugin;
use ai_core::SayQueue;
use ai_core::fsm::{Composite, FsmRoot, Leaf, StateMachine};
use ai_core::position::{Action, ActionSlot, Hitpoints, Player, PlayerHealingCooldown, Position, Team};
use ai_core::predicate::Predicate;
use ai_core::world::WorldMap;
use bevy::prelude::*;

/// Two states: idle movement toward the player, and the heal itself, gated
/// on "player is hurt and off cooldown" (spec.md §4.C "HealPlayer").
fn healer_fsm() -> StateMachine {
    let approach = StateMachine::leaf(Leaf::MoveToPlayer);
    let heal = StateMachine::leaf(Leaf::HealPlayer);
    let mut composite = Composite::new(vec![approach, heal]);
    let can_heal = Predicate::and(
        Predicate::PlayerHitpointsLessThan(50.0),
        Predicate::not(Predicate::PlayerHealingCooldown),
    );
    composite.add_transition(0, can_heal.clone(), 1);
    composite.add_transition(1, Predicate::not(can_heal), 0);
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
fn heals_when_off_cooldown_then_waits_out_the_cooldown() {
    let mut app = new_app();

    let player = app
        .world_mut()
        .spawn((
            Position::new(5, 5),
            Team::PLAYER,
            Hitpoints(30.0),
            Player,
            ActionSlot::default(),
            SayQueue::default(),
        ))
        .id();

    let healer = app
        .world_mut()
        .spawn((
            Position::new(6, 5),
            Team(1),
            Hitpoints(40.0),
            ActionSlot::default(),
            SayQueue::default(),
            FsmRoot(healer_fsm()),
        ))
        .id();

    // Player is hurt, cooldown is 0: heals.
    app.update();
    let action = app.world().get::<ActionSlot>(healer).unwrap().0;
    assert_eq!(action, Action::HealPlayer);

    // Host resolves the heal: raises player HP, sets the cooldown.
    app.world_mut().get_mut::<Hitpoints>(player).unwrap().0 += 200.0;
    app.world_mut()
        .entity_mut(player)
        .insert(PlayerHealingCooldown(10.0));

    // Cooldown active: falls back to the move branch, never heals again
    // while it holds.
    for _ in 0..5 {
        app.update();
        let action = app.world().get::<ActionSlot>(healer).unwrap().0;
        assert_ne!(action, Action::HealPlayer);
    }

    // Host counts the cooldown down to 0 and the player drops back below
    // the heal threshold: resumes healing.
    app.world_mut()
        .entity_mut(player)
        .insert(PlayerHealingCooldown(0.0));
    app.world_mut().get_mut::<Hitpoints>(player).unwrap().0 = 20.0;

    app.update();
    let action = app.world().get::<ActionSlot>(healer).unwrap().0;
    assert_eq!(action, Action::HealPlayer);
}
