use bevy::prelude::*;

/// Integer tile coordinate. Every positional record kind in this crate
/// (patrol point, resting base, next-heal point, move target) is a thin
/// newtype over this so they stay mutually inconvertible at the type level
/// while sharing one representation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position(pub IVec2);

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    pub fn distance_euclidean(&self, other: Position) -> f32 {
        self.0.as_vec2().distance(other.0.as_vec2())
    }

    pub fn manhattan(&self, other: Position) -> i32 {
        (self.0.x - other.0.x).abs() + (self.0.y - other.0.y).abs()
    }
}

impl From<IVec2> for Position {
    fn from(v: IVec2) -> Self {
        Self(v)
    }
}

impl From<Position> for IVec2 {
    fn from(p: Position) -> Self {
        p.0
    }
}

macro_rules! position_alias {
    ($name:ident) => {
        #[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
        pub struct $name(pub IVec2);

        impl $name {
            pub fn position(&self) -> Position {
                Position(self.0)
            }
        }

        impl From<Position> for $name {
            fn from(p: Position) -> Self {
                Self(p.0)
            }
        }

        impl From<IVec2> for $name {
            fn from(v: IVec2) -> Self {
                Self(v)
            }
        }

        impl From<$name> for Position {
            fn from(v: $name) -> Self {
                Position(v.0)
            }
        }
    };
}

position_alias!(PatrolPos);
position_alias!(RestingBase);
position_alias!(NextHealPosition);
position_alias!(MoveTarget);

/// The one-per-entity action slot (spec.md §3). Written at most once per
/// tick by the entity's decision structure, consumed and reset to
/// [`Action::Nop`] by the host's resolution phase (spec.md §5 step 4) —
/// resetting it is the host's job, not this crate's; [`ActionSlot::take`]
/// is provided for hosts/tests that want the teacher's "read-then-clear"
/// idiom.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionSlot(pub Action);

impl ActionSlot {
    pub fn set(&mut self, action: Action) {
        self.0 = action;
    }

    pub fn take(&mut self) -> Action {
        std::mem::replace(&mut self.0, Action::Nop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Nop,
    Left,
    Right,
    Up,
    Down,
    Attack,
    HealSelf,
    HealPlayer,
    PlantHeal,
    Sleep,
    Explore,
}

impl Action {
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Left | Action::Right | Action::Up | Action::Down)
    }

    pub fn delta(&self) -> IVec2 {
        match self {
            Action::Left => IVec2::new(-1, 0),
            Action::Right => IVec2::new(1, 0),
            Action::Up => IVec2::new(0, -1),
            Action::Down => IVec2::new(0, 1),
            _ => IVec2::ZERO,
        }
    }

    /// Mirrors left/right and up/down; identity on non-move actions
    /// (`w1/aiLibrary.cpp:inverse_move`).
    pub fn inverse(&self) -> Action {
        match self {
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            other => *other,
        }
    }
}

/// Computes the single-step move action from `from` toward `to`, per the
/// move direction rule (spec.md §4.C): `|Δx| > |Δy|` picks the horizontal
/// direction, otherwise vertical. Returns `None` when `from == to` — callers
/// must treat that as a no-op rather than an error (the FSM/BT leaves that
/// call this already guard on "already at target" before reaching here).
pub fn move_towards(from: Position, to: Position) -> Option<Action> {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0 { Action::Right } else { Action::Left })
    } else if dy < 0 {
        Some(Action::Up)
    } else {
        Some(Action::Down)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Team(pub i32);

impl Team {
    pub const PLAYER: Team = Team(0);
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Hitpoints(pub f32);

impl Hitpoints {
    pub fn is_dead(&self) -> bool {
        self.0 <= 0.0
    }
}

/// Marks the unique player entity (spec.md §4.B "the unique player
/// entity"). Team 0 is the player's team for map-seeding purposes; this
/// marker disambiguates the *entity* predicates read from a team, since a
/// dungeon could in principle have several team-0 allies.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hive;

/// Marks entities that deal ranged damage — excluded from the ally map's
/// seed set (spec.md §4.G "Ally map").
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ShootDamage;

/// Marks a pickup-able buff entity, the target of the BT `FindBuff` leaf.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Buff;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ExplorationStatus {
    pub explored: bool,
}

/// Combines the original source's `SleepTimer` component and `ShouldSleep`
/// tag into one component: a per-tick toggled marker needs the deferred
/// `Commands` insert/remove dance spec.md §4.A describes for *other*
/// mutations, but a plain bool field can be flipped directly within the
/// same query that reads it — simpler, and still observably identical
/// (`should_sleep` is read the same way a `Has<ShouldSleep>` query would be).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SleepState {
    pub time_left: f32,
    pub timer: f32,
    pub should_sleep: bool,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct NumHealsPlanted {
    pub planted: u32,
    pub needed: u32,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerHealingCooldown(pub f32);

#[derive(Component, Debug, Clone, Default)]
pub struct Expression {
    pub text: String,
    pub color: [f32; 4],
}
