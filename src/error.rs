use thiserror::Error;

/// Program-bug errors (spec.md §7 "shape errors" / "map errors"). These are
/// never returned across the tick boundary — they are raised via `panic!`
/// at the point of violation, matching the teacher's
/// `.expect("WakeUp action must be registered")` idiom for invariants a
/// well-formed decision tree is supposed to uphold by construction.
///
/// Referential errors (dead blackboard target) and empty-query errors
/// (no foes found) are *not* represented here: they resolve to BT `Fail`
/// or `Action::Nop` respectively, never to a `Result`.
#[derive(Debug, Error)]
pub enum AiCoreError {
    #[error("blackboard index {index} out of range (len {len})")]
    BlackboardIndexOutOfRange { index: usize, len: usize },

    #[error("blackboard cell {index} holds {actual:?}, expected {expected:?}")]
    BlackboardTypeMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("blackboard cell \"{name}\" already registered with a different type")]
    BlackboardConflictingRegistration { name: String },

    #[error("FSM transition target {target} out of range ({len} siblings)")]
    TransitionTargetOutOfRange { target: usize, len: usize },

    #[error("dijkstra map seed at ({x}, {y}) is out of bounds ({width}x{height})")]
    SeedOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}
