//! Typed, index-keyed, append-only per-entity scratchpad (spec.md §4.D).
//!
//! Indices are phantom-typed tokens (`BbIndex<T>`) so a caller holding a
//! `BbIndex<Entity>` cannot accidentally pass it to `get::<f32>` at the
//! call site — but the underlying storage is still a small closed enum
//! ([`BbValue`]), since the blackboard itself is a plain ECS component and
//! needs a concrete, `Clone`-able representation. A type mismatch between
//! the token and the stored value is still checked at `get`/`set` time and
//! panics: it can only happen if two different entities' indices are
//! crossed, which is itself a program bug (spec.md §7 "shape errors").

use bevy::prelude::*;
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::AiCoreError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BbValue {
    Entity(Entity),
    Position(IVec2),
    F32(f32),
    Usize(usize),
    Bool(bool),
}

impl BbValue {
    fn type_name(&self) -> &'static str {
        match self {
            BbValue::Entity(_) => "Entity",
            BbValue::Position(_) => "Position",
            BbValue::F32(_) => "f32",
            BbValue::Usize(_) => "usize",
            BbValue::Bool(_) => "bool",
        }
    }
}

/// A type token for blackboard cell at `idx`. Only constructible by
/// [`Blackboard::register`], so a caller can never forge an index into a
/// blackboard it didn't register against.
#[derive(Debug)]
pub struct BbIndex<T> {
    idx: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for BbIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for BbIndex<T> {}

pub trait BbType: Sized {
    fn into_value(self) -> BbValue;
    fn from_value(value: &BbValue) -> Option<Self>;
}

impl BbType for Entity {
    fn into_value(self) -> BbValue {
        BbValue::Entity(self)
    }
    fn from_value(value: &BbValue) -> Option<Self> {
        match value {
            BbValue::Entity(e) => Some(*e),
            _ => None,
        }
    }
}

impl BbType for IVec2 {
    fn into_value(self) -> BbValue {
        BbValue::Position(self)
    }
    fn from_value(value: &BbValue) -> Option<Self> {
        match value {
            BbValue::Position(p) => Some(*p),
            _ => None,
        }
    }
}

impl BbType for f32 {
    fn into_value(self) -> BbValue {
        BbValue::F32(self)
    }
    fn from_value(value: &BbValue) -> Option<Self> {
        match value {
            BbValue::F32(v) => Some(*v),
            _ => None,
        }
    }
}

impl BbType for usize {
    fn into_value(self) -> BbValue {
        BbValue::Usize(self)
    }
    fn from_value(value: &BbValue) -> Option<Self> {
        match value {
            BbValue::Usize(v) => Some(*v),
            _ => None,
        }
    }
}

impl BbType for bool {
    fn into_value(self) -> BbValue {
        BbValue::Bool(self)
    }
    fn from_value(value: &BbValue) -> Option<Self> {
        match value {
            BbValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Blackboard {
    names: HashMap<String, usize>,
    values: Vec<BbValue>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent on `(name, T)`: re-registering the same name with the
    /// same type returns the existing index; re-registering with a
    /// different type panics (spec.md §4.D "creating with conflicting type
    /// fails").
    pub fn register<T: BbType>(&mut self, name: &str, initial: T) -> BbIndex<T> {
        if let Some(&idx) = self.names.get(name) {
            let existing = &self.values[idx];
            if T::from_value(existing).is_none() {
                panic!(
                    "{}",
                    AiCoreError::BlackboardConflictingRegistration {
                        name: name.to_string()
                    }
                );
            }
            return BbIndex {
                idx,
                _marker: PhantomData,
            };
        }
        let idx = self.values.len();
        self.values.push(initial.into_value());
        self.names.insert(name.to_string(), idx);
        BbIndex {
            idx,
            _marker: PhantomData,
        }
    }

    pub fn get<T: BbType>(&self, index: BbIndex<T>) -> T {
        let value = self.values.get(index.idx).unwrap_or_else(|| {
            panic!(
                "{}",
                AiCoreError::BlackboardIndexOutOfRange {
                    index: index.idx,
                    len: self.values.len()
                }
            )
        });
        T::from_value(value).unwrap_or_else(|| {
            panic!(
                "{}",
                AiCoreError::BlackboardTypeMismatch {
                    index: index.idx,
                    expected: std::any::type_name::<T>(),
                    actual: value.type_name(),
                }
            )
        })
    }

    pub fn set<T: BbType>(&mut self, index: BbIndex<T>, value: T) {
        let len = self.values.len();
        let slot = self.values.get_mut(index.idx).unwrap_or_else(|| {
            panic!(
                "{}",
                AiCoreError::BlackboardIndexOutOfRange {
                    index: index.idx,
                    len
                }
            )
        });
        *slot = value.into_value();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_on_same_name_and_type() {
        let mut bb = Blackboard::new();
        let a = bb.register::<f32>("score", 1.0);
        let b = bb.register::<f32>("score", 99.0);
        assert_eq!(a.idx, b.idx);
        assert_eq!(bb.get(a), 1.0);
    }

    #[test]
    fn get_set_round_trips() {
        let mut bb = Blackboard::new();
        let idx = bb.register::<usize>("waypoint", 0);
        bb.set(idx, 3);
        assert_eq!(bb.get(idx), 3);
    }

    #[test]
    #[should_panic]
    fn conflicting_type_registration_panics() {
        let mut bb = Blackboard::new();
        bb.register::<f32>("x", 1.0);
        bb.register::<bool>("x", true);
    }
}
