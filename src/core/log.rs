use bevy::prelude::*;
use chrono::Local;
use std::collections::VecDeque;

// ═══════════════════════════════════════════════════════════════════════════
// LOG CATEGORIES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// FSM transition fires (exit/enter pair).
    Transition,
    /// Behaviour tree compound/leaf results.
    Behavior,
    /// Utility selector picks (ranked, softmax, inertial).
    Utility,
    /// Dijkstra map regeneration and follower moves.
    Map,
    Debug,
}

impl LogCategory {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogCategory::Transition => "[Transition]",
            LogCategory::Behavior => "[Behavior]",
            LogCategory::Utility => "[Utility]",
            LogCategory::Map => "[Map]",
            LogCategory::Debug => "[Debug]",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub category: LogCategory,
    pub message: String,
    pub entity: Option<Entity>,
}

// ═══════════════════════════════════════════════════════════════════════════
// DECISION LOG RESOURCE
// ═══════════════════════════════════════════════════════════════════════════

/// In-memory, `tracing`-backed categorized log of decision-core activity.
///
/// Adapted from the teacher's `core::log::GameLog`: a ring buffer sized for
/// quick inspection in tests plus forwarding to `tracing` so a host can
/// route it through whatever subscriber it already has configured.
#[derive(Resource)]
pub struct DecisionLog {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
}

impl DecisionLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    fn log_internal(&mut self, category: LogCategory, message: String, entity: Option<Entity>) {
        match category {
            LogCategory::Debug => tracing::debug!(target: "ai_core", "{} {}", category.prefix(), message),
            _ => tracing::info!(target: "ai_core", "{} {}", category.prefix(), message),
        }

        self.entries.push_back(LogEntry {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            category,
            message,
            entity,
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn transition(&mut self, entity: Entity, from_child: usize, to_child: usize) {
        self.log_internal(
            LogCategory::Transition,
            format!("child {from_child} -> {to_child}"),
            Some(entity),
        );
    }

    pub fn behavior(&mut self, entity: Entity, node: &str, result: &str) {
        self.log_internal(
            LogCategory::Behavior,
            format!("{node} -> {result}"),
            Some(entity),
        );
    }

    pub fn utility(&mut self, entity: Entity, selector: &str, winner: usize, score: f32) {
        self.log_internal(
            LogCategory::Utility,
            format!("{selector} picked child {winner} (score {score:.2})"),
            Some(entity),
        );
    }

    pub fn map(&mut self, name: &str, message: impl Into<String>) {
        self.log_internal(LogCategory::Map, format!("{name}: {}", message.into()), None);
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.log_internal(LogCategory::Debug, message.into(), None);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_evicts_oldest() {
        let mut log = DecisionLog::new(2);
        log.debug("a");
        log.debug("b");
        log.debug("c");
        let messages: Vec<_> = log.entries().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["b".to_string(), "c".to_string()]);
    }
}
