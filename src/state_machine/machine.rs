//! Machine model

use serde::Serialize;
use std::fmt;

/// A validated transition between two states of one machine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MachineTransition {
    pub from: String,
    pub to: String,
    pub signal: Option<String>,
}

impl MachineTransition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, signal: Option<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            signal,
        }
    }

    /// Get display label for the transition
    pub fn display_label(&self) -> &str {
        self.signal.as_deref().unwrap_or("transition")
    }
}

impl fmt::Display for MachineTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} on {}", self.from, self.to, self.display_label())
    }
}

/// One discovered machine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineModel {
    pub id: String,
    /// Registration order, duplicates kept
    pub states: Vec<String>,
    pub transitions: Vec<MachineTransition>,
}

impl MachineModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Whether both endpoints are registered states of this machine
    pub fn owns(&self, from: &str, to: &str) -> bool {
        self.has_state(from) && self.has_state(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owns_requires_both_endpoints() {
        let mut machine = MachineModel::new("m");
        machine.states = vec!["a".to_string(), "b".to_string()];

        assert!(machine.owns("a", "b"));
        assert!(machine.owns("b", "b"));
        assert!(!machine.owns("a", "c"));
        assert!(!machine.owns("c", "a"));
    }

    #[test]
    fn test_transition_display() {
        let t = MachineTransition::new("s1", "s2", Some("timeout".to_string()));
        assert_eq!(t.to_string(), "s1 -> s2 on timeout");

        let t = MachineTransition::new("s1", "s2", None);
        assert_eq!(t.to_string(), "s1 -> s2 on transition");
    }
}
