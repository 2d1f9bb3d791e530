//! Graph assembler
//!
//! Partitions the extractor's flat facts by owning machine. A transition is
//! owned by a machine when both of its endpoints were registered as states of
//! that machine; nothing else about position or scope is considered.

use crate::parser::{Extraction, RawTransition};
use crate::state_machine::{MachineModel, MachineTransition};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How a transition is resolved when several machines share the endpoint names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OwnershipPolicy {
    /// Accept into every machine whose states contain both endpoints
    #[default]
    AllMatches,
    /// Accept only into the first such machine, in declaration order
    FirstMatch,
}

/// Machine models of one extraction run, in declaration order
#[derive(Debug, Clone, Default)]
pub struct MachineSet {
    machines: Vec<MachineModel>,
    index: HashMap<String, usize>,
}

impl MachineSet {
    /// Adds an empty model unless `id` is already known; first declaration wins.
    fn declare(&mut self, id: &str) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        self.index.insert(id.to_string(), self.machines.len());
        self.machines.push(MachineModel::new(id));
        true
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut MachineModel> {
        let idx = *self.index.get(id)?;
        self.machines.get_mut(idx)
    }

    pub fn get(&self, id: &str) -> Option<&MachineModel> {
        self.index.get(id).and_then(|&idx| self.machines.get(idx))
    }

    pub fn machines(&self) -> &[MachineModel] {
        &self.machines
    }

    pub fn ids(&self) -> Vec<&str> {
        self.machines.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MachineModel> {
        self.machines.iter()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// States across all machines, duplicates removed, first-seen order
    pub fn all_states(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.machines
            .iter()
            .flat_map(|m| m.states.iter().map(String::as_str))
            .filter(|s| seen.insert(*s))
            .collect()
    }

    /// Transitions across all machines, duplicates removed, first-seen order
    pub fn all_transitions(&self) -> Vec<&MachineTransition> {
        let mut seen = HashSet::new();
        self.machines
            .iter()
            .flat_map(|m| m.transitions.iter())
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

/// Builds one [`MachineModel`] per declared machine
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphAssembler {
    ownership: OwnershipPolicy,
}

impl GraphAssembler {
    pub fn new(ownership: OwnershipPolicy) -> Self {
        Self { ownership }
    }

    pub fn ownership(&self) -> OwnershipPolicy {
        self.ownership
    }

    pub fn assemble(&self, extraction: &Extraction) -> MachineSet {
        let mut set = MachineSet::default();

        for id in &extraction.machines {
            if !set.declare(id) {
                tracing::trace!(machine = %id, "Machine declared more than once");
            }
        }

        for registration in &extraction.states {
            match set.get_mut(&registration.machine) {
                Some(machine) => machine.states.push(registration.state.clone()),
                None => tracing::trace!(
                    machine = %registration.machine,
                    state = %registration.state,
                    "Dropping state of unknown machine"
                ),
            }
        }

        for transition in dedup_transitions(&extraction.transitions) {
            let accepted = self.associate(&mut set, transition);
            if accepted == 0 {
                tracing::debug!(
                    from = %transition.source,
                    to = %transition.target,
                    idiom = %transition.idiom,
                    "Dropping transition with no owning machine"
                );
            } else if accepted > 1 {
                tracing::debug!(
                    from = %transition.source,
                    to = %transition.target,
                    machines = accepted,
                    "Transition accepted by several machines"
                );
            }
        }

        tracing::debug!(machines = set.len(), "Assembled machine models");
        set
    }

    /// Offer `transition` to the machines in declaration order; returns how
    /// many accepted it.
    fn associate(&self, set: &mut MachineSet, transition: &RawTransition) -> usize {
        let mut accepted = 0;
        for machine in &mut set.machines {
            if !machine.owns(&transition.source, &transition.target) {
                continue;
            }
            machine.transitions.push(MachineTransition::new(
                transition.source.clone(),
                transition.target.clone(),
                transition.signal.clone(),
            ));
            accepted += 1;
            if self.ownership == OwnershipPolicy::FirstMatch {
                break;
            }
        }
        accepted
    }
}

/// Collapse records that describe the same match span twice.
fn dedup_transitions(transitions: &[RawTransition]) -> Vec<&RawTransition> {
    let mut seen = HashSet::new();
    transitions
        .iter()
        .filter(|t| {
            seen.insert((
                t.offset,
                t.source.as_str(),
                t.target.as_str(),
                t.signal.as_deref(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Extractor, StateRegistration, TransitionIdiom};

    fn registration(machine: &str, state: &str) -> StateRegistration {
        StateRegistration {
            machine: machine.to_string(),
            accessor: ".".to_string(),
            state: state.to_string(),
        }
    }

    fn raw(source: &str, target: &str, signal: &str, offset: usize) -> RawTransition {
        RawTransition {
            idiom: TransitionIdiom::SignalTarget,
            source: source.to_string(),
            sender: "sender".to_string(),
            signal: Some(signal.to_string()),
            target: target.to_string(),
            offset,
        }
    }

    fn two_machines() -> Extraction {
        Extraction {
            machines: vec!["m1".to_string(), "m2".to_string()],
            states: vec![
                registration("m1", "A"),
                registration("m1", "B"),
                registration("m2", "C"),
                registration("m2", "D"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_first_declaration_wins() {
        let extraction = Extraction {
            machines: vec!["m".to_string(), "n".to_string(), "m".to_string()],
            ..Default::default()
        };
        let set = GraphAssembler::default().assemble(&extraction);
        assert_eq!(set.ids(), vec!["m", "n"]);
    }

    #[test]
    fn test_states_keep_order_and_duplicates() {
        let extraction = Extraction {
            machines: vec!["m".to_string()],
            states: vec![
                registration("m", "b"),
                registration("m", "a"),
                registration("m", "b"),
            ],
            ..Default::default()
        };
        let set = GraphAssembler::default().assemble(&extraction);
        assert_eq!(set.get("m").unwrap().states, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_unknown_owner_is_dropped() {
        let extraction = Extraction {
            machines: vec!["m".to_string()],
            states: vec![registration("ghost", "a")],
            ..Default::default()
        };
        let set = GraphAssembler::default().assemble(&extraction);
        assert!(set.get("m").unwrap().states.is_empty());
        assert!(set.get("ghost").is_none());
    }

    #[test]
    fn test_transition_only_joins_owning_machine() {
        let mut extraction = two_machines();
        extraction.transitions = vec![raw("A", "B", "sig", 0)];

        let set = GraphAssembler::default().assemble(&extraction);
        assert_eq!(
            set.get("m1").unwrap().transitions,
            vec![MachineTransition::new("A", "B", Some("sig".to_string()))]
        );
        assert!(set.get("m2").unwrap().transitions.is_empty());
    }

    #[test]
    fn test_cross_machine_transition_is_dropped() {
        let mut extraction = two_machines();
        extraction.transitions = vec![raw("A", "C", "sig", 0)];

        let set = GraphAssembler::default().assemble(&extraction);
        assert!(set.all_transitions().is_empty());
    }

    #[test]
    fn test_shared_state_names_follow_ownership_policy() {
        let extraction = Extraction {
            machines: vec!["m1".to_string(), "m2".to_string()],
            states: vec![
                registration("m1", "idle"),
                registration("m1", "busy"),
                registration("m2", "idle"),
                registration("m2", "busy"),
            ],
            transitions: vec![raw("idle", "busy", "go", 10)],
            ..Default::default()
        };

        let all = GraphAssembler::new(OwnershipPolicy::AllMatches).assemble(&extraction);
        assert_eq!(all.get("m1").unwrap().transitions.len(), 1);
        assert_eq!(all.get("m2").unwrap().transitions.len(), 1);

        let first = GraphAssembler::new(OwnershipPolicy::FirstMatch).assemble(&extraction);
        assert_eq!(first.get("m1").unwrap().transitions.len(), 1);
        assert!(first.get("m2").unwrap().transitions.is_empty());
    }

    #[test]
    fn test_same_span_matched_twice_counts_once() {
        let mut extraction = two_machines();
        let mut twin = raw("A", "B", "sig", 7);
        twin.idiom = TransitionIdiom::StringSignal;
        extraction.transitions = vec![raw("A", "B", "sig", 7), twin, raw("A", "B", "sig", 40)];

        let set = GraphAssembler::default().assemble(&extraction);
        // the occurrence at offset 40 is a separate statement in the text
        assert_eq!(set.get("m1").unwrap().transitions.len(), 2);
    }

    #[test]
    fn test_all_states_and_transitions_are_deduplicated() {
        let extraction = Extraction {
            machines: vec!["m1".to_string(), "m2".to_string()],
            states: vec![
                registration("m1", "idle"),
                registration("m1", "busy"),
                registration("m2", "idle"),
                registration("m2", "busy"),
            ],
            transitions: vec![raw("idle", "busy", "go", 0)],
            ..Default::default()
        };
        let set = GraphAssembler::default().assemble(&extraction);
        assert_eq!(set.all_states(), vec!["idle", "busy"]);
        assert_eq!(set.all_transitions().len(), 1);
    }

    #[test]
    fn test_single_machine_from_source() {
        let code = r#"
            QStateMachine m;
            QState *s1 = new QState();
            QState *s2 = new QState();
            m.addState(s1);
            m.addState(s2);
            s1->addTransition(sender, &Sender::sig, s2);
        "#;
        let extraction = Extractor::new().unwrap().extract(code);
        let set = GraphAssembler::default().assemble(&extraction);

        let m = set.get("m").unwrap();
        assert_eq!(m.states, vec!["s1", "s2"]);
        assert_eq!(
            m.transitions,
            vec![MachineTransition::new("s1", "s2", Some("sig".to_string()))]
        );
    }

    #[test]
    fn test_transition_between_unregistered_states() {
        let code = r#"
            QStateMachine m;
            m.addState(other);
            s1->addTransition(sender, &Sender::sig, s2);
        "#;
        let extraction = Extractor::new().unwrap().extract(code);
        assert_eq!(extraction.transitions.len(), 1);

        let set = GraphAssembler::default().assemble(&extraction);
        assert!(set.iter().all(|m| m.transitions.is_empty()));
    }
}
