//! Parser module - idiom-based extraction of Qt state machine facts
//!
//! There is no tokenizer here: each construct is recognized by flat pattern
//! matching over the raw text. Idioms never look beyond their own match, so a
//! pattern can run past the logical statement it was meant for when the text
//! nests delimiters.

use crate::Result;
use regex::Captures;

pub mod facts;
pub mod idiom;

pub use facts::{
    Connection, Extraction, InitialState, PropertyAssignment, RawTransition, StartCall,
    StateRegistration, TransitionIdiom,
};
pub use idiom::{Catalogue, Decoder, Idiom};

use idiom::capture;

/// Scans source text with the idiom catalogues
#[derive(Debug)]
pub struct Extractor {
    machines: Catalogue<String>,
    states: Catalogue<StateRegistration>,
    transitions: Catalogue<RawTransition>,
    initial_states: Catalogue<InitialState>,
    starts: Catalogue<StartCall>,
    properties: Catalogue<PropertyAssignment>,
    connections: Catalogue<Connection>,
}

impl Extractor {
    /// Build an extractor with the built-in Qt idioms
    pub fn new() -> Result<Self> {
        Ok(Self {
            machines: machine_idioms()?,
            states: state_idioms()?,
            transitions: transition_idioms()?,
            initial_states: initial_state_idioms()?,
            starts: start_idioms()?,
            properties: property_idioms()?,
            connections: connection_idioms()?,
        })
    }

    /// Register an additional machine declaration idiom
    pub fn with_machine_idiom(mut self, idiom: Idiom<String>) -> Self {
        self.machines.push(idiom);
        self
    }

    /// Register an additional transition idiom
    pub fn with_transition_idiom(mut self, idiom: Idiom<RawTransition>) -> Self {
        self.transitions.push(idiom);
        self
    }

    /// Machine identifiers in catalogue order. A machine matched by more than
    /// one idiom is reported once per idiom.
    pub fn find_state_machines(&self, text: &str) -> Vec<String> {
        self.machines.scan(text)
    }

    pub fn find_transitions(&self, text: &str) -> Vec<RawTransition> {
        self.transitions.scan(text)
    }

    pub fn find_state_registrations(&self, text: &str) -> Vec<StateRegistration> {
        self.states.scan(text)
    }

    pub fn find_initial_states(&self, text: &str) -> Vec<InitialState> {
        self.initial_states.scan(text)
    }

    pub fn find_starts(&self, text: &str) -> Vec<StartCall> {
        self.starts.scan(text)
    }

    pub fn find_properties(&self, text: &str) -> Vec<PropertyAssignment> {
        self.properties.scan(text)
    }

    pub fn find_connections(&self, text: &str) -> Vec<Connection> {
        self.connections.scan(text)
    }

    /// Run every catalogue over `text`
    pub fn extract(&self, text: &str) -> Extraction {
        let extraction = Extraction {
            machines: self.find_state_machines(text),
            states: self.find_state_registrations(text),
            transitions: self.find_transitions(text),
            initial_states: self.find_initial_states(text),
            starts: self.find_starts(text),
            properties: self.find_properties(text),
            connections: self.find_connections(text),
        };

        tracing::debug!(
            machines = extraction.machines.len(),
            states = extraction.states.len(),
            transitions = extraction.transitions.len(),
            "Extracted facts"
        );

        extraction
    }
}

fn machine(caps: &Captures<'_>, _offset: usize) -> Option<String> {
    capture(caps, "machine")
}

fn machine_idioms() -> Result<Catalogue<String>> {
    Ok(Catalogue::new()
        // machine = new QStateMachine
        .with(Idiom::new(
            "assignment",
            r"(?P<machine>\w+)\s*=\s*new\s*QStateMachine",
            machine,
        )?)
        // QStateMachine machine;
        .with(Idiom::new(
            "declaration",
            r"QStateMachine\s+(?P<machine>\w+);",
            machine,
        )?)
        // QStateMachine *machine = new QStateMachine
        .with(Idiom::new(
            "pointer",
            r"QStateMachine\s*\*\s*(?P<machine>\w+)\s*=\s*new\s*QStateMachine",
            machine,
        )?)
        .with(Idiom::new(
            "unique-ptr",
            r"std::unique_ptr<QStateMachine>\s+(?P<machine>\w+)\s*=\s*std::make_unique<QStateMachine>\(\)",
            machine,
        )?)
        .with(Idiom::new(
            "shared-ptr",
            r"std::shared_ptr<QStateMachine>\s+(?P<machine>\w+)\s*=\s*std::make_shared<QStateMachine>\(\)",
            machine,
        )?))
}

fn state_idioms() -> Result<Catalogue<StateRegistration>> {
    Ok(Catalogue::new().with(Idiom::new(
        "add-state",
        r"(?P<machine>\w+)(?P<accessor>\.|->)addState\((?P<state>\w+)\);",
        |caps, _| {
            Some(StateRegistration {
                machine: capture(caps, "machine")?,
                accessor: capture(caps, "accessor")?,
                state: capture(caps, "state")?,
            })
        },
    )?))
}

fn initial_state_idioms() -> Result<Catalogue<InitialState>> {
    Ok(Catalogue::new().with(Idiom::new(
        "set-initial-state",
        r"(?P<machine>\w+)(?:\.|->)setInitialState\((?P<state>\w+)\);",
        |caps, _| {
            Some(InitialState {
                machine: capture(caps, "machine")?,
                state: capture(caps, "state")?,
            })
        },
    )?))
}

fn start_idioms() -> Result<Catalogue<StartCall>> {
    Ok(Catalogue::new().with(Idiom::new(
        "start",
        r"(?P<machine>\w+)(?:\.|->)start\(\);",
        |caps, _| {
            Some(StartCall {
                machine: capture(caps, "machine")?,
            })
        },
    )?))
}

fn property_idioms() -> Result<Catalogue<PropertyAssignment>> {
    Ok(Catalogue::new().with(Idiom::new(
        "assign-property",
        r#"(?P<state>\w+)(?:\.|->)assignProperty\(\s*&?(?P<target>\w+),\s*"(?P<property>\w+)",\s*(?P<value>"[^"]*"|\w+)\s*\);"#,
        |caps, _| {
            Some(PropertyAssignment {
                state: capture(caps, "state")?,
                target: capture(caps, "target")?,
                property: capture(caps, "property")?,
                value: capture(caps, "value")?,
            })
        },
    )?))
}

fn connection_idioms() -> Result<Catalogue<Connection>> {
    Ok(Catalogue::new().with(Idiom::new(
        "connect",
        r"connect\(\s*&?(?P<sender>\w+),\s*&(?P<sender_class>\w+)::(?P<signal>\w+),\s*&?(?P<receiver>\w+),\s*&(?P<receiver_class>\w+)::(?P<slot>\w+)\s*\);",
        |caps, _| {
            Some(Connection {
                sender: capture(caps, "sender")?,
                sender_class: capture(caps, "sender_class")?,
                signal: capture(caps, "signal")?,
                receiver: capture(caps, "receiver")?,
                receiver_class: capture(caps, "receiver_class")?,
                slot: capture(caps, "slot")?,
            })
        },
    )?))
}

fn raw_transition(
    idiom: TransitionIdiom,
    caps: &Captures<'_>,
    offset: usize,
) -> Option<RawTransition> {
    Some(RawTransition {
        idiom,
        source: capture(caps, "source")?,
        sender: capture(caps, "sender")?,
        signal: capture(caps, "signal"),
        target: capture(caps, "target")?,
        offset,
    })
}

fn transition_idioms() -> Result<Catalogue<RawTransition>> {
    Ok(Catalogue::new()
        // state->addTransition(sender, &Sender::signal, target);
        .with(Idiom::new(
            TransitionIdiom::SignalTarget.name(),
            r"(?P<source>\w+)(?:\.|->)addTransition\((?P<sender>[^,]+),\s*&(?P<class>\w+)::(?P<signal>\w+),\s*(?P<target>\w+)\);",
            |caps, offset| raw_transition(TransitionIdiom::SignalTarget, caps, offset),
        )?)
        // state->addTransition(sender, SIGNAL(signal()), target);
        .with(Idiom::new(
            TransitionIdiom::StringSignal.name(),
            r"(?P<source>\w+)(?:\.|->)addTransition\((?P<sender>[^,]+),\s*SIGNAL\((?P<signal>\w+)\(\)\),\s*(?P<target>\w+)\);",
            |caps, offset| raw_transition(TransitionIdiom::StringSignal, caps, offset),
        )?)
        // state->addTransition(sender, [target] { ... }, target);
        .with(Idiom::new(
            TransitionIdiom::InlineCallback.name(),
            r"(?P<source>\w+)(?:\.|->)addTransition\((?P<sender>[^,]+),\s*\[\w*\]\s*\{[^}]*\},\s*(?P<target>\w+)\);",
            |caps, offset| raw_transition(TransitionIdiom::InlineCallback, caps, offset),
        )?)
        // QSignalTransition *t = new QSignalTransition(sender, SIGNAL(signal()));
        // t->setTargetState(target);
        // state->addTransition(t);
        .with(Idiom::new(
            TransitionIdiom::ConstructThenAttach.name(),
            r"QSignalTransition\s*\*\s*(?P<var>\w+)\s*=\s*new\s*QSignalTransition\((?P<sender>[^,]+),\s*SIGNAL\((?P<signal>\w+)\(\)\)\);\s*(?P<retarget>\w+)->setTargetState\((?P<target>\w+)\);\s*(?P<source>\w+)->addTransition\((?P<attach>\w+)\);",
            |caps, offset| {
                // the regex engine has no backreferences, so check the variable here
                let var = caps.name("var")?.as_str();
                if caps.name("retarget")?.as_str() != var || caps.name("attach")?.as_str() != var
                {
                    return None;
                }
                raw_transition(TransitionIdiom::ConstructThenAttach, caps, offset)
            },
        )?))
}
