//! Raw facts produced by the extractor
//!
//! Every idiom normalizes its captures into one of these records right after
//! matching, so nothing downstream has to know which textual form produced it.

use serde::Serialize;
use std::fmt;

/// Which transition idiom produced a [`RawTransition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionIdiom {
    /// `state->addTransition(sender, &Class::signal, target);`
    SignalTarget,
    /// `state->addTransition(sender, SIGNAL(signal()), target);`
    StringSignal,
    /// `state->addTransition(sender, [..] { .. }, target);`
    InlineCallback,
    /// `new QSignalTransition(..)` + `setTargetState(..)` + `addTransition(t)`
    ConstructThenAttach,
}

impl TransitionIdiom {
    pub fn name(&self) -> &'static str {
        match self {
            TransitionIdiom::SignalTarget => "signal-target",
            TransitionIdiom::StringSignal => "string-signal",
            TransitionIdiom::InlineCallback => "inline-callback",
            TransitionIdiom::ConstructThenAttach => "construct-then-attach",
        }
    }
}

impl fmt::Display for TransitionIdiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical transition record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTransition {
    pub idiom: TransitionIdiom,
    /// State the transition is attached to
    pub source: String,
    /// Sender expression, verbatim and trimmed (e.g. `new QTimer()`)
    pub sender: String,
    /// Signal name; the inline-callback form carries none
    pub signal: Option<String>,
    pub target: String,
    /// Byte offset of the match in the scanned text
    pub offset: usize,
}

/// `machine.addState(state);`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateRegistration {
    pub machine: String,
    /// `.` or `->`
    pub accessor: String,
    pub state: String,
}

/// `machine.setInitialState(state);`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitialState {
    pub machine: String,
    pub state: String,
}

/// `machine.start();`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartCall {
    pub machine: String,
}

/// `state->assignProperty(object, "property", value);`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyAssignment {
    pub state: String,
    pub target: String,
    pub property: String,
    pub value: String,
}

/// `connect(sender, &Class::signal, receiver, &Class::slot);`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub sender: String,
    pub sender_class: String,
    pub signal: String,
    pub receiver: String,
    pub receiver_class: String,
    pub slot: String,
}

/// Everything the extractor found in one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub machines: Vec<String>,
    pub states: Vec<StateRegistration>,
    pub transitions: Vec<RawTransition>,
    pub initial_states: Vec<InitialState>,
    pub starts: Vec<StartCall>,
    pub properties: Vec<PropertyAssignment>,
    pub connections: Vec<Connection>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
            && self.states.is_empty()
            && self.transitions.is_empty()
            && self.initial_states.is_empty()
            && self.starts.is_empty()
            && self.properties.is_empty()
            && self.connections.is_empty()
    }
}
