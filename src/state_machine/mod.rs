//! State machine module - Associate extracted facts and build diagrams

use crate::Result;
use crate::parser::Extraction;

pub mod assembler;
pub mod diagram;
pub mod machine;

// Re-export key types
pub use assembler::{GraphAssembler, MachineSet, OwnershipPolicy};
pub use diagram::{Diagram, DiagramPolicy, DiagramTransition};
pub use machine::{MachineModel, MachineTransition};

/// Build machine models from extracted facts
pub fn build_machines(extraction: &Extraction, ownership: OwnershipPolicy) -> MachineSet {
    GraphAssembler::new(ownership).assemble(extraction)
}

/// Build one diagram per machine, keyed by machine id in declaration order
pub fn build_diagrams(
    machines: &MachineSet,
    policy: DiagramPolicy,
) -> Result<Vec<(String, Diagram)>> {
    machines
        .iter()
        .map(|machine| Ok((machine.id.clone(), Diagram::from_machine(machine, policy)?)))
        .collect()
}
