//! Output formatting module
//!
//! This module handles formatting extraction results for the inspect command.

use crate::{Result, cli::commands::SourceAnalysis};
use serde_json::json;

/// Output extracted facts and machine models as JSON
pub fn output_json(w: &mut impl std::io::Write, analysis: &SourceAnalysis) -> Result<()> {
    let extraction = &analysis.extraction;
    let output = json!({
        "summary": {
            "total_machines": analysis.machines.len(),
            "total_states": analysis.machines.all_states().len(),
            "total_transitions": analysis.machines.all_transitions().len(),
            "unowned_transitions": extraction.transitions.len()
                .saturating_sub(analysis.machines.all_transitions().len()),
        },
        "machines": analysis.machines.machines(),
        "facts": extraction,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output extracted facts and machine models as a text report
pub fn output_table(w: &mut impl std::io::Write, analysis: &SourceAnalysis) -> Result<()> {
    let extraction = &analysis.extraction;

    writeln!(w, "Qt State Machines - Extraction Results")?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  State Machines:     {}", analysis.machines.len())?;
    writeln!(w, "  Raw Transitions:    {}", extraction.transitions.len())?;
    writeln!(w)?;

    for machine in analysis.machines.iter() {
        writeln!(w, "State Machine: {}", machine.id)?;
        writeln!(w, "  States:")?;
        for state in &machine.states {
            writeln!(w, "    {}", state)?;
        }
        writeln!(w, "  Transitions:")?;
        for transition in &machine.transitions {
            writeln!(w, "    {}", transition)?;
        }

        let initial: Vec<&str> = extraction
            .initial_states
            .iter()
            .filter(|i| i.machine == machine.id)
            .map(|i| i.state.as_str())
            .collect();
        if !initial.is_empty() {
            writeln!(w, "  Initial States:")?;
            for state in initial {
                writeln!(w, "    {}", state)?;
            }
        }
        if extraction.starts.iter().any(|s| s.machine == machine.id) {
            writeln!(w, "  Started: yes")?;
        }
        writeln!(w)?;
    }

    if !extraction.properties.is_empty() {
        writeln!(w, "Properties:")?;
        for prop in &extraction.properties {
            writeln!(
                w,
                "  {} assigns {}.{} = {}",
                prop.state, prop.target, prop.property, prop.value
            )?;
        }
        writeln!(w)?;
    }

    if !extraction.connections.is_empty() {
        writeln!(w, "Connections:")?;
        for c in &extraction.connections {
            writeln!(
                w,
                "  {}::{} -> {}::{}",
                c.sender, c.signal, c.receiver, c.slot
            )?;
        }
        writeln!(w)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::analyze_source;
    use crate::state_machine::OwnershipPolicy;

    const SIMPLE: &str = include_str!("../../demos/qtSimpleStateMachine.cpp");

    #[test]
    fn test_output_json() {
        let analysis = analyze_source(SIMPLE, OwnershipPolicy::AllMatches).unwrap();

        let mut output = Vec::new();
        output_json(&mut output, &analysis).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["summary"]["total_machines"], 1);
        assert_eq!(value["summary"]["total_transitions"], 4);
        assert_eq!(value["machines"][0]["id"], "machine");
        assert_eq!(value["facts"]["transitions"][0]["idiom"], "signal-target");
    }

    #[test]
    fn test_output_table() {
        let analysis = analyze_source(SIMPLE, OwnershipPolicy::AllMatches).unwrap();

        let mut output = Vec::new();
        output_table(&mut output, &analysis).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("State Machine: machine"));
        assert!(text.contains("    state1 -> state2 on timeout"));
        assert!(text.contains("  Initial States:\n    state1"));
        assert!(text.contains("Started: yes"));
        assert!(text.contains("timer::timeout -> machine::postEvent"));
    }
}
