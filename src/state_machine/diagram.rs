use crate::render::{RenderEdge, RenderGraph, RenderNode, Renderer};
use crate::state_machine::{MachineModel, MachineTransition};
use crate::{Error, Result};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// What `add_transition` does when an endpoint is not a state of the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramPolicy {
    /// Log a warning and discard the transition
    #[default]
    Lenient,
    /// Fail with [`Error::UnresolvedTransition`]
    Strict,
}

/// Edge weight of a [`Diagram`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramTransition {
    pub from_state: String,
    pub to_state: String,
    pub label: Option<String>,
    pub group: Option<String>,
}

/// Render-facing state graph, independent of where the states came from.
///
/// States have set semantics and keep insertion order. A transition can only
/// be added once both of its endpoints are states.
#[derive(Debug, Clone)]
pub struct Diagram {
    /// Nodes are state ids, edges carry label and group.
    graph: StableGraph<String, DiagramTransition>,

    /// State id to node lookup; guarantees one node per state.
    state_index: HashMap<String, NodeIndex>,

    group_colors: HashMap<String, String>,
    policy: DiagramPolicy,
    node_shape: String,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            state_index: HashMap::new(),
            group_colors: HashMap::new(),
            policy: DiagramPolicy::default(),
            node_shape: "circle".to_string(),
        }
    }

    pub fn with_policy(mut self, policy: DiagramPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_node_shape(mut self, shape: impl Into<String>) -> Self {
        self.node_shape = shape.into();
        self
    }

    pub fn policy(&self) -> DiagramPolicy {
        self.policy
    }

    /// States first, then transitions. Each transition is labeled and grouped
    /// by its signal so colors can be assigned per signal.
    pub fn from_machine(machine: &MachineModel, policy: DiagramPolicy) -> Result<Self> {
        let mut diagram = Self::new().with_policy(policy);
        diagram.add_states(&machine.states);
        diagram.add_transitions(&machine.transitions)?;
        Ok(diagram)
    }

    /// Adds a state; a no-op when it already exists.
    pub fn add_state(&mut self, state: impl Into<String>) -> NodeIndex {
        let state = state.into();
        if let Some(&idx) = self.state_index.get(&state) {
            return idx;
        }
        let idx = self.graph.add_node(state.clone());
        self.state_index.insert(state, idx);
        idx
    }

    pub fn add_states<I, S>(&mut self, states: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for state in states {
            self.add_state(state);
        }
    }

    /// Adds a transition between two existing states.
    ///
    /// Returns `Ok(false)` when an endpoint is missing under the lenient
    /// policy; the diagram is left unchanged in that case.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        label: Option<String>,
        group: Option<String>,
    ) -> Result<bool> {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.state_index.get(from), self.state_index.get(to))
        else {
            let err = Error::UnresolvedTransition {
                from: from.to_string(),
                to: to.to_string(),
            };
            return match self.policy {
                DiagramPolicy::Lenient => {
                    tracing::warn!("{}", err);
                    Ok(false)
                }
                DiagramPolicy::Strict => Err(err),
            };
        };

        self.graph.add_edge(
            from_idx,
            to_idx,
            DiagramTransition {
                from_state: from.to_string(),
                to_state: to.to_string(),
                label,
                group,
            },
        );
        Ok(true)
    }

    /// Adds machine transitions in order; returns how many were accepted.
    pub fn add_transitions<'a, I>(&mut self, transitions: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a MachineTransition>,
    {
        let mut added = 0;
        for t in transitions {
            if self.add_transition(&t.from, &t.to, t.signal.clone(), t.signal.clone())? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn set_group_color(&mut self, group: impl Into<String>, color: impl Into<String>) {
        self.group_colors.insert(group.into(), color.into());
    }

    pub fn group_color(&self, group: &str) -> Option<&str> {
        self.group_colors.get(group).map(String::as_str)
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.state_index.contains_key(state)
    }

    /// States in insertion order
    pub fn states(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .map(String::as_str)
            .collect()
    }

    /// Transitions in insertion order
    pub fn transitions(&self) -> Vec<&DiagramTransition> {
        self.graph
            .edge_indices()
            .filter_map(|idx| self.graph.edge_weight(idx))
            .collect()
    }

    /// Nodes and edges in the shape the renderer expects
    pub fn to_render_graph(&self) -> RenderGraph {
        let nodes = self
            .states()
            .into_iter()
            .map(|state| RenderNode {
                name: state.to_string(),
                shape: self.node_shape.clone(),
            })
            .collect();

        let edges = self
            .transitions()
            .into_iter()
            .map(|t| RenderEdge {
                from: t.from_state.clone(),
                to: t.to_state.clone(),
                label: t.label.clone(),
                color: t
                    .group
                    .as_deref()
                    .and_then(|g| self.group_color(g))
                    .map(str::to_string),
            })
            .collect();

        RenderGraph { nodes, edges }
    }

    /// Export to DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        self.to_render_graph().to_dot()
    }

    /// Hand the diagram to `renderer`, writing to `target`. Returns the
    /// artifacts the renderer produced.
    pub fn render(
        &self,
        renderer: &dyn Renderer,
        target: &Path,
        verbose: bool,
        interactive: bool,
    ) -> Result<Vec<PathBuf>> {
        let artifacts = renderer.render(&self.to_render_graph(), target)?;

        for artifact in &artifacts {
            if verbose {
                tracing::info!("Diagram written to {}", artifact.display());
            } else {
                tracing::debug!("Diagram written to {}", artifact.display());
            }
        }

        if interactive {
            let shown = artifacts.last().map(PathBuf::as_path).unwrap_or(target);
            renderer.view(shown)?;
        }

        Ok(artifacts)
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States:")?;
        for state in self.states() {
            writeln!(f, "  {}", state)?;
        }
        writeln!(f, "Transitions:")?;
        for t in self.transitions() {
            write!(f, "  {} -> {}", t.from_state, t.to_state)?;
            if let Some(label) = &t.label {
                write!(f, " [label={}]", label)?;
            }
            if let Some(group) = &t.group {
                write!(f, " [group={}]", group)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
