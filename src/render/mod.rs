//! Render module - Hand diagrams to Graphviz
//!
//! The core only produces a [`RenderGraph`]; laying it out and rasterizing it
//! is delegated to a [`Renderer`]:
//! - `GraphvizRenderer`: writes DOT source and runs the Graphviz `dot` binary
//! - `DotRenderer`: writes DOT source only

use crate::config::RenderConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub mod graphviz;

pub use graphviz::{DotRenderer, GraphvizRenderer};

/// Rendering backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererKind {
    /// DOT source plus an image rendered by Graphviz
    #[default]
    Graphviz,
    /// DOT source only
    Dot,
}

/// A named node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    pub name: String,
    pub shape: String,
}

/// A directed edge with optional label and color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub color: Option<String>,
}

/// Render-ready graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    /// Graphviz `digraph` source
    pub fn to_dot(&self) -> String {
        let mut dot = "// State Machine\ndigraph StateMachine {\n".to_string();

        for node in &self.nodes {
            let _ = writeln!(dot, "  {} [shape={}];", quote(&node.name), quote(&node.shape));
        }

        if !self.nodes.is_empty() && !self.edges.is_empty() {
            dot.push('\n');
        }

        for edge in &self.edges {
            let mut attributes = Vec::new();
            if let Some(label) = &edge.label {
                attributes.push(format!("label={}", quote(label)));
            }
            if let Some(color) = &edge.color {
                attributes.push(format!("color={}", quote(color)));
            }

            let _ = write!(dot, "  {} -> {}", quote(&edge.from), quote(&edge.to));
            if !attributes.is_empty() {
                let _ = write!(dot, " [{}]", attributes.join(", "));
            }
            dot.push_str(";\n");
        }

        dot.push_str("}\n");
        dot
    }
}

/// Quote a DOT identifier
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Rendering collaborator
pub trait Renderer {
    /// Produce artifacts for `graph` at `target`; returns the files written,
    /// the one to show last.
    fn render(&self, graph: &RenderGraph, target: &Path) -> Result<Vec<PathBuf>>;

    /// Show an artifact in an interactive viewer
    fn view(&self, artifact: &Path) -> Result<()>;
}

/// Create a renderer based on configuration
pub fn create_renderer(kind: RendererKind, config: &RenderConfig) -> Box<dyn Renderer> {
    match kind {
        RendererKind::Graphviz => Box::new(
            GraphvizRenderer::new(config.graphviz_binary.clone())
                .with_format(config.format.clone()),
        ),
        RendererKind::Dot => Box::new(DotRenderer),
    }
}

/// Write DOT source for `graph` to `target`
pub(crate) fn write_source(graph: &RenderGraph, target: &Path) -> Result<()> {
    std::fs::write(target, graph.to_dot()).map_err(|source| Error::Artifact {
        path: target.to_path_buf(),
        source,
    })
}
