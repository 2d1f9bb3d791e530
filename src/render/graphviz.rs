//! Graphviz-backed renderers

use crate::render::{RenderGraph, Renderer, write_source};
use crate::{Error, Result};
use anyhow::Context;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Writes the DOT source and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl Renderer for DotRenderer {
    fn render(&self, graph: &RenderGraph, target: &Path) -> Result<Vec<PathBuf>> {
        write_source(graph, target)?;
        Ok(vec![target.to_path_buf()])
    }

    fn view(&self, artifact: &Path) -> Result<()> {
        open_in_viewer(artifact)
    }
}

/// Writes the DOT source to the target and rasterizes it next to it,
/// e.g. `machine.dot` and `machine.dot.png`
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    binary: String,
    format: String,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl GraphvizRenderer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            format: "png".to_string(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Path of the rendered image for a DOT source at `target`
    pub fn image_path(&self, target: &Path) -> PathBuf {
        let mut path = OsString::from(target.as_os_str());
        path.push(".");
        path.push(&self.format);
        PathBuf::from(path)
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, graph: &RenderGraph, target: &Path) -> Result<Vec<PathBuf>> {
        write_source(graph, target)?;

        let image = self.image_path(target);
        tracing::debug!("Running {} -T{} on {:?}", self.binary, self.format, target);

        let output = Command::new(&self.binary)
            .arg(format!("-T{}", self.format))
            .arg(target)
            .arg("-o")
            .arg(&image)
            .output()
            .with_context(|| format!("failed to run Graphviz binary `{}`", self.binary))?;

        if !output.status.success() {
            return Err(Error::render(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(vec![target.to_path_buf(), image])
    }

    fn view(&self, artifact: &Path) -> Result<()> {
        open_in_viewer(artifact)
    }
}

/// Open `path` with the platform's default viewer without waiting for it
fn open_in_viewer(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };

    command
        .arg(path)
        .spawn()
        .with_context(|| format!("failed to open viewer for {}", path.display()))?;
    Ok(())
}
