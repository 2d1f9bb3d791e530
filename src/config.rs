//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::render::RendererKind;
use crate::error::{Error, Result};
use crate::state_machine::{DiagramPolicy, OwnershipPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub diagram: DiagramConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Association settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractionConfig {
    /// Which machines accept a transition whose state names they share
    #[serde(default)]
    pub ownership: OwnershipPolicy,
}

/// Diagram construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Lenient drops unresolved transitions, strict fails
    #[serde(default)]
    pub policy: DiagramPolicy,

    /// Graphviz node shape
    #[serde(default = "default_node_shape")]
    pub node_shape: String,

    /// Edge colors keyed by transition group (the signal name)
    #[serde(default)]
    pub group_colors: HashMap<String, String>,
}

/// Rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub renderer: RendererKind,

    /// Graphviz output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Graphviz binary to invoke
    #[serde(default = "default_graphviz_binary")]
    pub graphviz_binary: String,

    /// Artifact file name prefix
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Output directory, current directory when unset
    pub output_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_node_shape() -> String {
    "circle".to_string()
}

fn default_format() -> String {
    "png".to_string()
}

fn default_graphviz_binary() -> String {
    "dot".to_string()
}

fn default_output_prefix() -> String {
    "diagram".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            policy: DiagramPolicy::default(),
            node_shape: default_node_shape(),
            group_colors: HashMap::new(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::default(),
            format: default_format(),
            graphviz_binary: default_graphviz_binary(),
            output_prefix: default_output_prefix(),
            output_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./qt-state-viz.toml
    /// 2. ~/.qt-state-viz/config.toml
    /// 3. /etc/qt-state-viz/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("qt-state-viz.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".qt-state-viz").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/qt-state-viz/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }
}
