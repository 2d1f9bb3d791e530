//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::render::RendererKind;
use crate::state_machine::OwnershipPolicy;
use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Qt State Machine Visualizer CLI
#[derive(Parser, Debug)]
#[command(name = "qt-state-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config; RUST_LOG takes precedence over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one diagram per state machine found in a C++ source file
    Render {
        /// The C++ file to parse for Qt state machines
        #[arg(short, long)]
        file: PathBuf,

        /// Output directory, created if missing (default: current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Show each diagram in a viewer window
        #[arg(long)]
        visualize: bool,

        /// Fail on transitions whose states are not in the diagram
        #[arg(long)]
        strict: bool,

        /// Which machines accept a transition when state names collide
        #[arg(long, value_enum)]
        ownership: Option<OwnershipArg>,

        /// Rendering backend
        #[arg(short, long, value_enum)]
        renderer: Option<RendererArg>,

        /// Log every artifact written
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print what was extracted from a C++ source file
    Inspect {
        /// The C++ file to parse for Qt state machines
        #[arg(short, long)]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Which machines accept a transition when state names collide
        #[arg(long, value_enum)]
        ownership: Option<OwnershipArg>,
    },
}

/// `--ownership` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OwnershipArg {
    /// Every machine declaring both endpoints gets the transition
    AllMatches,
    /// Only the first such machine, in declaration order
    FirstMatch,
}

impl From<OwnershipArg> for OwnershipPolicy {
    fn from(arg: OwnershipArg) -> Self {
        match arg {
            OwnershipArg::AllMatches => OwnershipPolicy::AllMatches,
            OwnershipArg::FirstMatch => OwnershipPolicy::FirstMatch,
        }
    }
}

/// `--renderer` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererArg {
    /// DOT source plus an image rendered by Graphviz
    Graphviz,
    /// DOT source only
    Dot,
}

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Graphviz => RendererKind::Graphviz,
            RendererArg::Dot => RendererKind::Dot,
        }
    }
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text report
    Table,
    /// JSON output
    Json,
    /// DOT format (Graphviz), one digraph per machine
    Dot,
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Render { .. } => commands::render::execute(args, config),
        Commands::Inspect { .. } => commands::inspect::execute(args, config),
    }
}
