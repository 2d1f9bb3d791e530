//! Qt State Machine Visualizer
//!
//! Extracts the skeleton of Qt `QStateMachine` code from C++ sources and turns
//! it into Graphviz diagrams.
//!
//! This library provides functionality for:
//! - Recognizing machine, state and transition idioms in unstructured source text
//! - Associating extracted states and transitions with the machine that owns them
//! - Building render-ready diagrams with optional per-group edge colors
//! - Rendering diagrams through Graphviz

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod render;
pub mod state_machine;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "qt-state-viz");
    }
}
