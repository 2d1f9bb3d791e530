//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::config::DiagramConfig;
use crate::parser::{Extraction, Extractor};
use crate::state_machine::{Diagram, DiagramPolicy, MachineSet, OwnershipPolicy};
use crate::{Config, Result, cli::Cli};
use std::path::{Path, PathBuf};

/// Facts and machine models extracted from one source text
#[derive(Debug, Clone)]
pub struct SourceAnalysis {
    pub extraction: Extraction,
    pub machines: MachineSet,
}

/// Extract facts from `code` and assemble them into machine models
pub fn analyze_source(code: &str, ownership: OwnershipPolicy) -> Result<SourceAnalysis> {
    let extractor = Extractor::new()?;
    let extraction = extractor.extract(code);
    let machines = crate::state_machine::build_machines(&extraction, ownership);
    Ok(SourceAnalysis {
        extraction,
        machines,
    })
}

/// Read a source file and analyze it
fn analyze_file(path: &Path, ownership: OwnershipPolicy) -> Result<SourceAnalysis> {
    tracing::info!("Parsing {:?}", path);
    let code = std::fs::read_to_string(path)?;
    analyze_source(&code, ownership)
}

/// Diagram for one machine with node shape and group colors from config
pub fn build_diagram(
    analysis: &SourceAnalysis,
    machine_id: &str,
    policy: DiagramPolicy,
    config: &DiagramConfig,
) -> Result<Option<Diagram>> {
    let Some(machine) = analysis.machines.get(machine_id) else {
        return Ok(None);
    };

    let mut diagram = Diagram::from_machine(machine, policy)?.with_node_shape(&config.node_shape);
    for (group, color) in &config.group_colors {
        diagram.set_group_color(group, color);
    }
    Ok(Some(diagram))
}

/// `<dir>/<prefix>_<source file name>_<machine>.dot`
pub fn artifact_path(
    output_dir: Option<&Path>,
    prefix: &str,
    source: &Path,
    machine: &str,
) -> PathBuf {
    let filename = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}_{}_{}.dot", prefix, filename, machine);
    match output_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Render command implementation
pub mod render {
    use super::*;
    use crate::cli::Commands;
    use crate::render::{Renderer, create_renderer};

    /// Options for one render run
    #[derive(Debug, Clone)]
    pub struct RenderOptions {
        pub output_dir: Option<PathBuf>,
        pub prefix: String,
        pub policy: DiagramPolicy,
        pub verbose: bool,
        pub interactive: bool,
    }

    /// Render every machine of an analyzed source; returns the artifacts per machine
    pub fn render_machines(
        source: &Path,
        analysis: &SourceAnalysis,
        options: &RenderOptions,
        diagram_config: &DiagramConfig,
        renderer: &dyn Renderer,
    ) -> Result<Vec<(String, Vec<PathBuf>)>> {
        if let Some(dir) = &options.output_dir
            && !dir.exists()
        {
            tracing::debug!("Creating output directory {:?}", dir);
            std::fs::create_dir_all(dir)?;
        }

        let mut rendered = Vec::new();
        for id in analysis.machines.ids() {
            let Some(diagram) = build_diagram(analysis, id, options.policy, diagram_config)?
            else {
                continue;
            };

            let target = artifact_path(options.output_dir.as_deref(), &options.prefix, source, id);
            let artifacts =
                diagram.render(renderer, &target, options.verbose, options.interactive)?;
            rendered.push((id.to_string(), artifacts));
        }

        Ok(rendered)
    }

    /// Execute the render command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (file, output_dir, visualize, strict, ownership, renderer, verbose) =
            match args.command {
                Commands::Render {
                    file,
                    output_dir,
                    visualize,
                    strict,
                    ownership,
                    renderer,
                    verbose,
                } => (
                    file, output_dir, visualize, strict, ownership, renderer, verbose,
                ),
                _ => unreachable!("render::execute called with wrong command"),
            };

        let ownership = ownership.map(Into::into).unwrap_or(config.extraction.ownership);
        let analysis = analyze_file(&file, ownership)?;

        if analysis.machines.is_empty() {
            tracing::warn!("No state machines found in {:?}", file);
            return Ok(());
        }

        tracing::info!("Found {} state machine(s)", analysis.machines.len());

        let options = RenderOptions {
            output_dir: output_dir.or_else(|| config.render.output_dir.clone()),
            prefix: config.render.output_prefix.clone(),
            policy: if strict {
                DiagramPolicy::Strict
            } else {
                config.diagram.policy
            },
            verbose,
            interactive: visualize,
        };

        let renderer = create_renderer(
            renderer.map(Into::into).unwrap_or(config.render.renderer),
            &config.render,
        );
        let rendered = render_machines(
            &file,
            &analysis,
            &options,
            &config.diagram,
            renderer.as_ref(),
        )?;

        for (machine, artifacts) in &rendered {
            for artifact in artifacts {
                println!("{}: {}", machine, artifact.display());
            }
        }

        Ok(())
    }
}

/// Inspect command implementation
pub mod inspect {
    use super::*;
    use crate::cli::{Commands, OutputFormat};

    /// Execute the inspect command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (file, output_format, ownership) = match args.command {
            Commands::Inspect {
                file,
                output,
                ownership,
            } => (file, output, ownership),
            _ => unreachable!("inspect::execute called with wrong command"),
        };

        let ownership = ownership.map(Into::into).unwrap_or(config.extraction.ownership);
        let analysis = analyze_file(&file, ownership)?;

        let mut stdout = std::io::stdout();
        match output_format {
            OutputFormat::Json => crate::cli::output::output_json(&mut stdout, &analysis)?,
            OutputFormat::Table => crate::cli::output::output_table(&mut stdout, &analysis)?,
            OutputFormat::Dot => {
                for id in analysis.machines.ids() {
                    if let Some(diagram) =
                        build_diagram(&analysis, id, config.diagram.policy, &config.diagram)?
                    {
                        println!("// machine: {}", id);
                        print!("{}", diagram.to_dot());
                    }
                }
            }
        }

        Ok(())
    }
}
