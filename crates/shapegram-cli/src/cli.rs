//! Command-line interface for the shapegram utility
//!
//! Reads a schema document, an optional diagram definition and an optional
//! diagram config, and writes PlantUML source or the JSON diagram view.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use shapegram::core::logging::init_logging;
use shapegram::definition::{DefinitionDocument, DefinitionRegistry};
use shapegram::layout::GraphLayout;
use shapegram::model::{Diagram, DiagramComposer};
use shapegram::render::{DiagramConfig, DiagramView, JsonRenderer, PlantUmlRenderer};
use shapegram::schema::{MemorySchema, SchemaDocument};
use shapegram::{LayoutAlgorithm, Renderer};

/// Shapegram - Compose class diagrams from SHACL shapes
#[derive(Parser)]
#[command(name = "shapegram")]
#[command(about = "Compose PlantUML class diagrams from SHACL shapes and a class hierarchy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Output formats of the convert command
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// PlantUML class diagram source
    #[default]
    Plantuml,
    /// JSON diagram view
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose a diagram and write it out
    Convert {
        /// Schema document (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Diagram definition; without one every targeted class is listed
        #[arg(short, long)]
        definition: Option<PathBuf>,

        /// Style and layout config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Plantuml)]
        format: OutputFormat,

        /// Skip the layout, links get no direction hints
        #[arg(long)]
        no_layout: bool,

        /// Seed of the layout simulation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check that a schema and definition compose without errors
    Validate {
        /// Schema document (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Diagram definition
        #[arg(short, long)]
        definition: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Summary printed by the validate command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub name: Option<String>,
    pub class_count: usize,
    pub shape_count: usize,
    pub node_count: usize,
    pub variant_count: usize,
    pub listed_classes: Vec<String>,
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct ShapegramApp;

impl ShapegramApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        if let Err(e) = init_logging(Some(cli.log_level.as_str()), Some(cli.log_format.as_str())) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Shapegram v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                schema,
                definition,
                config,
                output,
                format,
                no_layout,
                seed,
            } => {
                let mut config = match config {
                    Some(path) => DiagramConfig::from_path(&path)
                        .with_context(|| format!("Failed to load config '{}'", path.display()))?,
                    None => DiagramConfig::default(),
                };
                if no_layout {
                    config.layout.apply_layout = false;
                }
                if let Some(seed) = seed {
                    config.layout.seed = seed;
                }
                let rendered = self.convert(&schema, definition.as_deref(), &config, format)?;
                if cli.verbose {
                    eprintln!("Rendered {} bytes of {:?}", rendered.len(), format);
                }
                self.write_output(output, &rendered)
            }
            Commands::Validate {
                schema,
                definition,
                json,
            } => self.validate_command(&schema, definition.as_deref(), json),
        }
    }

    /// Compose and render, returning the output text
    pub fn convert(
        &self,
        schema: &Path,
        definition: Option<&Path>,
        config: &DiagramConfig,
        format: OutputFormat,
    ) -> Result<String> {
        let graph = self.load_schema(schema)?;
        let mut registry = self.load_definition(definition, &graph)?;
        let diagram = DiagramComposer::new().compose(&graph, &mut registry)?;
        let layout = GraphLayout::new(config.layout.clone()).layout(&diagram)?;
        let view = DiagramView::build(&diagram, &layout);

        match format {
            OutputFormat::Plantuml => PlantUmlRenderer::with_style(config.style.clone()).render(&view),
            OutputFormat::Json => JsonRenderer::new().render(&view),
        }
    }

    fn validate_command(&self, schema: &Path, definition: Option<&Path>, json: bool) -> Result<()> {
        let report = self.validate(schema, definition)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "✓ Valid: {} classes, {} shapes, {} diagram nodes ({} shape-specific variants)",
                report.class_count, report.shape_count, report.node_count, report.variant_count
            );
        }
        Ok(())
    }

    /// Compose without rendering and summarize
    pub fn validate(&self, schema: &Path, definition: Option<&Path>) -> Result<ValidationReport> {
        let graph = self.load_schema(schema)?;
        let mut registry = self.load_definition(definition, &graph)?;
        let diagram: Diagram = DiagramComposer::new().compose(&graph, &mut registry)?;
        info!(node_count = diagram.len(), "Validation passed");

        Ok(ValidationReport {
            name: registry.name().map(String::from),
            class_count: graph.class_count(),
            shape_count: graph.shape_count(),
            node_count: diagram.len(),
            variant_count: diagram.variant_count(),
            listed_classes: registry.listed_classes(),
        })
    }

    fn load_schema(&self, path: &Path) -> Result<MemorySchema> {
        let document = SchemaDocument::from_path(path)
            .with_context(|| format!("Failed to read schema '{}'", path.display()))?;
        Ok(document.into_schema()?)
    }

    fn load_definition(&self, path: Option<&Path>, graph: &MemorySchema) -> Result<DefinitionRegistry> {
        let document = match path {
            Some(path) => DefinitionDocument::from_path(path)
                .with_context(|| format!("Failed to read definition '{}'", path.display()))?,
            None => DefinitionDocument::default(),
        };
        Ok(document.into_registry(graph)?)
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}
