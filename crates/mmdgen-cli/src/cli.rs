//! Command-line interface for the mmdgen utility
//!
//! Provides a CLI to render Mermaid.js diagram markup through mermaid-cli.

use anyhow::{anyhow, Result};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::interactive;
use crate::status::{StatusKind, StatusPrinter};
use mmdgen::core::logging::init_logging;
use mmdgen::renderer::{query_version, DiagramRenderer};
use mmdgen::{
    parse_timeout_secs, EditorSession, GenerateError, Generator, GeneratorConfig, OutputFormat,
};

/// mmdgen - Render Mermaid.js diagrams to PNG, SVG and PDF
#[derive(Parser)]
#[command(name = "mmdgen")]
#[command(about = "A Rust utility to render Mermaid.js diagrams with mermaid-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
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

    /// When to use colors in status messages
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Renderer executable [default: $MMDGEN_RENDERER or mmdc]
    #[arg(long, value_name = "PROGRAM")]
    pub renderer: Option<String>,

    /// Render deadline in seconds, 0 for none [default: $MMDGEN_TIMEOUT_SECS or none]
    #[arg(long, value_name = "SECONDS", value_parser = parse_timeout)]
    pub timeout: Option<Timeout>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
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

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
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

/// A parsed `--timeout` value; `None` inside means no deadline
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timeout(pub Option<Duration>);

fn parse_timeout(value: &str) -> std::result::Result<Timeout, String> {
    parse_timeout_secs(value)
        .map(Timeout)
        .ok_or_else(|| format!("'{}' is not a non-negative number of seconds", value))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a Mermaid.js diagram to an image or document
    #[command(group(ArgGroup::new("source").required(true).args(["text", "file"])))]
    Generate {
        /// Diagram source text
        #[arg(short, long)]
        text: Option<String>,

        /// File containing the diagram source (use - for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output path [default: next to --file, or a temporary file]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
        format: FormatChoice,
    },

    /// Check that the renderer is installed and show its version
    Check,

    /// Show supported output formats
    Formats {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Edit and render diagrams line by line in the terminal
    Interactive {
        /// Initial output format
        #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
        format: FormatChoice,
    },
}

/// Supported output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    Png,
    Svg,
    Pdf,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Svg => OutputFormat::Svg,
            FormatChoice::Pdf => OutputFormat::Pdf,
        }
    }
}

/// When to colorize status output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stderr is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Serialize)]
struct FormatInfo {
    name: &'static str,
    extension: &'static str,
    mime_type: &'static str,
    description: &'static str,
}

/// Main CLI application
pub struct MmdgenApp {
    config: GeneratorConfig,
}

impl MmdgenApp {
    /// Create a new application configured from the environment
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::from_env())
    }

    /// Create a new application with a generator config
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Apply `--renderer` and `--timeout`, which win over the environment
    fn apply_overrides(&mut self, renderer: Option<String>, timeout: Option<Timeout>) {
        if let Some(program) = renderer {
            self.config = self.config.clone().with_program(program);
        }
        if let Some(Timeout(timeout)) = timeout {
            self.config = self.config.clone().with_timeout(timeout);
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the logging flags
        let log_level_str = std::env::var("MMDGEN_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("MMDGEN_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        self.apply_overrides(cli.renderer, cli.timeout);
        let status = StatusPrinter::new(cli.color);

        if cli.verbose {
            eprintln!("mmdgen v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("Renderer: {}", self.config.program());
        }

        match cli.command {
            Commands::Generate {
                text,
                file,
                output,
                format,
            } => {
                let generator = self.generator()?;
                let mut stdout = io::stdout().lock();
                generate_command(
                    &generator,
                    text,
                    file,
                    output,
                    format.into(),
                    cli.verbose,
                    &status,
                    &mut stdout,
                )
                .map(|_| ())
            }
            Commands::Check => self.check_command(&status, &mut io::stdout().lock()),
            Commands::Formats { json } => formats_command(json, &mut io::stdout().lock()),
            Commands::Interactive { format } => {
                let generator = self.generator()?;
                let mut session = EditorSession::new();
                session.set_format(format.into());
                interactive::run(
                    &generator,
                    &mut session,
                    io::stdin().lock(),
                    &mut io::stdout().lock(),
                    &status,
                )
            }
        }
    }

    /// Build a generator, probing the renderer
    fn generator(&self) -> Result<Generator> {
        Ok(Generator::with_config(self.config.clone())?)
    }

    /// Handle the check command
    fn check_command(&self, status: &StatusPrinter, out: &mut impl Write) -> Result<()> {
        let program = self.config.program();
        match query_version(program) {
            Ok(Some(version)) => {
                writeln!(out, "{} {}", program, version)?;
                status.emit(StatusKind::Success, "Renderer is available");
                Ok(())
            }
            Ok(None) => {
                writeln!(out, "{} (version unknown)", program)?;
                status.emit(StatusKind::Warning, "Renderer answered without a version");
                Ok(())
            }
            Err(e) => {
                tracing::debug!(program, error = %e, "Renderer could not be launched");
                Err(GenerateError::renderer_not_found(program).into())
            }
        }
    }
}

impl Default for MmdgenApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle the generate command, printing the artifact path to `out`
#[allow(clippy::too_many_arguments)]
pub fn generate_command<R: DiagramRenderer>(
    generator: &Generator<R>,
    text: Option<String>,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
    status: &StatusPrinter,
    out: &mut impl Write,
) -> Result<PathBuf> {
    let result = match (text, file) {
        (Some(text), _) => generator.generate(&text, output.as_deref(), format),
        (None, Some(path)) if is_stdin(&path) => {
            let text = read_stdin()?;
            if verbose {
                eprintln!("Read {} bytes of input", text.len());
            }
            generator.generate(&text, output.as_deref(), format)
        }
        (None, Some(path)) => generator.generate_from_file(&path, output.as_deref(), format),
        (None, None) => return Err(anyhow!("Either --text or --file is required")),
    };

    match result {
        Ok(artifact) => {
            writeln!(out, "{}", artifact.display())?;
            out.flush()?;
            status.emit(
                StatusKind::Success,
                &format!("Diagram generated: {}", artifact.display()),
            );
            Ok(artifact)
        }
        Err(e) => {
            status.emit(StatusKind::Failure, "Failed to generate diagram");
            Err(e.into())
        }
    }
}

/// Handle the formats command
pub fn formats_command(json: bool, out: &mut impl Write) -> Result<()> {
    let formats: Vec<FormatInfo> = OutputFormat::all()
        .iter()
        .map(|format| FormatInfo {
            name: format.as_str(),
            extension: format.extension(),
            mime_type: format.mime_type(),
            description: format.description(),
        })
        .collect();

    if json {
        let listing = serde_json::json!({
            "formats": formats,
            "default": OutputFormat::default().as_str(),
            "total": formats.len(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
    } else {
        writeln!(out, "Supported output formats:")?;
        for info in &formats {
            writeln!(out, "  {:<5} - {}", info.name, info.description)?;
        }
        writeln!(out)?;
        writeln!(out, "Total: {} output formats supported", formats.len())?;
    }

    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

/// Read diagram source from a file, for callers outside the engine
pub fn read_source(path: &Path) -> Result<String> {
    if is_stdin(path) {
        return read_stdin();
    }
    fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e))
}
