//! Server configuration
//!
//! Flags fall back to environment variables: `PORT` for the port and the
//! `MMDGEN_*` variables read by [`GeneratorConfig::from_env`] for the
//! renderer.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use mmdgen::{parse_timeout_secs, GeneratorConfig};

use crate::store::DEFAULT_CAPACITY;

/// mmdgen-web - Render Mermaid.js diagrams from the browser
#[derive(Parser, Debug)]
#[command(name = "mmdgen-web")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Number of rendered diagrams kept before the oldest are deleted
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub artifact_capacity: usize,

    /// Renderer executable [default: $MMDGEN_RENDERER or mmdc]
    #[arg(long, value_name = "PROGRAM")]
    pub renderer: Option<String>,

    /// Render deadline in seconds, 0 for none [default: $MMDGEN_TIMEOUT_SECS or none]
    #[arg(long, value_name = "SECONDS", value_parser = parse_timeout)]
    pub timeout: Option<Timeout>,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, default_value = "compact")]
    pub log_format: String,
}

/// Log level options
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

/// A parsed `--timeout` value; `None` inside means no deadline
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timeout(pub Option<Duration>);

fn parse_timeout(value: &str) -> Result<Timeout, String> {
    parse_timeout_secs(value)
        .map(Timeout)
        .ok_or_else(|| format!("'{}' is not a non-negative number of seconds", value))
}

impl ServerArgs {
    /// Socket address string for the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Generator settings from `base`, with the renderer flags applied on top
    pub fn generator_config(&self, base: GeneratorConfig) -> GeneratorConfig {
        let mut config = base;
        if let Some(program) = &self.renderer {
            config = config.with_program(program.clone());
        }
        if let Some(Timeout(timeout)) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}
