//! Generator configuration
//!
//! Settings can be given programmatically or picked up from the environment:
//! - `MMDGEN_RENDERER`: renderer executable (default `mmdc`)
//! - `MMDGEN_TIMEOUT_SECS`: render deadline in seconds (default: none)
//! - `MMDGEN_TEMP_DIR`: directory for staged and synthesized files
//!   (default: the system temporary directory)

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

/// Default renderer executable
pub const DEFAULT_RENDERER: &str = "mmdc";

/// Default interval between checks on a running renderer
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for [`crate::Generator`] and the renderers it drives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    program: String,
    timeout: Option<Duration>,
    temp_dir: Option<PathBuf>,
    poll_interval: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RENDERER.to_string(),
            timeout: None,
            temp_dir: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl GeneratorConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from `MMDGEN_*` environment variables
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(program) = std::env::var("MMDGEN_RENDERER") {
            if !program.trim().is_empty() {
                config.program = program;
            }
        }

        if let Ok(secs) = std::env::var("MMDGEN_TIMEOUT_SECS") {
            match parse_timeout_secs(&secs) {
                Some(timeout) => config.timeout = timeout,
                None => warn!(value = %secs, "Ignoring invalid MMDGEN_TIMEOUT_SECS"),
            }
        }

        if let Ok(dir) = std::env::var("MMDGEN_TEMP_DIR") {
            if !dir.trim().is_empty() {
                config.temp_dir = Some(PathBuf::from(dir));
            }
        }

        config
    }

    /// Set the renderer executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set (or clear) the render deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the directory used for temporary files
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Set how often a running renderer is checked for exit or cancellation
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Parse a timeout given in (possibly fractional) seconds
///
/// `0` means "no deadline" and yields `Some(None)`; garbage yields `None`.
pub fn parse_timeout_secs(value: &str) -> Option<Option<Duration>> {
    let secs: f64 = value.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    if secs == 0.0 {
        return Some(None);
    }
    Some(Some(Duration::from_secs_f64(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.program(), "mmdc");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.temp_dir(), None);
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .with_program("/opt/bin/mmdc")
            .with_timeout(Some(Duration::from_secs(30)))
            .with_temp_dir("/var/tmp")
            .with_poll_interval(Duration::from_millis(10));
        assert_eq!(config.program(), "/opt/bin/mmdc");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.temp_dir(), Some(Path::new("/var/tmp")));
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs("30"), Some(Some(Duration::from_secs(30))));
        assert_eq!(
            parse_timeout_secs("0.5"),
            Some(Some(Duration::from_millis(500)))
        );
        assert_eq!(parse_timeout_secs("0"), Some(None));
        assert_eq!(parse_timeout_secs("-1"), None);
        assert_eq!(parse_timeout_secs("soon"), None);
        assert_eq!(parse_timeout_secs("inf"), None);
    }
}
