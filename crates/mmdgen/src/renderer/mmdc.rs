//! mermaid-cli (`mmdc`) subprocess renderer

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, span, trace, warn, Level};

use super::{probe, DiagramRenderer};
use crate::core::{CancellationToken, GenerateError, GeneratorConfig, OutputFormat, Result};

/// Renderer that shells out to `<program> -i <input> -o <output> -f <format>`
#[derive(Debug, Clone)]
pub struct MmdcRenderer {
    program: String,
    timeout: Option<Duration>,
    poll_interval: Duration,
}

enum WaitOutcome {
    Exited(ExitStatus),
    TimedOut(Duration),
    Cancelled,
}

impl MmdcRenderer {
    /// Create a renderer for `program` with no deadline
    pub fn new(program: impl Into<String>) -> Self {
        Self::from_config(&GeneratorConfig::default().with_program(program))
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            program: config.program().to_string(),
            timeout: config.timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn command(&self, input: &Path, output: &Path, format: OutputFormat) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-f")
            .arg(format.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    /// Wait for `child` to exit, the deadline to pass, or `cancel` to fire
    ///
    /// The child is killed and reaped in the latter two cases.
    fn wait(&self, child: &mut Child, cancel: &CancellationToken) -> Result<WaitOutcome> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    trace!(elapsed_ms = started.elapsed().as_millis() as u64, "Renderer exited");
                    return Ok(WaitOutcome::Exited(status));
                }
                Ok(None) => {}
                Err(e) => {
                    terminate(child);
                    return Err(GenerateError::launch_failed(&self.program, &e));
                }
            }

            if cancel.is_cancelled() {
                warn!("Render cancelled, terminating renderer");
                terminate(child);
                return Ok(WaitOutcome::Cancelled);
            }

            let mut pause = self.poll_interval;
            if let Some(limit) = self.timeout {
                let elapsed = started.elapsed();
                if elapsed >= limit {
                    warn!(timeout_ms = limit.as_millis() as u64, "Renderer timed out, terminating");
                    terminate(child);
                    return Ok(WaitOutcome::TimedOut(limit));
                }
                pause = pause.min(limit - elapsed);
            }
            thread::sleep(pause);
        }
    }
}

fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "Renderer already gone");
    }
    let _ = child.wait();
}

/// Drain the child's stderr on a separate thread so a chatty renderer
/// never blocks on a full pipe
fn collect_stderr(child: &mut Child) -> Option<JoinHandle<String>> {
    child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

impl DiagramRenderer for MmdcRenderer {
    fn render(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let render_span = span!(Level::DEBUG, "mmdc", program = %self.program, %format);
        let _enter = render_span.enter();

        if cancel.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        debug!(input = %input.display(), output = %output.display(), "Launching renderer");
        let mut child = self
            .command(input, output, format)
            .spawn()
            .map_err(|e| GenerateError::launch_failed(&self.program, &e))?;

        let stderr_reader = collect_stderr(&mut child);

        match self.wait(&mut child, cancel)? {
            WaitOutcome::Exited(status) => {
                // Only join once the renderer exited by itself; a killed
                // renderer may leave grandchildren holding the pipe open.
                let stderr = stderr_reader
                    .and_then(|handle| handle.join().ok())
                    .unwrap_or_default();
                if status.success() {
                    info!("Renderer finished");
                    Ok(())
                } else {
                    warn!(status = ?status.code(), "Renderer failed");
                    Err(GenerateError::render_failed(&self.program, status, stderr))
                }
            }
            WaitOutcome::TimedOut(after) => Err(GenerateError::Timeout {
                program: self.program.clone(),
                after,
            }),
            WaitOutcome::Cancelled => Err(GenerateError::Cancelled),
        }
    }

    fn probe(&self) -> bool {
        probe(&self.program)
    }

    fn name(&self) -> &str {
        &self.program
    }
}
