//! Shared helpers for integration tests
//!
//! Provides in-process fake renderers and, on Unix, shell scripts that obey
//! the `mmdc -i <in> -o <out> -f <fmt>` contract.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use mmdgen::renderer::DiagramRenderer;
use mmdgen::{CancellationToken, GenerateError, OutputFormat};

/// In-process renderer that writes `<format>:<source>` to the output
#[derive(Debug, Default)]
pub struct EchoRenderer {
    pub calls: AtomicUsize,
    pub staged: Mutex<Vec<PathBuf>>,
}

impl EchoRenderer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.lock().unwrap().clone()
    }
}

impl DiagramRenderer for EchoRenderer {
    fn render(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
        _cancel: &CancellationToken,
    ) -> mmdgen::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.staged.lock().unwrap().push(input.to_path_buf());
        let source = fs::read_to_string(input)?;
        fs::write(output, format!("{}:{}", format, source))?;
        Ok(())
    }

    fn probe(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// In-process renderer that blocks until cancelled
#[derive(Debug, Default)]
pub struct StallingRenderer;

impl DiagramRenderer for StallingRenderer {
    fn render(
        &self,
        _input: &Path,
        output: &Path,
        _format: OutputFormat,
        cancel: &CancellationToken,
    ) -> mmdgen::Result<()> {
        fs::write(output, b"half")?;
        while !cancel.is_cancelled() {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        Err(GenerateError::Cancelled)
    }

    fn probe(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "stalling"
    }
}

/// Files directly inside `dir`
pub fn entries(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    paths.sort();
    paths
}

/// Staged `.mmd` files directly inside `dir`
pub fn staged_files(dir: &Path) -> Vec<PathBuf> {
    entries(dir)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "mmd"))
        .collect()
}

/// Stand-in renderer scripts for the real subprocess path
#[cfg(unix)]
pub mod scripts {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    const PARSE_ARGS: &str = r#"if [ "$1" = "--version" ]; then echo "11.4.2"; exit 0; fi
while [ $# -gt 0 ]; do
  case "$1" in
    -i) in="$2"; shift 2 ;;
    -o) out="$2"; shift 2 ;;
    -f) fmt="$2"; shift 2 ;;
    *) shift ;;
  esac
done
"#;

    fn install(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}{}", PARSE_ARGS, body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Writes `<fmt>:<source>` to the output and exits 0
    pub fn echo(dir: &Path) -> PathBuf {
        install(
            dir,
            "fake-mmdc-echo",
            "printf '%s:' \"$fmt\" > \"$out\"\ncat \"$in\" >> \"$out\"\n",
        )
    }

    /// Writes a partial output, complains on stderr and exits 1
    pub fn failing(dir: &Path) -> PathBuf {
        install(
            dir,
            "fake-mmdc-fail",
            "echo partial > \"$out\"\necho \"Parse error on line 2\" >&2\nexit 1\n",
        )
    }

    /// Exits 0 without writing anything
    pub fn silent(dir: &Path) -> PathBuf {
        install(dir, "fake-mmdc-silent", "exit 0\n")
    }

    /// Never finishes on its own
    pub fn hanging(dir: &Path) -> PathBuf {
        install(dir, "fake-mmdc-hang", "exec sleep 30\n")
    }
}
