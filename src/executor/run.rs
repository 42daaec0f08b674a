//src/executor/run.rs
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use super::Host;
use crate::error::StressError;

/// Bytes of a failing program's stderr kept for the error message.
const STDERR_LIMIT: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler: String,
    pub standard: String,
    pub defines: Vec<String>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compiler: "g++-12".to_string(),
            standard: "c++20".to_string(),
            defines: vec!["LOCAL".to_string()],
        }
    }
}

impl Toolchain {
    pub fn compile_args(&self, source: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .defines
            .iter()
            .map(|d| OsString::from(format!("-D{}", d)))
            .collect();
        args.push(format!("-std={}", self.standard).into());
        args.push(source.as_os_str().to_os_string());
        args.push("-o".into());
        args.push(output.as_os_str().to_os_string());
        args
    }
}

/// Host backed by the real filesystem and process table.
pub struct SystemHost {
    toolchain: Toolchain,
}

impl SystemHost {
    pub fn new(toolchain: Toolchain) -> Self {
        Self { toolchain }
    }
}

impl Host for SystemHost {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn compile(&mut self, source: &Path, output: &Path) -> Result<(), StressError> {
        let fail = |reason: String| StressError::Compilation {
            file: source.to_path_buf(),
            reason,
        };

        let out = Command::new(&self.toolchain.compiler)
            .args(self.toolchain.compile_args(source, output))
            .output()
            .map_err(|e| fail(e.to_string()))?;

        if out.status.success() {
            Ok(())
        } else {
            Err(fail(failure_text(out.status, &out.stderr)))
        }
    }

    fn run_process(
        &mut self,
        program: &Path,
        stdin: &Path,
        stdout: &Path,
    ) -> Result<(), StressError> {
        let fail = |reason: String| StressError::ProcessExecution {
            program: program.to_path_buf(),
            reason,
        };

        let input = File::open(stdin)
            .map_err(|e| fail(format!("cannot open {}: {}", stdin.display(), e)))?;
        let output = File::create(stdout)
            .map_err(|e| fail(format!("cannot create {}: {}", stdout.display(), e)))?;

        let mut child = Command::new(program)
            .stdin(Stdio::from(input))
            .stdout(Stdio::from(output))
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| fail(e.to_string()))?;

        // stdout goes to a file, so draining stderr alone cannot deadlock
        let stderr = match child.stderr.take() {
            Some(pipe) => read_capped(pipe, STDERR_LIMIT).unwrap_or_default(),
            None => Vec::new(),
        };
        let status = child.wait().map_err(|e| fail(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(fail(failure_text(status, &stderr)))
        }
    }

    fn read_bytes(&mut self, path: &Path) -> Result<Vec<u8>, StressError> {
        fs::read(path).map_err(|e| StressError::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn write_text(&mut self, path: &Path, text: &str) -> Result<(), StressError> {
        let fail = |e: std::io::Error| StressError::FileWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        // handle is closed on every return path when `file` drops
        let mut file = File::create(path).map_err(fail)?;
        file.write_all(text.as_bytes()).map_err(fail)?;
        file.flush().map_err(fail)
    }

    fn delay(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// Keeps the first `limit` bytes and discards the rest, reading to EOF so the
/// writer never blocks on a full pipe.
fn read_capped(mut reader: impl Read, limit: usize) -> io::Result<Vec<u8>> {
    let mut kept = Vec::new();
    reader.by_ref().take(limit as u64).read_to_end(&mut kept)?;
    io::copy(&mut reader, &mut io::sink())?;
    Ok(kept)
}

fn failure_text(status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();

    match status.code() {
        Some(code) if stderr.is_empty() => format!("exit status {}", code),
        Some(code) => format!("exit status {}: {}", code, stderr),
        None if stderr.is_empty() => "terminated by signal".to_string(),
        None => format!("terminated by signal: {}", stderr),
    }
}
