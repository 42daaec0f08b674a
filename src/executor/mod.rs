pub mod run;

use std::path::Path;
use std::time::Duration;

use crate::error::StressError;

/// Everything the stress loop needs from the outside world.
///
/// Calls block until the operation completes; nothing overlaps.
pub trait Host {
    fn exists(&self, path: &Path) -> bool;

    fn compile(&mut self, source: &Path, output: &Path) -> Result<(), StressError>;

    /// Run `program` with `stdin` as standard input, redirecting standard
    /// output into `stdout` (created or truncated).
    fn run_process(&mut self, program: &Path, stdin: &Path, stdout: &Path)
        -> Result<(), StressError>;

    /// Raw contents. Outputs are compared as bytes, never as decoded text.
    fn read_bytes(&mut self, path: &Path) -> Result<Vec<u8>, StressError>;

    /// Create or overwrite `path`.
    fn write_text(&mut self, path: &Path, text: &str) -> Result<(), StressError>;

    fn delay(&mut self, duration: Duration);
}
