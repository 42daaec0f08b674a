use std::path::PathBuf;

use crate::error::StressError;
use crate::executor::Host;
use crate::logger::log;
use crate::paths::FilePathSet;
use crate::state::{LogLevel, Logs};

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub failed: Vec<PathBuf>,
}

impl BuildSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Stops at the first missing source.
fn check_sources(
    host: &dyn Host,
    paths: &FilePathSet,
    logs: &mut Logs,
) -> Result<(), StressError> {
    for source in paths.sources() {
        if !host.exists(source) {
            log(
                logs,
                LogLevel::Error,
                format!("File does not exist: {}", source.display()),
            );
            return Err(StressError::MissingInputFile(source.to_path_buf()));
        }
        log(logs, LogLevel::Info, format!("File found: {}", source.display()));
    }
    Ok(())
}

/// Compiler failures are logged and do not stop the run.
fn compile_all(host: &mut dyn Host, paths: &FilePathSet, logs: &mut Logs) -> BuildSummary {
    let mut summary = BuildSummary::default();

    for (source, bin) in paths.builds() {
        log(logs, LogLevel::Info, format!("Compiling {}", source.display()));
        match host.compile(source, bin) {
            Ok(()) => log(logs, LogLevel::Success, format!("Built {}", bin.display())),
            Err(e) => {
                log(logs, LogLevel::Error, e.to_string());
                summary.failed.push(source.to_path_buf());
            }
        }
    }

    summary
}

/// Existence check, then build. A missing source ends the run before any
/// compiler is invoked.
pub fn prepare(
    host: &mut dyn Host,
    paths: &FilePathSet,
    logs: &mut Logs,
) -> Result<BuildSummary, StressError> {
    check_sources(host, paths, logs)?;
    Ok(compile_all(host, paths, logs))
}
