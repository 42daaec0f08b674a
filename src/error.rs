use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StressError {
    #[error("expected a path of the form <dir>/<name>.cpp, got {0:?}")]
    MalformedPath(String),

    #[error("file does not exist: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("failed to compile {}: {reason}", .file.display())]
    Compilation { file: PathBuf, reason: String },

    #[error("failed to run {}: {reason}", .program.display())]
    ProcessExecution { program: PathBuf, reason: String },

    #[error("failed to read {}: {reason}", .path.display())]
    FileRead { path: PathBuf, reason: String },

    #[error("failed to write {}: {reason}", .path.display())]
    FileWrite { path: PathBuf, reason: String },

    #[error("failed to open viewer: {0}")]
    Viewer(String),

    #[error("failed to close terminal windows: {0}")]
    WindowClose(String),

    #[error("invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}
