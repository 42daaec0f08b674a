use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::StressError;
use crate::executor::run::Toolchain;
use crate::logger::log;
use crate::state::{LogLevel, Logs};
use crate::stress::Pacing;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub compiler: String,
    pub standard: String,
    pub defines: Vec<String>,
    /// Fed to the generator on every iteration, relative to the working directory.
    pub seed_input: PathBuf,
    pub viewer: Vec<String>,
    pub window_marker: String,
    pub desktop: bool,
    pub iteration_delay_ms: u64,
    pub teardown_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let toolchain = Toolchain::default();
        let pacing = Pacing::default();
        Self {
            compiler: toolchain.compiler,
            standard: toolchain.standard,
            defines: toolchain.defines,
            seed_input: PathBuf::from("input.txt"),
            viewer: vec!["subl".to_string(), "--add".to_string()],
            window_marker: "Stress Testing C++".to_string(),
            desktop: true,
            iteration_delay_ms: pacing.iteration.as_millis() as u64,
            teardown_delay_ms: pacing.teardown.as_millis() as u64,
        }
    }
}

impl Config {
    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            compiler: self.compiler.clone(),
            standard: self.standard.clone(),
            defines: self.defines.clone(),
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            iteration: Duration::from_millis(self.iteration_delay_ms),
            teardown: Duration::from_millis(self.teardown_delay_ms),
        }
    }
}

pub fn config_path() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("stresstest");
    dir.push("config.toml");
    dir
}

pub fn load(logs: &mut Logs) -> Config {
    load_from(&config_path(), logs)
}

/// A missing file is not an error. Anything else falls back to defaults with a warning.
pub fn load_from(path: &Path, logs: &mut Logs) -> Config {
    match read_config(path) {
        Ok(Some(cfg)) => {
            log(logs, LogLevel::Info, format!("Loaded config {}", path.display()));
            cfg
        }
        Ok(None) => Config::default(),
        Err(e) => {
            log(logs, LogLevel::Warn, format!("{}; using defaults", e));
            Config::default()
        }
    }
}

fn read_config(path: &Path) -> Result<Option<Config>, StressError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StressError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    parse(&raw).map(Some).map_err(|e| StressError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn parse(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}
