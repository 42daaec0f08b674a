mod compile;
mod config;
mod desktop;
mod error;
mod executor;
mod lifecycle;
mod logger;
mod paths;
mod report;
mod state;
mod stress;

#[cfg(test)]
mod testkit;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::{
    desktop::{Desktop, NoopDesktop, SystemDesktop},
    error::StressError,
    executor::run::SystemHost,
    logger::log,
    paths::FilePathSet,
    state::{LogLevel, LoopOutcome, Logs},
    stress::StressLoop,
};

#[derive(Parser)]
#[command(
    name = "stresstest",
    version,
    about = "Stress-test a C++ solution against a reference using a random input generator."
)]
struct Cli {
    /// Candidate solution, <dir>/<name>.cpp. Expects <name>__Good.cpp and
    /// <name>__Generator.cpp next to it.
    source: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut logs = Logs::new();

    match run(&cli, &mut logs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !matches!(e, StressError::MissingInputFile(_)) {
                log(&mut logs, LogLevel::Error, e.to_string());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, logs: &mut Logs) -> Result<(), StressError> {
    let config = config::load(logs);
    let paths = FilePathSet::resolve(&cli.source)?;
    log(
        logs,
        LogLevel::Info,
        format!("Stress testing {} in {}", paths.stem, paths.dir.display()),
    );

    let mut host = SystemHost::new(config.toolchain());
    let summary = compile::prepare(&mut host, &paths, logs)?;
    if !summary.is_clean() {
        log(
            logs,
            LogLevel::Warn,
            format!(
                "{} of 3 builds failed; continuing with whatever executables exist",
                summary.failed.len()
            ),
        );
    }

    let mut desktop: Box<dyn Desktop> = if config.desktop {
        Box::new(SystemDesktop::new(config.viewer.clone()))
    } else {
        Box::new(NoopDesktop)
    };

    let pacing = config.pacing();
    let mut stress = StressLoop::new(&paths, config.seed_input.clone(), pacing);

    match stress.run(&mut host, desktop.as_mut(), logs, None) {
        LoopOutcome::Mismatch { iteration } => log(
            logs,
            LogLevel::Info,
            format!(
                "Stopped after test case #{}; see {}",
                iteration,
                paths.comparison.display()
            ),
        ),
        LoopOutcome::Bounded { .. } => log(
            logs,
            LogLevel::Info,
            format!("Ran {} test cases", stress.iteration()),
        ),
    }

    lifecycle::teardown(
        &mut host,
        desktop.as_mut(),
        pacing,
        &config.window_marker,
        logs,
    );

    Ok(())
}
