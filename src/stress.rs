// src/stress.rs
//
// The differential loop: generate, run reference, run candidate, read back,
// compare, report, pace. Stops only on a mismatch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::desktop::Desktop;
use crate::error::StressError;
use crate::executor::Host;
use crate::lifecycle::ReportViewer;
use crate::logger::log;
use crate::paths::FilePathSet;
use crate::report;
use crate::state::{LogLevel, LoopOutcome, Logs, Phase, Step, StepFault, TestCaseRun, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Slept after every iteration, including the one that stops the loop.
    pub iteration: Duration,
    /// Slept after the loop, before terminal windows are closed.
    pub teardown: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            iteration: Duration::from_millis(500),
            teardown: Duration::from_millis(3000),
        }
    }
}

impl Pacing {
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            iteration: Duration::ZERO,
            teardown: Duration::ZERO,
        }
    }
}

pub struct StressLoop<'a> {
    paths: &'a FilePathSet,
    seed_input: PathBuf,
    pacing: Pacing,
    iteration: u64,
    phase: Phase,
    viewer: ReportViewer,
}

impl<'a> StressLoop<'a> {
    pub fn new(paths: &'a FilePathSet, seed_input: impl Into<PathBuf>, pacing: Pacing) -> Self {
        Self {
            paths,
            seed_input: seed_input.into(),
            pacing,
            iteration: 0,
            phase: Phase::GeneratingInput,
            viewer: ReportViewer::new(),
        }
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Runs until a mismatch, or until `limit` iterations have completed.
    pub fn run(
        &mut self,
        host: &mut dyn Host,
        desktop: &mut dyn Desktop,
        logs: &mut Logs,
        limit: Option<u64>,
    ) -> LoopOutcome {
        loop {
            if limit.is_some_and(|max| self.iteration >= max) {
                return LoopOutcome::Bounded {
                    iterations: self.iteration,
                };
            }

            if let Step::Stop { iteration } = self.step(host, desktop, logs) {
                return LoopOutcome::Mismatch { iteration };
            }
        }
    }

    /// One full iteration. Step failures are logged and recorded on the run;
    /// only the comparison decides whether to stop.
    pub fn step(
        &mut self,
        host: &mut dyn Host,
        desktop: &mut dyn Desktop,
        logs: &mut Logs,
    ) -> Step {
        let number = self.iteration + 1;
        let paths = self.paths;
        let mut faults = Vec::new();

        self.phase = Phase::GeneratingInput;
        if let Err(e) =
            host.run_process(&paths.generator_bin, &self.seed_input, &paths.random_input)
        {
            self.fault(&mut faults, logs, number, e);
        }

        self.phase = Phase::RunningReference;
        if let Err(e) =
            host.run_process(&paths.reference_bin, &paths.random_input, &paths.reference_output)
        {
            self.fault(&mut faults, logs, number, e);
        }

        self.phase = Phase::RunningCandidate;
        if let Err(e) =
            host.run_process(&paths.candidate_bin, &paths.random_input, &paths.candidate_output)
        {
            self.fault(&mut faults, logs, number, e);
        }

        self.phase = Phase::ReadingBack;
        let input = self.read_back(host, &paths.random_input, &mut faults, logs, number);
        let output = self.read_back(host, &paths.candidate_output, &mut faults, logs, number);
        let good_output = self.read_back(host, &paths.reference_output, &mut faults, logs, number);

        self.phase = Phase::Comparing;
        let verdict = Verdict::from_outputs(&output, &good_output);
        if verdict == Verdict::Mismatch {
            log(logs, LogLevel::Error, "Found bad output");
            for line in report::mismatch_summary(&output, &good_output) {
                log(logs, LogLevel::Error, format!("  {}", line));
            }
        }

        self.phase = Phase::Reporting;
        let mut run = TestCaseRun {
            number,
            input,
            output,
            good_output,
            verdict,
            faults,
        };
        if let Err(e) = report::write(host, &paths.comparison, &run) {
            self.fault(&mut run.faults, logs, number, e);
        }
        self.viewer.ensure_open(desktop, &paths.comparison, logs);

        let level = if run.is_match() {
            LogLevel::Success
        } else {
            LogLevel::Error
        };
        if run.faults.is_empty() {
            log(logs, level, format!("Test Case #{}: {}", number, verdict.label()));
        } else {
            let failed: Vec<String> = run.faults.iter().map(|f| f.phase.to_string()).collect();
            log(
                logs,
                level,
                format!(
                    "Test Case #{}: {} (failed: {})",
                    number,
                    verdict.label(),
                    failed.join(", ")
                ),
            );
        }

        self.phase = Phase::Pacing;
        host.delay(self.pacing.iteration);
        self.iteration = number;

        match verdict {
            Verdict::Matching => Step::Continue,
            Verdict::Mismatch => Step::Stop { iteration: number },
        }
    }

    /// An unreadable file reads as empty.
    fn read_back(
        &self,
        host: &mut dyn Host,
        path: &Path,
        faults: &mut Vec<StepFault>,
        logs: &mut Logs,
        number: u64,
    ) -> Vec<u8> {
        match host.read_bytes(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.fault(faults, logs, number, e);
                Vec::new()
            }
        }
    }

    fn fault(&self, faults: &mut Vec<StepFault>, logs: &mut Logs, number: u64, error: StressError) {
        log(
            logs,
            LogLevel::Warn,
            format!("Test Case #{} {} failed: {}", number, self.phase, error),
        );
        faults.push(StepFault {
            phase: self.phase,
            error,
        });
    }
}
