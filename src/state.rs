use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};

use crate::error::StressError;

pub const MAX_LOGS: usize = 1000;

/* ---------- lifecycle ---------- */

/// Stages of a single stress iteration, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    GeneratingInput,
    RunningReference,
    RunningCandidate,
    ReadingBack,
    Comparing,
    Reporting,
    Pacing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::GeneratingInput => "generate",
            Phase::RunningReference => "reference run",
            Phase::RunningCandidate => "candidate run",
            Phase::ReadingBack => "read back",
            Phase::Comparing => "compare",
            Phase::Reporting => "report",
            Phase::Pacing => "pacing",
        };
        f.write_str(name)
    }
}

/* ---------- logging ---------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Clone, Debug)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Bounded diagnostic log. When `echo` is set every line is also written to stderr.
pub struct Logs {
    pub lines: VecDeque<LogLine>,
    pub echo: bool,
}

impl Logs {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            echo: true,
        }
    }

    pub fn quiet() -> Self {
        Self {
            lines: VecDeque::new(),
            echo: false,
        }
    }

    #[cfg(test)]
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines
            .iter()
            .any(|l| l.level == level && l.text.contains(needle))
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self::new()
    }
}

/* ---------- iteration ---------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Matching,
    Mismatch,
}

impl Verdict {
    /// Exact byte comparison. No decoding, no trimming, no line-ending normalization.
    pub fn from_outputs(output: &[u8], good_output: &[u8]) -> Self {
        if output == good_output {
            Verdict::Matching
        } else {
            Verdict::Mismatch
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Matching => "Output Matching",
            Verdict::Mismatch => "Mismatch Found!",
        }
    }
}

/// A failed external step inside one iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepFault {
    pub phase: Phase,
    pub error: StressError,
}

#[derive(Clone, Debug)]
pub struct TestCaseRun {
    /// 1-based.
    pub number: u64,
    pub input: Vec<u8>,
    pub output: Vec<u8>,
    pub good_output: Vec<u8>,
    pub verdict: Verdict,
    pub faults: Vec<StepFault>,
}

impl TestCaseRun {
    pub fn is_match(&self) -> bool {
        self.verdict == Verdict::Matching
    }
}

/// What the driver should do after an iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Stop { iteration: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoopOutcome {
    Mismatch { iteration: u64 },
    /// Only reachable when the driver was given an iteration bound.
    Bounded { iterations: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_is_byte_exact() {
        assert_eq!(Verdict::from_outputs(b"5\n", b"5\n"), Verdict::Matching);
        assert_eq!(Verdict::from_outputs(b"5\n", b"5"), Verdict::Mismatch);
        assert_eq!(Verdict::from_outputs(b"5\r\n", b"5\n"), Verdict::Mismatch);
        assert_eq!(Verdict::from_outputs(b" 5\n", b"5\n"), Verdict::Mismatch);
        assert_eq!(Verdict::from_outputs(b"", b""), Verdict::Matching);
    }

    #[test]
    fn invalid_utf8_bytes_are_not_conflated() {
        assert_eq!(
            Verdict::from_outputs(&[0xFF, b'\n'], &[0xFE, b'\n']),
            Verdict::Mismatch
        );
        assert_eq!(
            Verdict::from_outputs(&[0xFF, b'\n'], "\u{FFFD}\n".as_bytes()),
            Verdict::Mismatch
        );
    }

    #[test]
    fn verdict_labels() {
        assert_eq!(Verdict::Matching.label(), "Output Matching");
        assert_eq!(Verdict::Mismatch.label(), "Mismatch Found!");
    }
}
