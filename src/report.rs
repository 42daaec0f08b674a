// src/report.rs
//
// Renders one iteration into the comparison file. The layout is fixed and
// read by people, so it must not drift.

use std::path::Path;
use std::time::Duration;

use similar::{ChangeTag, TextDiff};

use crate::error::StressError;
use crate::executor::Host;
use crate::state::TestCaseRun;

const MAX_SUMMARY_LINES: usize = 6;
const DIFF_TIMEOUT: Duration = Duration::from_millis(200);

/// Program output is shown lossily decoded; the verdict was taken on raw bytes.
pub fn render(run: &TestCaseRun) -> String {
    let title = format!("Test Case #{}", run.number);
    let input = String::from_utf8_lossy(&run.input);
    let output = String::from_utf8_lossy(&run.output);
    let good_output = String::from_utf8_lossy(&run.good_output);

    let lines: [&str; 22] = [
        &title,
        "",
        "",
        "",
        "Input:",
        "========",
        &input,
        "",
        "",
        "Output:",
        "========",
        &output,
        "",
        "",
        "Good Output:",
        "=============",
        &good_output,
        "",
        "",
        run.verdict.label(),
        "",
        "",
    ];

    lines.join("\n")
}

/// Overwrites the report at `path`.
pub fn write(host: &mut dyn Host, path: &Path, run: &TestCaseRun) -> Result<(), StressError> {
    host.write_text(path, &render(run))
}

/// Short line-level description of where the candidate output diverges.
/// Only used for diagnostics; the report file never contains it. Large
/// outputs fall back to a coarser diff once `DIFF_TIMEOUT` elapses.
pub fn mismatch_summary(output: &[u8], good_output: &[u8]) -> Vec<String> {
    let output = String::from_utf8_lossy(output);
    let good_output = String::from_utf8_lossy(good_output);
    let diff = TextDiff::configure()
        .timeout(DIFF_TIMEOUT)
        .diff_lines(good_output.as_ref(), output.as_ref());
    let mut lines = Vec::new();
    let mut hidden = 0usize;

    for change in diff.iter_all_changes() {
        let text = change.value().trim_end_matches('\n');
        let line = match change.tag() {
            ChangeTag::Equal => continue,
            ChangeTag::Delete => format!(
                "expected line {}: {:?}",
                change.old_index().map(|i| i + 1).unwrap_or(0),
                text
            ),
            ChangeTag::Insert => format!(
                "got line {}: {:?}",
                change.new_index().map(|i| i + 1).unwrap_or(0),
                text
            ),
        };

        if lines.len() < MAX_SUMMARY_LINES {
            lines.push(line);
        } else {
            hidden += 1;
        }
    }

    if hidden > 0 {
        lines.push(format!("... {} more differing lines", hidden));
    }

    lines
}
