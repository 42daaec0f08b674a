use std::path::Path;

use crate::desktop::Desktop;
use crate::executor::Host;
use crate::logger::log;
use crate::state::{LogLevel, Logs};
use crate::stress::Pacing;

/// Opens the report in the viewer at most once per run.
#[derive(Debug, Default)]
pub struct ReportViewer {
    opened: bool,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A failed open still counts as the one attempt.
    pub fn ensure_open(&mut self, desktop: &mut dyn Desktop, report: &Path, logs: &mut Logs) {
        if self.opened {
            return;
        }
        self.opened = true;

        match desktop.open_in_viewer(report) {
            Ok(()) => log(logs, LogLevel::Info, format!("Opened {}", report.display())),
            Err(e) => log(logs, LogLevel::Warn, e.to_string()),
        }
    }
}

pub fn teardown(
    host: &mut dyn Host,
    desktop: &mut dyn Desktop,
    pacing: Pacing,
    marker: &str,
    logs: &mut Logs,
) {
    host.delay(pacing.teardown);

    if let Err(e) = desktop.close_windows_by_title(marker) {
        log(logs, LogLevel::Warn, e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{RecordingDesktop, StubHost};
    use std::time::Duration;

    #[test]
    fn viewer_opens_once() {
        let mut desktop = RecordingDesktop::default();
        let mut viewer = ReportViewer::new();
        let mut logs = Logs::quiet();

        for _ in 0..5 {
            viewer.ensure_open(&mut desktop, Path::new("d/s__Comparison.txt"), &mut logs);
        }

        assert_eq!(desktop.calls, vec!["open:d/s__Comparison.txt"]);
    }

    #[test]
    fn failed_open_is_not_retried() {
        let mut desktop = RecordingDesktop {
            fail: true,
            ..RecordingDesktop::default()
        };
        let mut viewer = ReportViewer::new();
        let mut logs = Logs::quiet();

        viewer.ensure_open(&mut desktop, Path::new("r.txt"), &mut logs);
        viewer.ensure_open(&mut desktop, Path::new("r.txt"), &mut logs);

        assert_eq!(desktop.calls.len(), 1);
        assert!(logs.contains(LogLevel::Warn, "failed to open viewer"));
    }

    #[test]
    fn teardown_waits_then_closes() {
        let mut host = StubHost::default();
        let mut desktop = RecordingDesktop {
            fail: true,
            ..RecordingDesktop::default()
        };
        let mut logs = Logs::quiet();

        teardown(
            &mut host,
            &mut desktop,
            Pacing::default(),
            "Stress Testing C++",
            &mut logs,
        );

        assert_eq!(host.delays, vec![Duration::from_millis(3000)]);
        assert_eq!(desktop.calls, vec!["close:Stress Testing C++"]);
        assert!(logs.contains(LogLevel::Warn, "failed to close"));
    }
}
