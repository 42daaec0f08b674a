use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::StressError;

/// Process-wide UI side effects: editor windows and terminal windows.
pub trait Desktop {
    fn open_in_viewer(&mut self, path: &Path) -> Result<(), StressError>;
    fn close_windows_by_title(&mut self, marker: &str) -> Result<(), StressError>;
}

/// Used when desktop integration is switched off in the config.
pub struct NoopDesktop;

impl Desktop for NoopDesktop {
    fn open_in_viewer(&mut self, _path: &Path) -> Result<(), StressError> {
        Ok(())
    }

    fn close_windows_by_title(&mut self, _marker: &str) -> Result<(), StressError> {
        Ok(())
    }
}

pub struct SystemDesktop {
    viewer: Vec<String>,
}

impl SystemDesktop {
    /// `viewer` is a program followed by its leading arguments, e.g. `["subl", "--add"]`.
    pub fn new(viewer: Vec<String>) -> Self {
        Self { viewer }
    }
}

impl Desktop for SystemDesktop {
    fn open_in_viewer(&mut self, path: &Path) -> Result<(), StressError> {
        let (program, args) = self
            .viewer
            .split_first()
            .ok_or_else(|| StressError::Viewer("no viewer command configured".into()))?;

        let status = Command::new(program)
            .args(args)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| StressError::Viewer(format!("{}: {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(StressError::Viewer(format!("{} exited with {}", program, status)))
        }
    }

    fn close_windows_by_title(&mut self, marker: &str) -> Result<(), StressError> {
        if !cfg!(target_os = "macos") {
            return Err(StressError::WindowClose(
                "closing terminal windows is only supported on macOS".into(),
            ));
        }

        let out = Command::new("osascript")
            .arg("-e")
            .arg(close_windows_script(marker))
            .output()
            .map_err(|e| StressError::WindowClose(e.to_string()))?;

        if out.status.success() {
            Ok(())
        } else {
            Err(StressError::WindowClose(
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            ))
        }
    }
}

fn close_windows_script(marker: &str) -> String {
    let marker = marker.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"tell application "Terminal"
    set windowsToClose to {{}}
    repeat with currentWindow in windows
        if name of currentWindow contains "{marker}" then
            set end of windowsToClose to currentWindow
        end if
    end repeat

    repeat with windowToClose in windowsToClose
        activate
        close windowToClose
    end repeat
end tell"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_targets_marker() {
        let script = close_windows_script("Stress Testing C++");
        assert!(script.contains(r#"contains "Stress Testing C++""#));
        assert!(script.starts_with(r#"tell application "Terminal""#));
    }

    #[test]
    fn script_escapes_quotes() {
        let script = close_windows_script(r#"a"b"#);
        assert!(script.contains(r#"contains "a\"b""#));
    }

    #[test]
    fn empty_viewer_command_is_an_error() {
        let mut desktop = SystemDesktop::new(Vec::new());
        let err = desktop.open_in_viewer(Path::new("report.txt")).unwrap_err();
        assert!(matches!(err, StressError::Viewer(_)));
    }

    #[test]
    fn noop_desktop_never_fails() {
        let mut desktop = NoopDesktop;
        assert!(desktop.open_in_viewer(Path::new("x")).is_ok());
        assert!(desktop.close_windows_by_title("x").is_ok());
    }
}
