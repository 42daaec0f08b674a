// Recording stand-ins for the host and desktop, shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::desktop::Desktop;
use crate::error::StressError;
use crate::executor::Host;
use crate::paths::FilePathSet;

pub type Program = Box<dyn FnMut(&str) -> Result<String, String>>;

pub fn stub_paths() -> FilePathSet {
    FilePathSet::resolve(Path::new("work/sol.cpp")).unwrap()
}

fn name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Default)]
pub struct StubHost {
    pub calls: Vec<String>,
    pub existing: HashSet<PathBuf>,
    pub files: HashMap<PathBuf, String>,
    /// Read back instead of `files`, for contents that are not valid UTF-8.
    pub raw: HashMap<PathBuf, Vec<u8>>,
    pub programs: HashMap<PathBuf, Program>,
    pub runs: HashMap<PathBuf, usize>,
    pub fail_compile: HashSet<PathBuf>,
    pub unreadable: HashSet<PathBuf>,
    pub fail_write: bool,
    pub delays: Vec<Duration>,
}

impl StubHost {
    pub fn with_sources(paths: &FilePathSet) -> Self {
        let mut host = Self::default();
        for source in paths.sources() {
            host.existing.insert(source.to_path_buf());
        }
        host
    }

    pub fn program(
        mut self,
        path: &Path,
        f: impl FnMut(&str) -> Result<String, String> + 'static,
    ) -> Self {
        self.programs.insert(path.to_path_buf(), Box::new(f));
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>, text: &str) -> Self {
        self.files.insert(path.into(), text.to_string());
        self
    }

    pub fn runs_of(&self, program: &Path) -> usize {
        self.runs.get(program).copied().unwrap_or(0)
    }
}

impl Host for StubHost {
    fn exists(&self, path: &Path) -> bool {
        self.existing.contains(path)
    }

    fn compile(&mut self, source: &Path, _output: &Path) -> Result<(), StressError> {
        self.calls.push(format!("compile:{}", name(source)));
        if self.fail_compile.contains(source) {
            return Err(StressError::Compilation {
                file: source.to_path_buf(),
                reason: "exit status 1".into(),
            });
        }
        Ok(())
    }

    fn run_process(
        &mut self,
        program: &Path,
        stdin: &Path,
        stdout: &Path,
    ) -> Result<(), StressError> {
        self.calls.push(format!("run:{}", name(program)));
        *self.runs.entry(program.to_path_buf()).or_default() += 1;

        let fail = |reason: &str| StressError::ProcessExecution {
            program: program.to_path_buf(),
            reason: reason.to_string(),
        };

        let input = self
            .files
            .get(stdin)
            .cloned()
            .ok_or_else(|| fail("cannot open stdin"))?;

        // stdout is truncated before the program starts, like a shell redirect
        self.files.insert(stdout.to_path_buf(), String::new());

        let run = self
            .programs
            .get_mut(program)
            .ok_or_else(|| fail("no such file"))?;

        match run(&input) {
            Ok(out) => {
                self.files.insert(stdout.to_path_buf(), out);
                Ok(())
            }
            Err(reason) => Err(fail(&reason)),
        }
    }

    fn read_bytes(&mut self, path: &Path) -> Result<Vec<u8>, StressError> {
        self.calls.push(format!("read:{}", name(path)));
        if self.unreadable.contains(path) {
            return Err(StressError::FileRead {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
            });
        }
        if let Some(bytes) = self.raw.get(path) {
            return Ok(bytes.clone());
        }
        self.files
            .get(path)
            .map(|text| text.clone().into_bytes())
            .ok_or_else(|| StressError::FileRead {
                path: path.to_path_buf(),
                reason: "not found".into(),
            })
    }

    fn write_text(&mut self, path: &Path, text: &str) -> Result<(), StressError> {
        self.calls.push(format!("write:{}", name(path)));
        if self.fail_write {
            return Err(StressError::FileWrite {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            });
        }
        self.files.insert(path.to_path_buf(), text.to_string());
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        self.calls.push(format!("delay:{}", duration.as_millis()));
        self.delays.push(duration);
    }
}

#[derive(Default)]
pub struct RecordingDesktop {
    pub calls: Vec<String>,
    pub fail: bool,
}

impl Desktop for RecordingDesktop {
    fn open_in_viewer(&mut self, path: &Path) -> Result<(), StressError> {
        self.calls.push(format!("open:{}", path.display()));
        if self.fail {
            return Err(StressError::Viewer("subl: not found".into()));
        }
        Ok(())
    }

    fn close_windows_by_title(&mut self, marker: &str) -> Result<(), StressError> {
        self.calls.push(format!("close:{}", marker));
        if self.fail {
            return Err(StressError::WindowClose("unsupported".into()));
        }
        Ok(())
    }
}
