// src/paths.rs
//
// Every file the tool touches is derived from the candidate source path.

use std::path::{Path, PathBuf};

use crate::error::StressError;

const GOOD: &str = "__Good";
const GENERATOR: &str = "__Generator";
const RANDOM_INPUT: &str = "__Random__Input.txt";
const OUTPUT: &str = "__Output.txt";
const GOOD_OUTPUT: &str = "__Good__Output.txt";
const COMPARISON: &str = "__Comparison.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePathSet {
    pub dir: PathBuf,
    pub stem: String,

    pub candidate_source: PathBuf,
    pub reference_source: PathBuf,
    pub generator_source: PathBuf,

    pub random_input: PathBuf,
    pub candidate_output: PathBuf,
    pub reference_output: PathBuf,
    pub comparison: PathBuf,

    pub candidate_bin: PathBuf,
    pub reference_bin: PathBuf,
    pub generator_bin: PathBuf,
}

impl FilePathSet {
    /// Accepts `<dir>/<stem>.cpp` only: non-empty directory, non-empty stem,
    /// extension exactly `cpp`.
    pub fn resolve(source: &Path) -> Result<Self, StressError> {
        let malformed = || StressError::MalformedPath(source.display().to_string());

        if source.extension().and_then(|e| e.to_str()) != Some("cpp") {
            return Err(malformed());
        }

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(malformed)?;

        let dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(malformed)?;

        let at = |suffix: &str| dir.join(format!("{}{}", stem, suffix));

        Ok(Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),

            candidate_source: source.to_path_buf(),
            reference_source: at(&format!("{}.cpp", GOOD)),
            generator_source: at(&format!("{}.cpp", GENERATOR)),

            random_input: at(RANDOM_INPUT),
            candidate_output: at(OUTPUT),
            reference_output: at(GOOD_OUTPUT),
            comparison: at(COMPARISON),

            candidate_bin: at(""),
            reference_bin: at(GOOD),
            generator_bin: at(GENERATOR),
        })
    }

    /// Sources that must exist before anything is built.
    pub fn sources(&self) -> [&Path; 3] {
        [
            &self.candidate_source,
            &self.reference_source,
            &self.generator_source,
        ]
    }

    /// `(source, executable)` pairs in build order.
    pub fn builds(&self) -> [(&Path, &Path); 3] {
        [
            (&self.generator_source, &self.generator_bin),
            (&self.reference_source, &self.reference_bin),
            (&self.candidate_source, &self.candidate_bin),
        ]
    }
}
