//! Run configuration.

use crate::report::REPORT_FILE_NAME;
use std::path::{Path, PathBuf};

/// Paths for a single run, built once at the entry point and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// The `history.sqlite` artifact to analyse.
    pub input: PathBuf,
    /// Directory the report is written into.
    pub output_dir: PathBuf,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Final location of the report file.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE_NAME)
    }
}
