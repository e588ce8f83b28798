//! Error types for the history parser.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Any of these aborts the run.
#[derive(Error, Debug)]
pub enum IpyHistError {
    #[error("File signature check failed for {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("Could not read artifact {}: {source}", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not connect to SQLite database {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Could not execute SQL queries: {0}")]
    Query(String),

    #[error("Unable to generate .xlsx report at {}: {reason}", path.display())]
    ReportGeneration { path: PathBuf, reason: String },
}

impl IpyHistError {
    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn report(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ReportGeneration {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Format { .. } => "signature",
            Self::ArtifactRead { .. } => "read",
            Self::Connection { .. } => "connect",
            Self::Query(_) => "query",
            Self::ReportGeneration { .. } => "report",
        }
    }

    /// Get the process exit code for this error.
    ///
    /// Codes start at 3: 1 is a generic failure and 2 is a usage error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Format { .. } | Self::ArtifactRead { .. } => 3,
            Self::Connection { .. } => 4,
            Self::Query(_) => 5,
            Self::ReportGeneration { .. } => 6,
        }
    }
}
