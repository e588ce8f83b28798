//! Validation, hashing, extraction and reporting for IPython console history.

mod config;
mod error;

pub mod digest;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod signature;

pub use config::RunConfig;
pub use error::IpyHistError;
pub use pipeline::{run, RunSummary};
pub use report::{RecordSkipped, ReportBuilder, ReportSummary, SkipReason};

/// Tool name shown in the banner and on the report's Notes sheet.
pub const TOOL_NAME: &str = "iPython Log Parser";

/// Tool version shown in the banner and on the report's Notes sheet.
pub const TOOL_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, IpyHistError>;
