//! Command-line arguments.

use clap::Parser;
use ipyhist_core::RunConfig;
use std::path::PathBuf;

/// iPython Log Parser - exports console history from history.sqlite into an .xlsx report.
#[derive(Parser, Debug)]
#[command(name = "ipyhist")]
#[command(about = "Parses IPython console history into an .xlsx report for review")]
#[command(version)]
pub struct Cli {
    /// Path to the IPython history.sqlite artifact
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory the report is written into
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,
}

impl Cli {
    pub fn into_config(self) -> RunConfig {
        RunConfig::new(self.input, self.output_dir)
    }
}
