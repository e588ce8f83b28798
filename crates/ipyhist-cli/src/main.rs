//! ipyhist - IPython console history to .xlsx report.

use anyhow::Result;
use clap::Parser;
use ipyhist_cli::cli::Cli;
use ipyhist_cli::logging::{self, LogConfig};
use ipyhist_core::{pipeline, IpyHistError, RunSummary, TOOL_NAME, TOOL_VERSION};
use std::process::ExitCode;

const AUTHOR: &str = "DCScoder";

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&LogConfig::default());

    print_banner();

    match run(cli) {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("\n{}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<RunSummary> {
    let config = cli.into_config();
    tracing::debug!(target: "ipyhist::pipeline", ?config, "Starting run");
    Ok(pipeline::run(&config)?)
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<IpyHistError>()
        .map(IpyHistError::exit_code)
        .unwrap_or(1)
}

fn print_banner() {
    let title = format!("~ {} {} developed by {} ~", TOOL_NAME, TOOL_VERSION, AUTHOR);
    let rule = "~".repeat(title.len());
    println!("{}\n{}\n{}", rule, title, rule);
}

fn print_summary(summary: &RunSummary) {
    println!("\n{} bytes read", summary.digests.byte_count);
    println!("\nMD5 Hash: {}", summary.digests.md5);
    println!("SHA1 Hash: {}", summary.digests.sha1);
    println!(
        "\n{} records processed, {} skipped.",
        summary.report.rows_written,
        summary.report.skipped_count()
    );
    if summary.report.skipped_count() > 0 {
        println!("Some records could not be written, source data structure may have changed.");
    }
    println!("\nReport written to {}", summary.report.path.display());
}
