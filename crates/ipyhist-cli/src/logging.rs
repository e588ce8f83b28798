//! Logging configuration and initialization.
//!
//! Diagnostics go to stderr through `tracing`, leaving stdout for the
//! user-facing run summary. `RUST_LOG` replaces the built-in directives when
//! set.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pipeline stages that log under their own target.
const STAGE_TARGETS: &[&str] = &["signature", "digest", "extract", "report", "pipeline"];

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for every `ipyhist` target.
    pub level: Level,
    /// Include the target in each line.
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    pub fn directives(&self) -> String {
        let level = level_to_str(self.level);
        let mut directives = vec![format!("ipyhist={}", level)];
        for stage in STAGE_TARGETS {
            directives.push(format!("ipyhist::{}={}", stage, level));
        }
        directives.join(",")
    }

    /// Build an EnvFilter from this configuration.
    pub fn build_filter(&self) -> EnvFilter {
        // Check for RUST_LOG environment variable first
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::try_new(self.directives()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Convert a Level to its filter string representation.
fn level_to_str(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    tracing_subscriber::registry()
        .with(config.build_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.with_target)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}
