// ============================================================
// Layer 6 — Logging Setup
// ============================================================
// Installs the process-wide tracing subscriber. Called exactly
// once from main; every other module only emits events through
// the `tracing` macros and never builds a subscriber itself.
//
// RUST_LOG wins when set, otherwise the crate logs at the
// level given on the command line (debug by default).

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Verbosity accepted by `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info  => "info",
            LogLevel::Warn  => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Filter directive for this crate at this level
    pub fn directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.as_str())
    }
}

/// Build the filter: RUST_LOG if present, else the crate directive.
pub fn env_filter(level: LogLevel) -> Result<EnvFilter> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_)     => EnvFilter::new("warn").add_directive(level.directive().parse()?),
    };
    Ok(filter)
}

/// Install the global fmt subscriber.
pub fn init(level: LogLevel) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Cannot install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_names_this_crate() {
        assert_eq!(LogLevel::Info.directive(), "md_schnet_workflow=info");
        assert_eq!(LogLevel::default(), LogLevel::Debug);
    }
}
