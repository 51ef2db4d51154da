//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Logs always go to stderr; stdout is reserved for results.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set.
fn default_directive(level: &str, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    match level.trim().to_lowercase().as_str() {
        "" => "info".to_string(),
        other => other.to_string(),
    }
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: &str, verbose: bool, json_format: bool) {
    let directive = default_directive(level, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(config: &locus_core::Config, verbose: bool, json_logs: bool) {
    let json_format = json_logs || config.logging.format == "json";
    init(&config.logging.level, verbose, json_format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_forces_debug() {
        assert_eq!(default_directive("warn", true), "debug");
    }

    #[test]
    fn test_config_level_used_as_is() {
        assert_eq!(default_directive("Trace", false), "trace");
        assert_eq!(default_directive("locus_core=debug", false), "locus_core=debug");
    }

    #[test]
    fn test_empty_level_falls_back_to_info() {
        assert_eq!(default_directive("  ", false), "info");
    }
}
