//! Tracing setup for applications embedding the pantry core.
//!
//! The core only emits `tracing` events. Hosts that have no subscriber of
//! their own can install one here; RUST_LOG always overrides the defaults.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directives used when RUST_LOG is unset: quiet dependencies, `level` for
/// inventory events
pub fn default_directives(level: &str) -> String {
    format!("warn,pantry_core={}", level)
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Install a compact subscriber logging inventory events at INFO
///
/// Returns `false` if the host already installed a global subscriber.
pub fn init() -> bool {
    init_with_level("info")
}

/// Install a compact subscriber logging inventory events at `level`
pub fn init_with_level(level: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(level))
        .with(fmt::layer().compact())
        .try_init()
        .is_ok()
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new(default_directives("trace")))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_to_crate() {
        assert_eq!(default_directives("debug"), "warn,pantry_core=debug");
        assert!(EnvFilter::try_new(default_directives("trace")).is_ok());
    }

    #[test]
    fn test_init_leaves_existing_subscriber_alone() {
        init_test();
        assert!(!init());
        assert!(!init_with_level("debug"));
    }
}
