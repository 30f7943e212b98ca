//! Diagnostic logging setup.
//!
//! All modules log through `tracing` macros; this module installs the
//! subscriber once at startup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter for a configured level such as `"info"`.
///
/// A bare level applies to txdash only, so dependencies stay quiet. Anything
/// that already looks like a directive (`"txdash=debug,tiny_http=warn"`) is
/// used as written.
pub fn default_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        "txdash=info".to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("txdash={level}")
    }
}

/// Initialize the logging system.
///
/// Call once at startup with the configured level. `RUST_LOG` takes
/// precedence when set. A second call is a no-op.
pub fn init_logging(level: &str) {
    let default_filter = default_directive(level);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_filter))
        .unwrap_or_else(|_| EnvFilter::new("txdash=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Ignore the error if a subscriber is already set.
    let _ = subscriber.try_init();
}

/// Initialize logging for tests: warnings and errors only.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
