//! Opt-in diagnostics for the command-line driver.
//!
//! Nothing is installed unless `PROPSCOPE_LOG` or `RUST_LOG` is set. Output
//! goes to stderr; stdout carries the JSON results.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// `PROPSCOPE_LOG` wins over `RUST_LOG`; both use the `RUST_LOG` syntax.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(value) = std::env::var("PROPSCOPE_LOG") {
        return Some(EnvFilter::builder().parse_lossy(value));
    }
    std::env::var("RUST_LOG")
        .is_ok()
        .then(EnvFilter::from_default_env)
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_tracing() {
    let Some(filter) = build_filter() else {
        return;
    };
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time();
    let _ = Registry::default().with(filter).with(layer).try_init();
}
