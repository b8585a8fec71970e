//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Binaries and demos call
//! [`init_logging`] once to print them, filtered through `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber with an env filter.
///
/// Defaults to `INFO` when `RUST_LOG` is unset. Calling this twice is
/// harmless: the second install fails quietly.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Like [`init_logging`] but with an explicit filter directive,
/// e.g. `"kraken_interface=trace"`.
pub fn init_logging_with(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .try_init();
}
