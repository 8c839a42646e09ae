//! Logging setup for the command-line tool.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing.
///
/// Safe to call multiple times. Output is enabled only when `OBJX_LOG` or
/// `RUST_LOG` is set, e.g. `OBJX_LOG=objx_mangle=debug` or
/// `RUST_LOG=objx_render=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if std::env::var("OBJX_LOG").is_ok() {
            EnvFilter::from_env("OBJX_LOG")
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}
