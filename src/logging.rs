//! Tracing initialization
//!
//! Log lines go to stderr; stdout is reserved for command output.

use std::io;
use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogFormat;

/// Environment variable holding per-target log levels
pub const LOG_ENV: &str = "CONFHIST_LOG";

const DEFAULT_FILTER: &str = "confhist=info";

static INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Reads `CONFHIST_LOG` (e.g. `CONFHIST_LOG=confhist=debug`), falling back to
/// `confhist=info` when unset or invalid. Only the first call has any effect.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let registry = tracing_subscriber::registry().with(filter);
        match format {
            LogFormat::Text => registry
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_current_span(false),
                )
                .init(),
        }
    });
}
