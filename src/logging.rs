#![forbid(unsafe_code)]

//! Process-wide log subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

use crate::types::{GraphError, Result};

/// Environment variable consulted when no explicit filter is given.
pub const LOG_ENV: &str = "ODGI_LOG";

/// Installs a `tracing` fmt subscriber writing to stderr.
///
/// `filter` uses `EnvFilter` syntax (`"info"`, `"odgi_ffi=debug"`). When it is
/// `None`, [`LOG_ENV`] is read and `warn` is the fallback. Only the first
/// successful call per process has an effect; later calls return an error.
pub fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| GraphError::InvalidArgument(format!("invalid log filter: {e}")))?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| GraphError::InvalidArgument("logging already initialized".into()))
}
