//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Timestamp layout used on every log line, e.g. `14:03:59 10/19/2026`.
pub const LOG_TIME_FORMAT: &str = "%H:%M:%S %m/%d/%Y";

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set.
///
/// `RUST_LOG` overrides the default `info` filter. `ansi` toggles colored
/// level labels.
pub fn init_tracing(ansi: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_owned()))
        .try_init();
}
