use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter, e.g. `mvi_runtime=debug`.
pub const LOG_ENV_VAR: &str = "MVI_RUNTIME_LOG";

/// Install a global fmt subscriber for the runtime's diagnostics.
///
/// The filter comes from `MVI_RUNTIME_LOG`, then `RUST_LOG`, then
/// `default_directive`. Returns `false` when a global subscriber was
/// already installed (the owning application configured logging itself).
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
