//! Logging setup for the lovescale binary

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding the log filter (e.g. `debug`, `lovescale=trace`)
pub const LOG_ENV: &str = "LOVESCALE_LOG";

/// Install a stderr subscriber; stdout stays reserved for command output.
///
/// Calling this twice is harmless: the second install attempt is ignored.
pub fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr);

    let _ = Registry::default()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
