//! Tracing initialization and subscriber setup.

use super::console_writer::MakeConsoleWriter;
use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// Events are filtered by `config.trace_level` (default `"info"`) and formatted
/// without timestamps or ANSI colors; the console adds its own. Safe to call more
/// than once: only the first call takes effect.
///
/// # Example
///
/// ```rust
/// use livesearch::observability::init_tracing;
/// use livesearch::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// init_tracing(&config);
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(MakeConsoleWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(fmt_layer);

    if subscriber.try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
