//! Logging initialization
//!
//! Structured logging via `tracing` with an env-driven filter.
//! `RUST_LOG` controls verbosity (default: info).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Safe to call once at startup; a second call returns an error from the
/// global subscriber, which callers may ignore in tests.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
