use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "libris=debug,actix_web=info";

/// Installs the global tracing subscriber: `RUST_LOG` driven filter plus the
/// fmt layer. Calling it twice is harmless.
pub fn init() {
  let result = tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
    .with(tracing_subscriber::fmt::layer())
    .try_init();

  if result.is_err() {
    tracing::debug!("Tracing subscriber already installed");
  }
}
