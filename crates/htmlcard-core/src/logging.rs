//! Logging setup based on `tracing-subscriber`.

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber with the default [`Config`].
pub fn init() {
    init_with(&Config::default());
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.log_filter` when set. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init_with(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed");
    }
}
