//! Boot — logging init and config load.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::IngestConfig;
use crate::parser::FormatRegistry;

/// Initialise the tracing / logging subsystem. Logs go to stderr so stdout
/// stays reserved for documents.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logframe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<IngestConfig, Box<dyn std::error::Error>> {
    info!("Starting logframe v{}", env!("CARGO_PKG_VERSION"));

    let config = IngestConfig::load().map_err(|e| {
        error!("Configuration rejected: {}", e);
        e
    })?;

    let registry = FormatRegistry::global();
    let format = registry.resolve(&config.format)?;
    info!(
        "Loaded configuration: format={} ({}), max_message_bytes={}, reference_zone={:?}",
        config.format,
        format.name(),
        config.max_message_bytes,
        config.reference_zone
    );
    info!(
        "Known formats: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );

    Ok(config)
}
