//! Serve — run stdin through the configured pipeline and write documents to
//! stdout as JSON lines.

use tokio::io::BufReader;
use tracing::{error, info};

use crate::conf::IngestConfig;
use crate::parser::FormatRegistry;
use crate::pipeline::Pipeline;
use crate::runtime::ingest::ingest;
use crate::runtime::sink::JsonLinesSink;

/// Ingest stdin until it closes.
pub async fn serve(config: IngestConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = FormatRegistry::global();
    let pipeline = Pipeline::from_config(registry, &config)?;
    info!("Reading {} messages from stdin", pipeline.format());

    let reader = BufReader::with_capacity(config.read_buffer_bytes, tokio::io::stdin());
    let mut sink = JsonLinesSink::new(tokio::io::stdout());

    let result = ingest(reader, pipeline, &mut sink).await;

    for snapshot in registry.snapshot() {
        if snapshot.parsed + snapshot.unparsed > 0 {
            info!(
                "Format {}: parsed={}, unparsed={}, success_rate={:.3}",
                snapshot.format, snapshot.parsed, snapshot.unparsed, snapshot.success_rate
            );
        }
    }
    info!(
        "Documents written={}, rejected={}",
        sink.written(),
        sink.rejected()
    );

    result.map_err(|e| {
        error!("Ingest failed: {}", e);
        e
    })?;
    Ok(())
}
