//! Ingest — drives one byte stream through a [`Pipeline`] into a sink.

use std::future::Future;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::document::Document;
use crate::pipeline::{Pipeline, PipelineStats};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Document sink closed")]
    SinkClosed,
}

/// Where documents go once the pipeline produces them.
pub trait DocumentSink {
    fn accept(&mut self, document: Document) -> impl Future<Output = Result<(), PipelineError>>;

    /// Called once after the last document of a stream.
    fn flush(&mut self) -> impl Future<Output = Result<(), PipelineError>> {
        async { Ok(()) }
    }
}

/// Read `reader` to the end, feeding every chunk to `pipeline` and every
/// document to `sink`.
///
/// End of input is the only close signal. The vestige is drained exactly once,
/// also when the read side fails; the read error is returned afterwards. A sink
/// error aborts the stream without draining.
pub async fn ingest<R, S>(
    mut reader: R,
    mut pipeline: Pipeline,
    sink: &mut S,
) -> Result<PipelineStats, PipelineError>
where
    R: AsyncBufRead + Unpin,
    S: DocumentSink,
{
    let read_result = loop {
        let chunk = match reader.fill_buf().await {
            Ok(chunk) if chunk.is_empty() => break Ok(()),
            Ok(chunk) => chunk,
            Err(e) => break Err(e),
        };
        let len = chunk.len();
        let documents = pipeline.push_bytes(chunk);
        reader.consume(len);

        for document in documents {
            sink.accept(document).await?;
        }
    };

    if let Err(e) = &read_result {
        tracing::warn!(error = %e, "ingest: read failed, closing stream");
    }

    let format = pipeline.format();
    let (vestige, stats) = pipeline.finish();
    if let Some(document) = vestige {
        sink.accept(document).await?;
    }
    sink.flush().await?;

    tracing::info!(
        format,
        bytes = stats.bytes,
        framed = stats.framed,
        documents = stats.documents,
        unparsed = stats.unparsed,
        truncated = stats.truncated,
        "ingest: stream closed"
    );

    read_result?;
    Ok(stats)
}
