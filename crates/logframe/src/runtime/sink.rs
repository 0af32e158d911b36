//! Sinks — document consumers for the ingest loop.

use std::borrow::Cow;

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::ingest::{DocumentSink, PipelineError};
use crate::document::{DocId, Document, Indexable, Projection};
use crate::parser::EventKind;

/// One line of output: what an indexing engine stores for a document.
#[derive(Debug, Serialize)]
pub struct IndexRecord<'a> {
    pub id: DocId,
    pub kind: EventKind,
    pub data: Projection,
    pub source: Cow<'a, str>,
}

/// Writes each document as one JSON object per line.
///
/// Documents whose fields break the projection contract are logged and
/// skipped; the stream continues.
pub struct JsonLinesSink<W> {
    writer: W,
    written: u64,
    rejected: u64,
    line: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            rejected: 0,
            line: Vec::with_capacity(512),
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Documents dropped for a field contract violation.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: AsyncWrite + Unpin> DocumentSink for JsonLinesSink<W> {
    async fn accept(&mut self, document: Document) -> Result<(), PipelineError> {
        let id = document.id();
        let data = match document.data() {
            Ok(data) => data,
            Err(e) => {
                self.rejected += 1;
                tracing::warn!(id = %id, error = %e, "sink: dropping document");
                return Ok(());
            }
        };

        let record = IndexRecord {
            id,
            kind: document.kind(),
            data,
            source: String::from_utf8_lossy(document.source()),
        };

        self.line.clear();
        serde_json::to_writer(&mut self.line, &record)?;
        self.line.push(b'\n');
        self.writer.write_all(&self.line).await?;
        self.written += 1;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), PipelineError> {
        self.writer.flush().await?;
        Ok(())
    }
}

/// Hands documents to another task over a bounded channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Document>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Document>) -> Self {
        Self { tx }
    }
}

impl DocumentSink for ChannelSink {
    async fn accept(&mut self, document: Document) -> Result<(), PipelineError> {
        self.tx
            .send(document)
            .await
            .map_err(|_| PipelineError::SinkClosed)
    }
}
