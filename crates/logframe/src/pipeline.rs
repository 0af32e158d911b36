//! Pipeline — the per-stream chain: delimiter → parser → event → document.
//!
//! Each stream owns one `Pipeline`; nothing in it is shared, so no locking.
//! Unparsed messages are logged and dropped, the stream carries on.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::conf::IngestConfig;
use crate::delimiter::{Delimiter, Message};
use crate::document::Document;
use crate::event::{resolve_reference_time, Event, ReferenceZone};
use crate::parser::{FormatRegistry, ParseError, Parser};

/// Per-stream counters, reported when the stream closes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub bytes: u64,
    pub framed: u64,
    pub unparsed: u64,
    pub truncated: u64,
    pub documents: u64,
}

pub struct Pipeline {
    delimiter: Delimiter,
    parser: Parser,
    zone: ReferenceZone,
    next_sequence: u64,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(parser: Parser, max_message_bytes: usize, zone: ReferenceZone) -> Self {
        Self {
            delimiter: Delimiter::new(max_message_bytes),
            parser,
            zone,
            next_sequence: 0,
            stats: PipelineStats::default(),
        }
    }

    /// Pipeline for the configured format, resolved in `registry`.
    pub fn from_config(registry: &FormatRegistry, config: &IngestConfig) -> Result<Self, ParseError> {
        let parser = registry.parser(&config.format)?;
        Ok(Self::new(parser, config.max_message_bytes, config.reference_zone))
    }

    pub fn format(&self) -> &'static str {
        self.parser.format()
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            truncated: self.delimiter.truncated(),
            ..self.stats
        }
    }

    /// Feed a chunk received now.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<Document> {
        self.push_bytes_at(chunk, Utc::now())
    }

    /// Feed a chunk received at `received`.
    pub fn push_bytes_at(&mut self, chunk: &[u8], received: DateTime<Utc>) -> Vec<Document> {
        self.stats.bytes += chunk.len() as u64;
        let mut documents = Vec::new();
        for &byte in chunk {
            if let Some(message) = self.delimiter.push(byte) {
                documents.extend(self.admit(message, received));
            }
        }
        documents
    }

    /// Close the stream: drain the vestige once and report the counters.
    pub fn finish(self) -> (Option<Document>, PipelineStats) {
        self.finish_at(Utc::now())
    }

    pub fn finish_at(mut self, received: DateTime<Utc>) -> (Option<Document>, PipelineStats) {
        let truncated = self.delimiter.truncated();
        let delimiter = std::mem::replace(&mut self.delimiter, Delimiter::new(0));
        let document = delimiter
            .vestige()
            .and_then(|message| self.admit(message, received));
        let stats = PipelineStats {
            truncated,
            ..self.stats
        };
        (document, stats)
    }

    fn admit(&mut self, message: Message, received: DateTime<Utc>) -> Option<Document> {
        self.stats.framed += 1;
        if !self.parser.parse(message.as_bytes()) {
            self.stats.unparsed += 1;
            tracing::debug!(
                format = self.parser.format(),
                len = message.len(),
                "pipeline: dropping message that does not match format"
            );
            return None;
        }

        let fields = self.parser.take_fields();
        let reference_time = resolve_reference_time(&fields, received, self.zone);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.stats.documents += 1;

        let event = Event::new(
            sequence,
            reference_time,
            message.into_bytes(),
            fields,
            self.parser.kind(),
        );
        Some(Document::new(event))
    }
}
