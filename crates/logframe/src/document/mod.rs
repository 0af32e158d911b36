//! Document — adapts an [`Event`] to what the indexing engine consumes:
//! a stable id, an indexable projection and the raw source bytes.

pub mod projection;

pub use projection::{MinimalRecord, Projection, SyslogRecord, REFERENCE_TIME_FORMAT};

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use thiserror::Error;

use crate::event::Event;
use crate::parser::{EventKind, FieldError, Fields};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Field contract violation: {0}")]
    FieldContractViolation(#[from] FieldError),
}

/// 32 hex digits: reference time in nanoseconds, then the stream sequence.
/// Sorts roughly by time; the sequence keeps same-nanosecond events apart.
/// Times outside years 1677..2262 saturate, so such events share the time
/// half and differ only by sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(reference_nanos: i64, sequence: u64) -> Self {
        Self(format!("{:016x}{:016x}", reference_nanos as u64, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the indexing engine needs from anything it stores.
pub trait Indexable {
    fn id(&self) -> DocId;
    fn data(&self) -> Result<Projection, DocumentError>;
    fn source(&self) -> &[u8];
}

/// An event as seen by the indexing engine. Delegates to the wrapped event
/// rather than exposing it wholesale.
#[derive(Debug, Clone)]
pub struct Document {
    event: Event,
}

impl Document {
    pub fn new(event: Event) -> Self {
        Self { event }
    }

    pub fn sequence(&self) -> u64 {
        self.event.sequence()
    }

    pub fn reference_time(&self) -> DateTime<FixedOffset> {
        self.event.reference_time()
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    pub fn fields(&self) -> &Fields {
        self.event.fields()
    }

    pub fn into_event(self) -> Event {
        self.event
    }
}

impl From<Event> for Document {
    fn from(event: Event) -> Self {
        Self::new(event)
    }
}

impl Indexable for Document {
    fn id(&self) -> DocId {
        DocId::new(self.event.reference_nanos(), self.event.sequence())
    }

    fn data(&self) -> Result<Projection, DocumentError> {
        Ok(Projection::of(&self.event)?)
    }

    fn source(&self) -> &[u8] {
        self.event.raw()
    }
}
