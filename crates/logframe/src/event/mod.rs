//! Event — one framed, parsed log message ready to become a document.

pub mod timestamp;

pub use timestamp::{resolve_reference_time, ReferenceZone};

use std::borrow::Cow;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

use crate::parser::{EventKind, Fields};

/// A log message after framing and field extraction. Never mutated once built.
#[derive(Debug, Clone)]
pub struct Event {
    sequence: u64,
    reference_time: DateTime<FixedOffset>,
    raw: Bytes,
    fields: Fields,
    kind: EventKind,
}

impl Event {
    /// `sequence` must increase monotonically per stream; together with the
    /// reference time it makes the document id unique.
    pub fn new(
        sequence: u64,
        reference_time: DateTime<FixedOffset>,
        raw: impl Into<Bytes>,
        fields: Fields,
        kind: EventKind,
    ) -> Self {
        Self {
            sequence,
            reference_time,
            raw: raw.into(),
            fields,
            kind,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn reference_time(&self) -> DateTime<FixedOffset> {
        self.reference_time
    }

    /// Nanoseconds since the epoch, saturating at `i64::MIN`/`i64::MAX`
    /// outside the representable range (years 1677..2262).
    pub fn reference_nanos(&self) -> i64 {
        self.reference_time.timestamp_nanos_opt().unwrap_or_else(|| {
            if self.reference_time.timestamp() < 0 {
                i64::MIN
            } else {
                i64::MAX
            }
        })
    }

    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}
