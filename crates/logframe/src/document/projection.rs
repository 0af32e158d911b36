use serde::Serialize;

use crate::event::Event;
use crate::parser::{EventKind, FieldError};

/// Layout of `reference_time` in every projection.
pub const REFERENCE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The indexable shape of an event. Which variant is produced depends on the
/// event kind, so the field set is not uniform across formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Projection {
    Minimal(MinimalRecord),
    Syslog(SyslogRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinimalRecord {
    pub message: String,
    pub reference_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyslogRecord {
    pub message: String,
    pub reference_time: String,
    pub priority: String,
    pub app: String,
    pub pid: String,
}

impl Projection {
    /// Build the projection for `event` according to its kind.
    pub fn of(event: &Event) -> Result<Self, FieldError> {
        let fields = event.fields();
        let reference_time = event
            .reference_time()
            .format(REFERENCE_TIME_FORMAT)
            .to_string();

        match event.kind() {
            EventKind::Plain => Ok(Projection::Minimal(MinimalRecord {
                message: fields.str_field("message")?.to_string(),
                reference_time,
            })),
            EventKind::Syslog => Ok(Projection::Syslog(SyslogRecord {
                message: fields.str_field("message")?.to_string(),
                reference_time,
                priority: fields.str_field("priority")?.to_string(),
                app: fields.str_field("app")?.to_string(),
                pid: fields.int_field("pid")?.to_string(),
            })),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Projection::Minimal(r) => &r.message,
            Projection::Syslog(r) => &r.message,
        }
    }

    pub fn reference_time(&self) -> &str {
        match self {
            Projection::Minimal(r) => &r.reference_time,
            Projection::Syslog(r) => &r.reference_time,
        }
    }
}
