use grep_regex::RegexMatcher;

use crate::delimiter::pattern::{syslog_timestamp, SPACE};
use crate::parser::formats::{capture, compile, group};
use crate::parser::traits::{EventKind, FieldExtractor, Fields, ParseError};

/// Extractor for unstructured lines: an optional leading syslog timestamp
/// followed by free text. Only `message` (and `timestamp` when present) are
/// produced.
pub struct PlainExtractor {
    name: &'static str,
    matcher: RegexMatcher,
}

impl PlainExtractor {
    pub fn new(name: &'static str) -> Result<Self, ParseError> {
        let pattern = format!(r"^(?:({ts}){SPACE}+)?(.+)$", ts = syslog_timestamp());
        Ok(Self {
            name,
            matcher: compile(name, &pattern)?,
        })
    }
}

impl FieldExtractor for PlainExtractor {
    fn extract(&self, raw: &[u8]) -> Result<Fields, ParseError> {
        let caps = capture(&self.matcher, raw).ok_or(ParseError::NoMatch(self.name))?;
        let message = group(&caps, raw, 2).ok_or(ParseError::NoMatch(self.name))?;

        let mut fields = Fields::new();
        if let Some(timestamp) = group(&caps, raw, 1) {
            fields.insert("timestamp", timestamp);
        }
        fields.insert("message", message);
        Ok(fields)
    }

    fn kind(&self) -> EventKind {
        EventKind::Plain
    }
}
