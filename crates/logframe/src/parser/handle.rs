use std::sync::Arc;

use super::registry::{FormatRegistry, FormatSpec};
use super::traits::{EventKind, Fields, ParseError};

/// Per-stream parser bound to one resolved format.
///
/// Holds the mapping from the last successful parse; a failed parse leaves it
/// untouched.
#[derive(Debug)]
pub struct Parser {
    spec: Arc<FormatSpec>,
    fields: Fields,
}

impl Parser {
    /// Resolve `format` (canonical name or alias) in the global registry.
    pub fn new(format: &str) -> Result<Self, ParseError> {
        FormatRegistry::global().parser(format)
    }

    pub(crate) fn from_spec(spec: Arc<FormatSpec>) -> Self {
        Self {
            spec,
            fields: Fields::new(),
        }
    }

    /// Canonical name of the bound format.
    pub fn format(&self) -> &'static str {
        self.spec.name()
    }

    pub fn kind(&self) -> EventKind {
        self.spec.kind()
    }

    /// Parse one framed message. Returns whether extraction succeeded.
    pub fn parse(&mut self, raw: &[u8]) -> bool {
        match self.spec.extract(raw) {
            Ok(fields) => {
                self.fields = fields;
                true
            }
            Err(_) => false,
        }
    }

    /// Mapping from the most recent successful parse.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Hand the mapping over, leaving an empty one behind.
    pub fn take_fields(&mut self) -> Fields {
        std::mem::take(&mut self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::model::FieldValue;

    #[test]
    fn test_new_resolves_alias() {
        let parser = Parser::new("syslog").unwrap();
        assert_eq!(parser.format(), "rfc3164-pid");
        assert_eq!(parser.kind(), EventKind::Syslog);
        assert!(parser.fields().is_empty());
    }

    #[test]
    fn test_new_unknown_format() {
        let err = Parser::new("unknown-format").unwrap_err();
        assert_eq!(err, ParseError::FormatUnknown("unknown-format".to_string()));
        assert_eq!(err.to_string(), "Unknown format: unknown-format");
    }

    #[test]
    fn test_parse_populates_fields() {
        let mut parser = Parser::new("syslog").unwrap();
        assert!(parser.parse(b"Aug 24 05:14:15 info sshd[1999]: password accepted"));

        let fields = parser.fields();
        assert_eq!(fields.get("priority"), Some(&FieldValue::from("info")));
        assert_eq!(fields.get("timestamp"), Some(&FieldValue::from("Aug 24 05:14:15")));
        assert_eq!(fields.get("app"), Some(&FieldValue::from("sshd")));
        assert_eq!(fields.get("pid"), Some(&FieldValue::Int(1999)));
        assert_eq!(fields.get("message"), Some(&FieldValue::from("password accepted")));
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn test_failed_parse_leaves_fields_unchanged() {
        let mut parser = Parser::new("syslog").unwrap();
        assert!(!parser.parse(b"<134> 2013-09-04T10:25:52.618085 ubuntu sshd 1999 - password accepted"));
        assert!(parser.fields().is_empty());

        assert!(parser.parse(b"Apr 12 23:20:50 warn cron[304]: password accepted"));
        assert!(!parser.parse(b"garbage"));
        assert_eq!(parser.fields().str_field("app"), Ok("cron"));
    }

    #[test]
    fn test_take_fields() {
        let mut parser = Parser::new("plain").unwrap();
        assert!(parser.parse(b"Jan hello"));
        let fields = parser.take_fields();
        assert_eq!(fields.str_field("message"), Ok("Jan hello"));
        assert!(parser.fields().is_empty());
    }
}
