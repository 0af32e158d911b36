use grep_regex::RegexMatcher;

use crate::delimiter::pattern::{syslog_timestamp, NOT_SPACE, SPACE};
use crate::parser::formats::{capture, compile, group};
use crate::parser::traits::{EventKind, FieldExtractor, Fields, ParseError};

/// How the process id is wrapped after the app name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidDelimiter {
    /// `sshd[1999]: ...`
    Brackets,
    /// `sshd(1999): ...`
    Parens,
}

impl PidDelimiter {
    /// (app character class, opening token, closing token)
    fn tokens(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            PidDelimiter::Brackets => (r"[^ \[]+", r"\[", r"\]"),
            PidDelimiter::Parens => (r"[^ (]+", r"\(", r"\)"),
        }
    }
}

/// Extractor for BSD-style syslog lines carrying a priority token:
///
/// `Aug 24 05:14:15 info sshd[1999]: password accepted`
///
/// Fields: `timestamp` (raw, not date-parsed), `priority` (any non-blank
/// token), `app`, `pid` (integer, `-` means absent and maps to 0) and
/// `message` (everything after `: `, line breaks included).
pub struct SyslogExtractor {
    name: &'static str,
    matcher: RegexMatcher,
}

impl SyslogExtractor {
    pub fn new(name: &'static str, pid: PidDelimiter) -> Result<Self, ParseError> {
        let (app, open, close) = pid.tokens();
        let pattern = format!(
            r"^({ts}){SPACE}({NOT_SPACE}+){SPACE}({app}){open}(-|[0-9]{{1,5}}){close}:{SPACE}(.+)$",
            ts = syslog_timestamp(),
        );
        Ok(Self {
            name,
            matcher: compile(name, &pattern)?,
        })
    }
}

impl FieldExtractor for SyslogExtractor {
    fn extract(&self, raw: &[u8]) -> Result<Fields, ParseError> {
        let no_match = || ParseError::NoMatch(self.name);
        let caps = capture(&self.matcher, raw).ok_or_else(no_match)?;

        let timestamp = group(&caps, raw, 1).ok_or_else(no_match)?;
        let priority = group(&caps, raw, 2).ok_or_else(no_match)?;
        let app = group(&caps, raw, 3).ok_or_else(no_match)?;
        let pid = match group(&caps, raw, 4).ok_or_else(no_match)?.as_str() {
            "-" => 0,
            digits => digits.parse::<i64>().map_err(|_| no_match())?,
        };
        let message = group(&caps, raw, 5).ok_or_else(no_match)?;

        let mut fields = Fields::new();
        fields.insert("timestamp", timestamp);
        fields.insert("priority", priority);
        fields.insert("app", app);
        fields.insert("pid", pid);
        fields.insert("message", message);
        Ok(fields)
    }

    fn kind(&self) -> EventKind {
        EventKind::Syslog
    }
}
