/// Individual wire format extractors

pub mod plain;
pub mod syslog;

pub use plain::PlainExtractor;
pub use syslog::{PidDelimiter, SyslogExtractor};

use grep_matcher::{Captures, Matcher};
use grep_regex::{RegexCaptures, RegexMatcher, RegexMatcherBuilder};

use super::model::ParseError;

/// Compile an extraction pattern. `.` spans line breaks so multi-line bodies
/// land in the trailing message group; `^`/`$` anchor the whole message.
pub(crate) fn compile(format: &'static str, pattern: &str) -> Result<RegexMatcher, ParseError> {
    RegexMatcherBuilder::new()
        .multi_line(false)
        .dot_matches_new_line(true)
        .build(pattern)
        .map_err(|e| ParseError::InvalidPattern {
            format,
            reason: e.to_string(),
        })
}

/// Run `matcher` over `raw`, returning the capture set on a full match.
pub(crate) fn capture(matcher: &RegexMatcher, raw: &[u8]) -> Option<RegexCaptures> {
    let mut caps = matcher.new_captures().ok()?;
    matcher
        .captures(raw, &mut caps)
        .unwrap_or(false)
        .then_some(caps)
}

/// Text of capture group `index`, if it participated in the match.
pub(crate) fn group(caps: &RegexCaptures, raw: &[u8], index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| String::from_utf8_lossy(&raw[m.start()..m.end()]).into_owned())
}
