//! Pattern — grok-style building blocks for syslog timestamps and the
//! compiled marker matchers used by the delimiter.

use std::sync::LazyLock;

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};

/// Month name, English and German spellings. Word boundaries are ASCII: a
/// marker glued to a non-ASCII letter still counts.
pub const MONTH: &str = r"(?-u:\b)(?:Jan(?:uary|uar)?|Feb(?:ruary|ruar)?|M(?:a|ä)?r(?:ch|z)?|Apr(?:il)?|Ma(?:y|i)?|Jun(?:e|i)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|O(?:c|k)?t(?:ober)?|Nov(?:ember)?|De(?:c|z)(?:ember)?)(?-u:\b)";
pub const MONTHDAY: &str = r"(?:(?:0[1-9])|(?:[12][0-9])|(?:3[01])|[1-9])";
pub const HOUR: &str = r"(?:2[0123]|[01]?[0-9])";
pub const MINUTE: &str = r"(?:[0-5][0-9])";
pub const SECOND: &str = r"(?:(?:[0-5]?[0-9]|60)(?:[:.,][0-9]+)?)";

/// Whitespace: ASCII space, tab, CR, LF and form feed. Vertical tab and
/// Unicode spaces are ordinary bytes.
pub const SPACE: &str = r"[\t\n\f\r ]";
/// Any single byte that is not [`SPACE`].
pub const NOT_SPACE: &str = r"(?-u:[^\t\n\f\r ])";

/// `Mon DD HH:MM:SS[.frac]`, day may be space padded.
pub fn syslog_timestamp() -> String {
    format!("{MONTH} +{MONTHDAY} {HOUR}:{MINUTE}(?::{SECOND})")
}

/// The marker that opens a new message: a month token followed by whitespace.
pub fn marker() -> String {
    format!("{MONTH}{SPACE}")
}

/// Widest span a marker match (plus its leading line break) can cover, in
/// bytes, with room to spare: the longest is `\nSeptember` and one
/// whitespace byte. Matching only ever has to look this far back from the
/// buffer end.
pub const TAIL_WINDOW: usize = 32;

/// Marker ending exactly at the end of the buffer (Seeking).
pub(crate) static START: LazyLock<RegexMatcher> =
    LazyLock::new(|| build(&format!("{}$", marker())).expect("valid start marker pattern"));

/// Line break followed by a marker (Framing / Resyncing).
pub(crate) static RUN: LazyLock<RegexMatcher> =
    LazyLock::new(|| build(&format!(r"\n{}", marker())).expect("valid run marker pattern"));

/// Marker anywhere (vestige check).
pub(crate) static ANY: LazyLock<RegexMatcher> =
    LazyLock::new(|| build(&marker()).expect("valid marker pattern"));

fn build(pattern: &str) -> Result<RegexMatcher, grep_regex::Error> {
    RegexMatcherBuilder::new()
        .multi_line(false)
        .build(pattern)
}

/// Start offset of the first match of `matcher` beginning at or after the
/// tail window of `haystack`. Bytes before the window still count as
/// look-behind context for `\b`.
pub(crate) fn find_in_tail(matcher: &RegexMatcher, haystack: &[u8]) -> Option<usize> {
    let at = haystack.len().saturating_sub(TAIL_WINDOW);
    matcher
        .find_at(haystack, at)
        .ok()
        .flatten()
        .map(|m| m.start())
}

/// Start offset of the first match anywhere in `haystack`.
pub(crate) fn find_anywhere(matcher: &RegexMatcher, haystack: &[u8]) -> Option<usize> {
    matcher.find(haystack).ok().flatten().map(|m| m.start())
}
