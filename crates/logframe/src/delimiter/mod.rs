//! Delimiter — splits a raw syslog byte stream into framed messages.
//!
//! A message starts at a month marker (`Jan `, `Feb `, ...) at the start of a
//! line. Line breaks not followed by a marker stay inside the current message,
//! so stack traces survive framing, and markers that appear mid-line never
//! split a message.
//!
//! The buffer is hard-capped: an over-long message is emitted truncated and the
//! delimiter resynchronises on the next line-anchored marker.

pub mod message;
pub mod pattern;

pub use message::Message;

use pattern::{find_anywhere, find_in_tail, ANY, RUN, START, TAIL_WINDOW};

/// Smallest accepted buffer limit.
pub const MIN_MESSAGE_BYTES: usize = 2 * TAIL_WINDOW;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterState {
    /// No marker seen yet; leading bytes are noise.
    Seeking,
    /// Inside a message; only `\n` + marker closes it.
    Framing,
    /// Skipping the remainder of a truncated message.
    Resyncing,
}

/// Per-stream message delimiter. Not shared between streams.
#[derive(Debug)]
pub struct Delimiter {
    buffer: Vec<u8>,
    state: DelimiterState,
    max_size: usize,
    truncated: u64,
}

impl Delimiter {
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(MIN_MESSAGE_BYTES);
        Self {
            buffer: Vec::with_capacity(max_size.min(4096)),
            state: DelimiterState::Seeking,
            max_size,
            truncated: 0,
        }
    }

    pub fn state(&self) -> DelimiterState {
        self.state
    }

    /// Bytes held since the last flush.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Messages cut short by the buffer limit so far.
    pub fn truncated(&self) -> u64 {
        self.truncated
    }

    /// Feed one byte. Returns a message when this byte completes a boundary.
    pub fn push(&mut self, byte: u8) -> Option<Message> {
        self.buffer.push(byte);
        match self.state {
            DelimiterState::Seeking => self.seek(),
            DelimiterState::Framing => self.frame(),
            DelimiterState::Resyncing => self.resync(),
        }
    }

    /// Drain what is left at end of stream. Only a buffer that contains a
    /// marker counts as a message; anything else is discarded.
    pub fn vestige(self) -> Option<Message> {
        if self.state == DelimiterState::Resyncing {
            return None;
        }
        find_anywhere(&ANY, &self.buffer)?;
        Some(Message::new(trim_end(&self.buffer, b"\r\n")))
    }

    fn seek(&mut self) -> Option<Message> {
        if let Some(start) = find_in_tail(&START, &self.buffer) {
            self.buffer.drain(..start);
            self.state = DelimiterState::Framing;
        } else if self.buffer.len() > self.max_size {
            self.keep_tail();
        }
        None
    }

    fn frame(&mut self) -> Option<Message> {
        if let Some(at) = find_in_tail(&RUN, &self.buffer) {
            let message = Message::new(trim_end(&self.buffer[..at], b"\r"));
            // drop the line break, keep the marker
            self.buffer.drain(..=at);
            return Some(message);
        }
        if self.buffer.len() >= self.max_size {
            return Some(self.truncate());
        }
        None
    }

    fn resync(&mut self) -> Option<Message> {
        if let Some(at) = find_in_tail(&RUN, &self.buffer) {
            self.buffer.drain(..=at);
            self.state = DelimiterState::Framing;
        } else if self.buffer.len() > MIN_MESSAGE_BYTES {
            self.keep_tail();
        }
        None
    }

    fn truncate(&mut self) -> Message {
        self.truncated += 1;
        tracing::warn!(
            max_bytes = self.max_size,
            "delimiter: message exceeded buffer limit, emitting truncated"
        );
        let message = Message::new(trim_end(&self.buffer, b"\r"));
        // The tail stays as context so a boundary straddling the cut is found.
        self.keep_tail();
        self.state = DelimiterState::Resyncing;
        message
    }

    fn keep_tail(&mut self) {
        let cut = self.buffer.len().saturating_sub(TAIL_WINDOW);
        self.buffer.drain(..cut);
    }
}

fn trim_end<'a>(bytes: &'a [u8], set: &[u8]) -> &'a [u8] {
    let end = bytes
        .iter()
        .rposition(|b| !set.contains(b))
        .map_or(0, |i| i + 1);
    &bytes[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delimit(input: &str, max_size: usize) -> (Vec<String>, Delimiter) {
        let mut d = Delimiter::new(max_size);
        let mut out = Vec::new();
        for b in input.bytes() {
            if let Some(m) = d.push(b) {
                out.push(m.text().into_owned());
            }
        }
        (out, d)
    }

    #[test]
    fn test_delimiter_table() {
        let cases = [
            (
                "simple",
                "Jan sshd is down\nFeb sshd is up\nMar password accepted",
                vec!["Jan sshd is down", "Feb sshd is up"],
            ),
            (
                "leading",
                "password accepted for user rootApr sshd is down\nDec sshd is up\nMar password accepted",
                vec!["Dec sshd is up"],
            ),
            (
                "crlf",
                "Apr sshd is down\r\nDec sshd is up\r\nMar password accepted",
                vec!["Apr sshd is down", "Dec sshd is up"],
            ),
            (
                "stacktrace",
                "Apr sshd is down\nDec OOM on line 42, dummy.java\n\tclass_loader.jar\nMar password accepted",
                vec!["Apr sshd is down", "Dec OOM on line 42, dummy.java\n\tclass_loader.jar"],
            ),
            (
                "embedded",
                "Apr sshd is <down>\nDec sshd is upNov\nMar password accepted",
                vec!["Apr sshd is <down>", "Dec sshd is upNov"],
            ),
        ];

        for (name, input, expected) in cases {
            let (got, _) = delimit(input, 256);
            assert_eq!(got, expected, "case {name}");
        }
    }

    #[test]
    fn test_ascii_whitespace_and_boundaries() {
        let cases = [
            (
                "no-break space is not a separator",
                "Jan a\nFeb\u{a0}b\nMar ",
                vec!["Jan a\nFeb\u{a0}b"],
            ),
            (
                "vertical tab is not a separator",
                "Jan a\nFeb\x0bb\nMar ",
                vec!["Jan a\nFeb\x0bb"],
            ),
            (
                "marker glued to non-ascii letter",
                "caf\u{e9}Jan a\nFeb b\nMar ",
                vec!["Jan a", "Feb b"],
            ),
            ("tab separates", "Jan a\nFeb\tb\nMar ", vec!["Jan a", "Feb\tb"]),
        ];

        for (name, input, expected) in cases {
            let (got, _) = delimit(input, 256);
            assert_eq!(got, expected, "case {name}");
        }
    }

    #[test]
    fn test_mid_line_marker_does_not_split() {
        let (got, d) = delimit("Jan cron ran for Feb report\nMar ", 256);
        assert_eq!(got, vec!["Jan cron ran for Feb report"]);
        assert_eq!(d.state(), DelimiterState::Framing);
    }

    #[test]
    fn test_leading_noise_discarded_on_first_marker() {
        let mut d = Delimiter::new(256);
        for b in b"garbage\x00\x01 Jan " {
            assert!(d.push(*b).is_none());
        }
        assert_eq!(d.state(), DelimiterState::Framing);
        assert_eq!(d.buffered(), 4);
    }

    #[test]
    fn test_message_count_matches_line_starts() {
        let mut input = String::new();
        let lines = ["Jan a", "Feb b\n\tat frame", "Mar c", "Apr d with Jun inside", "May e"];
        for line in lines {
            input.push_str(line);
            input.push('\n');
        }
        let (got, d) = delimit(&input, 256);
        assert_eq!(got.len(), lines.len() - 1);
        assert_eq!(d.vestige().map(|m| m.text().into_owned()), Some("May e".to_string()));
    }

    #[test]
    fn test_vestige_table() {
        let cases = [
            ("vestige zero", "", None),
            ("vestige no match", "Ja\n", None),
            ("vestige match", "Oct ", Some("Oct ")),
            (
                "vestige rich match",
                "Dec OOM on line 42, dummy.java\n\tclass_loader.jar",
                Some("Dec OOM on line 42, dummy.java\n\tclass_loader.jar"),
            ),
            ("vestige trims line endings", "Nov done\r\n", Some("Nov done")),
        ];

        for (name, input, expected) in cases {
            let (_, d) = delimit(input, 256);
            let got = d.vestige().map(|m| m.text().into_owned());
            assert_eq!(got.as_deref(), expected, "case {name}");
        }
    }

    #[test]
    fn test_seeking_buffer_stays_bounded() {
        let mut d = Delimiter::new(MIN_MESSAGE_BYTES);
        for _ in 0..1000 {
            assert!(d.push(b'x').is_none());
        }
        assert!(d.buffered() <= MIN_MESSAGE_BYTES + 1);
        assert_eq!(d.state(), DelimiterState::Seeking);

        let mut got = Vec::new();
        for b in b" Jan a\nFeb " {
            got.extend(d.push(*b));
        }
        assert_eq!(got.len(), 1);
        assert_eq!(got[0], "Jan a");
    }

    #[test]
    fn test_overflow_truncates_then_resyncs() {
        let mut d = Delimiter::new(MIN_MESSAGE_BYTES);
        let mut got = Vec::new();
        let mut input = b"Jan ".to_vec();
        input.extend(std::iter::repeat(b'a').take(100));
        input.extend_from_slice(b"\nFeb ok\nMar ");
        for b in input {
            got.extend(d.push(b));
        }

        assert_eq!(d.truncated(), 1);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].len(), MIN_MESSAGE_BYTES);
        assert!(got[0].text().starts_with("Jan aaaa"));
        assert_eq!(got[1], "Feb ok");
        assert_eq!(d.vestige().map(|m| m.text().into_owned()), Some("Mar ".to_string()));
    }

    #[test]
    fn test_vestige_discarded_while_resyncing() {
        let mut d = Delimiter::new(MIN_MESSAGE_BYTES);
        for b in b"Jan " {
            d.push(*b);
        }
        let mut flushed = 0;
        for _ in 0..MIN_MESSAGE_BYTES {
            flushed += usize::from(d.push(b'z').is_some());
        }
        assert_eq!(flushed, 1);
        assert_eq!(d.state(), DelimiterState::Resyncing);
        assert!(d.vestige().is_none());
    }

    #[test]
    fn test_limit_is_clamped() {
        let d = Delimiter::new(1);
        assert_eq!(d.max_size, MIN_MESSAGE_BYTES);
    }

    #[test]
    fn test_trim_end() {
        assert_eq!(trim_end(b"abc\r\r", b"\r"), b"abc");
        assert_eq!(trim_end(b"\r\n", b"\r\n"), b"");
        assert_eq!(trim_end(b"a\nb", b"\r"), b"a\nb");
    }
}
