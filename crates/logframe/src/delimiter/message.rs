use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

/// A framed log message as cut from the stream. May span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(Bytes);

impl Message {
    pub(crate) fn new(raw: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(raw))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Text view; invalid UTF-8 is replaced, the raw bytes are untouched.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl PartialEq<str> for Message {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Message {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
