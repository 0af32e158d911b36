//! Model — IngestConfig.

use serde::{Deserialize, Serialize};

use crate::event::ReferenceZone;
use crate::parser::DEFAULT_FORMAT;

pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;
pub const DEFAULT_READ_BUFFER_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Format name or alias, resolved once at startup.
    pub format: String,
    /// Hard cap on a single framed message.
    pub max_message_bytes: usize,
    /// Zone assumed for timestamps that carry none.
    pub reference_zone: ReferenceZone,
    pub read_buffer_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            reference_zone: ReferenceZone::Utc,
            read_buffer_bytes: DEFAULT_READ_BUFFER_BYTES,
        }
    }
}
