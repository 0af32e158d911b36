pub use super::model::{EventKind, Fields, ParseError};

/// A compiled, stateless field extractor for one wire format.
///
/// Implementations are built once and shared read-only between streams.
pub trait FieldExtractor: Send + Sync {
    /// Extract the field mapping from one framed message.
    fn extract(&self, raw: &[u8]) -> Result<Fields, ParseError>;
    fn kind(&self) -> EventKind;
}
