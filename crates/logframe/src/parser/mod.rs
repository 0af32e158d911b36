/// Field extraction for framed log messages
///
/// # Architecture
///
/// - `traits.rs`: the `FieldExtractor` seam every format implements
/// - `formats/`: individual format extractors
/// - `registry.rs`: name/alias → compiled format, built once per process
/// - `handle.rs`: per-stream `Parser` bound to one format
/// - `metrics.rs`: parsed/unparsed counters per format
///
/// Format names are resolved when a parser is built, never while parsing.

pub mod traits;
pub mod formats;
pub mod registry;
pub mod metrics;
pub mod model;
mod handle;

// Re-export commonly used types
pub use traits::FieldExtractor;
pub use model::{EventKind, FieldError, FieldValue, Fields, ParseError};
pub use registry::{FormatRegistry, FormatSpec};
pub use handle::Parser;

/// Format used when none is configured.
pub const DEFAULT_FORMAT: &str = "syslog";
