//! Runtime module — process lifecycle: boot, ingest loop, sinks, serve.

pub mod boot;
pub mod ingest;
pub mod sink;
pub mod serve;

pub use ingest::{ingest, DocumentSink, PipelineError};
pub use sink::{ChannelSink, JsonLinesSink};
