//! Conf module — ingest configuration model and loading.

pub mod model;
pub mod load;

pub use model::IngestConfig;
pub use load::ConfigError;
