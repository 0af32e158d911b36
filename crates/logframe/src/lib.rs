// Module layout for logframe: byte stream → messages → events → documents.

// Core pipeline stages
pub mod delimiter;
pub mod parser;
pub mod event;
pub mod document;
pub mod pipeline;

// Process plumbing
pub mod conf;
pub mod runtime;
