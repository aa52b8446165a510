//! Document-index integration: the REST client, the static index schema,
//! and the sink seam the pipeline writes documents through.

pub mod client;
pub mod schema;

use anyhow::Result;
use serde_json::Value;

pub use client::{IndexClient, extract_sources};

/// Destination for aggregate documents.
///
/// The pipeline writes one document at a time and treats each write as
/// independent; implementations decide what a write means (an HTTP index
/// call, a line on stdout, a test capture).
pub trait DocumentSink {
    fn write(&self, id: Option<&str>, document: &Value) -> Result<()>;
}

/// Prints each document as one JSON line instead of indexing it. Backs the
/// pipeline's dry-run mode.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl DocumentSink for StdoutSink {
    fn write(&self, _id: Option<&str>, document: &Value) -> Result<()> {
        println!("{document}");
        Ok(())
    }
}
