//! # Tripflow
//!
//! Batch aggregation of NYC yellow-taxi trip exports into a search index.
//!
//! A trip export is a CSV file with a fixed 19-column layout. One run reads
//! an export, drops trips shorter than a tenth of a mile, derives a total
//! fare (fare plus tip) per trip, computes two aggregate views, and writes
//! every aggregate as one JSON document to an Elasticsearch-compatible
//! index:
//!
//! - **per pickup zone**: the mean derived total fare
//! - **per dropoff zone**: the mean trip distance
//!
//! Record-level stages run in parallel with [rayon], and the two views are
//! reduced concurrently. A bad row never aborts a run: each stage splits
//! its output into a valid stream and a rejected stream
//! ([`reject::Outcomes`]), rejects are logged with their source line and
//! counted in the closing [`pipeline::RunReport`], and they can be written
//! out as a CSV report for inspection.
//!
//! ## Binary
//!
//! The `tripflow` binary wires the library into four subcommands:
//!
//! - `create-index` waits for the endpoint and provisions the index with
//!   its static schema (idempotent)
//! - `run` executes the pipeline over an export
//! - `read-index` prints indexed documents via a bounded match-all query
//! - `convert` rewrites a Parquet export as CSV (feature `io-parquet`)
//!
//! ## Quick start
//!
//! ```no_run
//! use tripflow::index::StdoutSink;
//! use tripflow::pipeline::{self, RunConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Dry run: documents go to stdout instead of an index.
//! let report = pipeline::run(&RunConfig::new("trips.csv"), &StdoutSink)?;
//! println!("{} documents written", report.documents_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! - `io-parquet` (default): Parquet-to-CSV conversion via `arrow` and
//!   `parquet`.

pub mod aggregate;
pub mod cli;
pub mod combine;
pub mod config;
pub mod index;
pub mod io;
pub mod pipeline;
pub mod reject;
pub mod transform;
pub mod trip;

pub use aggregate::{
    DropoffDistanceAggregate, PickupFareAggregate, average_distance_by_dropoff,
    average_fare_by_pickup,
};
pub use combine::{CombineFn, Mean, combine_by_key, combine_by_key_par};
pub use config::{IndexConfig, RetryPolicy, configure_thread_pool};
pub use index::{DocumentSink, IndexClient, StdoutSink};
pub use pipeline::{RunConfig, RunReport};
pub use reject::{Outcomes, RecordError, Reject};
pub use transform::{
    MIN_TRIP_DISTANCE, derive_total_fare, filter_and_derive, passes_distance_filter,
};
pub use trip::{DerivedTrip, TRIP_FIELDS, TripRecord};
