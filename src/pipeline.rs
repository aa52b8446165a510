//! The end-to-end run: read, filter, derive, aggregate, write.
//!
//! One call to [`run`] executes the whole transform over a single trip
//! export. Per-record problems are dropped and counted, never fatal; the
//! only hard failures are being unable to read the input at all or to
//! write the rejects report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;

use crate::aggregate::{average_distance_by_dropoff, average_fare_by_pickup};
use crate::index::DocumentSink;
use crate::io::csv::{read_trips, write_rejects};
use crate::transform::filter_and_derive;

/// Settings for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Trip export to read.
    pub input: PathBuf,
    /// Where to write the rejected-row report, if anywhere.
    pub rejects_out: Option<PathBuf>,
    /// Derive document ids from the grouping key instead of appending
    /// anonymous documents. Off by default: repeated runs then accumulate
    /// duplicate documents, which readback makes visible.
    pub deterministic_ids: bool,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            rejects_out: None,
            deterministic_ids: false,
        }
    }
}

/// Counters for one run. Logged as the closing summary and returned so
/// callers and tests can assert on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Data rows read from the input, header excluded.
    pub rows_read: u64,
    pub parsed: u64,
    pub rejected_parse: u64,
    /// Parseable trips under the distance cutoff, dropped by policy.
    pub filtered_short: u64,
    pub rejected_fields: u64,
    pub derived: u64,
    pub pickup_groups: u64,
    pub dropoff_groups: u64,
    pub documents_written: u64,
    pub write_failures: u64,
}

impl RunReport {
    /// Rows dropped with an error, across both stages.
    pub fn rejected_total(&self) -> u64 {
        self.rejected_parse + self.rejected_fields
    }
}

/// Execute the pipeline over `cfg.input`, writing every aggregate document
/// to `sink`.
pub fn run(cfg: &RunConfig, sink: &dyn DocumentSink) -> Result<RunReport> {
    info!("starting pipeline over {}", cfg.input.display());

    let parsed = read_trips(&cfg.input)?;
    let mut report = RunReport {
        rows_read: (parsed.valid.len() + parsed.rejected.len()) as u64,
        parsed: parsed.valid.len() as u64,
        rejected_parse: parsed.rejected.len() as u64,
        ..RunReport::default()
    };
    let mut rejects = parsed.rejected;

    let transformed = filter_and_derive(parsed.valid);
    report.filtered_short = transformed.filtered_short;
    report.rejected_fields = transformed.derived.rejected.len() as u64;
    report.derived = transformed.derived.valid.len() as u64;
    rejects.extend(transformed.derived.rejected);
    rejects.sort_by_key(|reject| reject.line);

    let derived = transformed.derived.valid;
    let (pickup, dropoff) = rayon::join(
        || average_fare_by_pickup(&derived),
        || average_distance_by_dropoff(&derived),
    );
    report.pickup_groups = pickup.len() as u64;
    report.dropoff_groups = dropoff.len() as u64;

    write_documents(
        sink,
        "pickup",
        &pickup,
        |agg| agg.pickup_location_id.as_str(),
        cfg.deterministic_ids,
        &mut report,
    )?;
    write_documents(
        sink,
        "dropoff",
        &dropoff,
        |agg| agg.dropoff_location_id.as_str(),
        cfg.deterministic_ids,
        &mut report,
    )?;

    if let Some(path) = &cfg.rejects_out {
        let written = write_rejects(path, &rejects)?;
        info!("wrote {written} rejected rows to {}", path.display());
    }

    info!(
        "pipeline finished: {} rows read, {} parsed, {} rejected ({} parse, {} field), \
         {} filtered short, {} derived, {} pickup groups, {} dropoff groups, \
         {} documents written, {} write failures",
        report.rows_read,
        report.parsed,
        report.rejected_total(),
        report.rejected_parse,
        report.rejected_fields,
        report.filtered_short,
        report.derived,
        report.pickup_groups,
        report.dropoff_groups,
        report.documents_written,
        report.write_failures,
    );
    Ok(report)
}

/// Write one view's documents. A failed write is logged and counted, and
/// the run moves on to the next document.
fn write_documents<T, F>(
    sink: &dyn DocumentSink,
    view: &str,
    docs: &[T],
    key_of: F,
    deterministic_ids: bool,
    report: &mut RunReport,
) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> &str,
{
    for doc in docs {
        let value = serde_json::to_value(doc).context("serialize aggregate document")?;
        let id = deterministic_ids.then(|| format!("{view}-{}", key_of(doc)));
        match sink.write(id.as_deref(), &value) {
            Ok(()) => {
                debug!("wrote {view} document for key {:?}", key_of(doc));
                report.documents_written += 1;
            }
            Err(err) => {
                warn!(
                    "dropping document for {view} key {:?}: {err:#}",
                    key_of(doc)
                );
                report.write_failures += 1;
            }
        }
    }
    Ok(())
}
