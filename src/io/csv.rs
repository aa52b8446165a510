//! CSV ingestion for trip exports, plus the rejected-row report writer.
//!
//! Reading is row-tolerant: short rows carry empty trailing fields, extra
//! columns are ignored, and a row the reader cannot decode at all (broken
//! quoting, invalid encoding) lands in the rejected stream with its source
//! line number instead of failing the run. Only opening the file itself is
//! fatal.

use std::fs::{File, create_dir_all};
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use log::warn;
use serde::Serialize;

use crate::reject::{Outcomes, RecordError, Reject};
use crate::trip::TripRecord;

/// Read a trip export, skipping its header line and mapping every following
/// row by position into a [`TripRecord`].
///
/// Valid records carry the 1-based line they started on, so later stages
/// can report rejects against the source file. The first line is discarded
/// without being interpreted.
pub fn read_trips(path: impl AsRef<Path>) -> Result<Outcomes<(u64, TripRecord)>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut out = Outcomes::default();
    for (idx, row) in rdr.records().enumerate() {
        // The first row is the export's own header. Field names come from
        // the canonical layout, not the file, so it is skipped unread.
        if idx == 0 {
            continue;
        }
        match row {
            Ok(record) => {
                let line = record.position().map_or(idx as u64 + 1, |pos| pos.line());
                out.valid.push((line, TripRecord::from_record(&record)));
            }
            Err(err) => {
                let line = err.position().map_or(idx as u64 + 1, |pos| pos.line());
                warn!("dropping line {line}: {err}");
                out.rejected.push(Reject {
                    line,
                    error: RecordError::Malformed(err.to_string()),
                });
            }
        }
    }
    Ok(out)
}

#[derive(Serialize)]
struct RejectRow {
    line: u64,
    error: String,
}

/// Write the rejected stream as a two-column CSV (`line,error`), creating
/// parent directories as needed. Returns the number of rows written.
pub fn write_rejects(path: impl AsRef<Path>, rejects: &[Reject]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for reject in rejects {
        wtr.serialize(RejectRow {
            line: reject.line,
            error: reject.error.to_string(),
        })
        .with_context(|| format!("write reject for line {}", reject.line))?;
    }
    wtr.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(rejects.len())
}
