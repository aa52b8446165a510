//! Per-record failure reporting.
//!
//! Stages never abort the run over a single bad row. Instead each stage
//! returns a per-record `Result`, and the driver splits the stream into a
//! `valid` half and a `rejected` half, so dropped rows stay countable and
//! inspectable rather than disappearing into the log.

use thiserror::Error;

/// Why a single record was dropped from the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The row could not be read at all, e.g. broken quoting or invalid
    /// encoding. Rows with too few or too many columns are not malformed;
    /// they map onto the canonical layout like any other row.
    #[error("malformed row: {0}")]
    Malformed(String),
    /// A field was present but did not parse as a number.
    #[error("field `{field}` is not numeric: {value:?}")]
    NotNumeric { field: &'static str, value: String },
}

/// A dropped record: the 1-based line it started on in the source file,
/// plus the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reject {
    pub line: u64,
    pub error: RecordError,
}

/// Split output of a per-record stage.
#[derive(Debug)]
pub struct Outcomes<T> {
    pub valid: Vec<T>,
    pub rejected: Vec<Reject>,
}

impl<T> Outcomes<T> {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl<T> Default for Outcomes<T> {
    fn default() -> Self {
        Self {
            valid: Vec::new(),
            rejected: Vec::new(),
        }
    }
}
