//! Columnar-export conversion: rewrite a Parquet trip export as CSV.
//!
//! The conversion is a plain format change. Every column and row comes
//! across as-is, with a header row in front, so the output can be fed
//! straight to the pipeline's CSV reader. The whole file is materialized in
//! memory first; exports are sized for that.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

/// Read `input` fully and rewrite it as header-bearing CSV at `output`.
/// Returns the number of data rows written.
pub fn convert_parquet_to_csv(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<u64> {
    let input = input.as_ref();
    let output = output.as_ref();

    let file = File::open(input).with_context(|| format!("open {}", input.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("open ParquetRecordBatchReader")?;
    let schema = builder.schema().clone();
    let reader = builder
        .with_batch_size(64 * 1024)
        .build()
        .context("build ParquetRecordBatchReader")?;

    let batches: Vec<RecordBatch> = reader
        .collect::<Result<Vec<_>, _>>()
        .context("read parquet batches")?;

    let out = File::create(output).with_context(|| format!("create {}", output.display()))?;
    let mut writer = arrow::csv::WriterBuilder::new().with_header(true).build(out);

    // The CSV writer only emits the header alongside data, so an empty
    // export still needs one zero-row batch to produce a header line.
    if batches.is_empty() {
        writer
            .write(&RecordBatch::new_empty(schema))
            .context("write CSV header")?;
        return Ok(0);
    }

    let mut rows: u64 = 0;
    for batch in &batches {
        writer
            .write(batch)
            .with_context(|| format!("write {} rows to {}", batch.num_rows(), output.display()))?;
        rows += batch.num_rows() as u64;
    }
    Ok(rows)
}
