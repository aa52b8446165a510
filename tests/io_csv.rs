mod common;

use std::fs;

use common::{TRIP_HEADER, csv_row};
use tripflow::io::csv::{read_trips, write_rejects};
use tripflow::reject::{RecordError, Reject};

#[test]
fn reads_rows_positionally_and_skips_header() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("trips.csv");
    fs::write(
        &path,
        format!(
            "{TRIP_HEADER}\n{}\n{}\n",
            csv_row("1.2", "10.0", "2.0", "138", "230"),
            csv_row("0.4", "5.0", "0.0", "7", "7"),
        ),
    )?;

    let out = read_trips(&path)?;
    assert!(out.is_clean());
    assert_eq!(out.valid.len(), 2);

    let (line, first) = &out.valid[0];
    assert_eq!(*line, 2);
    assert_eq!(first.trip_distance, "1.2");
    assert_eq!(first.pu_location_id, "138");
    assert_eq!(first.do_location_id, "230");
    assert_eq!(first.airport_fee, "0.0");

    let (line, second) = &out.valid[1];
    assert_eq!(*line, 3);
    assert_eq!(second.fare_amount, "5.0");
    Ok(())
}

#[test]
fn short_rows_parse_with_empty_trailing_fields() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("trips.csv");
    // Only the first five columns, through trip_distance.
    fs::write(
        &path,
        format!("{TRIP_HEADER}\n2,2024-01-01 00:01:00,2024-01-01 00:15:00,1,1.2\n"),
    )?;

    let out = read_trips(&path)?;
    assert!(out.is_clean());
    assert_eq!(out.valid.len(), 1);

    let (_, trip) = &out.valid[0];
    assert_eq!(trip.trip_distance, "1.2");
    assert_eq!(trip.pu_location_id, "");
    assert_eq!(trip.fare_amount, "");
    assert_eq!(trip.airport_fee, "");
    Ok(())
}

#[test]
fn extra_columns_are_ignored() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("trips.csv");
    fs::write(
        &path,
        format!(
            "{TRIP_HEADER}\n{},surplus,surplus\n",
            csv_row("1.2", "10.0", "2.0", "138", "230"),
        ),
    )?;

    let out = read_trips(&path)?;
    assert!(out.is_clean());
    assert_eq!(out.valid.len(), 1);
    let (_, trip) = &out.valid[0];
    assert_eq!(trip.airport_fee, "0.0");
    Ok(())
}

#[test]
fn undecodable_rows_land_in_rejected_stream() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("trips.csv");
    let mut contents = format!(
        "{TRIP_HEADER}\n{}\n",
        csv_row("1.2", "10.0", "2.0", "138", "230")
    )
    .into_bytes();
    // Invalid UTF-8 in the vendor column.
    contents.extend_from_slice(
        b"\xff\xfe,2024-01-01,2024-01-01,1,1.0,1,N,9,9,1,5.0,0,0,1.0,0,0,0,0,0\n",
    );
    contents.extend_from_slice(format!("{}\n", csv_row("0.4", "5.0", "0.0", "7", "7")).as_bytes());
    fs::write(&path, contents)?;

    let out = read_trips(&path)?;
    assert_eq!(out.valid.len(), 2);
    assert_eq!(out.rejected.len(), 1);

    let Reject { line, error } = &out.rejected[0];
    assert_eq!(*line, 3);
    assert!(matches!(error, RecordError::Malformed(_)));
    Ok(())
}

#[test]
fn quoted_commas_stay_inside_fields() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("trips.csv");
    let row = "2,\"Jan 1, 2024 00:01\",2024-01-01 00:15:00,1,1.5,1,N,10,20,1,\
               5.0,0.5,0.5,1.0,0.0,0.3,0.0,2.5,0.0";
    fs::write(&path, format!("{TRIP_HEADER}\n{row}\n"))?;

    let out = read_trips(&path)?;
    assert!(out.is_clean());
    let (_, trip) = &out.valid[0];
    assert_eq!(trip.pickup_datetime, "Jan 1, 2024 00:01");
    assert_eq!(trip.trip_distance, "1.5");
    Ok(())
}

#[test]
fn header_only_file_yields_nothing() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("trips.csv");
    fs::write(&path, format!("{TRIP_HEADER}\n"))?;

    let out = read_trips(&path)?;
    assert!(out.valid.is_empty());
    assert!(out.rejected.is_empty());
    Ok(())
}

#[test]
fn empty_file_yields_nothing() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("trips.csv");
    fs::write(&path, "")?;

    let out = read_trips(&path)?;
    assert!(out.valid.is_empty());
    assert!(out.rejected.is_empty());
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    let err = read_trips("does-not-exist.csv").unwrap_err();
    assert!(err.to_string().contains("does-not-exist.csv"));
}

#[test]
fn write_rejects_produces_line_error_csv() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("reports").join("rejects.csv");
    let rejects = vec![
        Reject {
            line: 3,
            error: RecordError::Malformed("invalid utf-8".into()),
        },
        Reject {
            line: 9,
            error: RecordError::NotNumeric {
                field: "tip_amount",
                value: "x".into(),
            },
        },
    ];

    let written = write_rejects(&path, &rejects)?;
    assert_eq!(written, 2);

    let contents = fs::read_to_string(&path)?;
    assert!(contents.starts_with("line,error"));
    assert!(contents.contains("3,malformed row: invalid utf-8"));
    assert!(contents.contains("field `tip_amount` is not numeric"));
    Ok(())
}
