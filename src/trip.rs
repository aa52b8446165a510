//! Trip record types.
//!
//! Rows are mapped **by position** against the canonical 19-column layout of
//! a yellow-taxi trip export; the header line of the file itself is skipped
//! and never consulted. Every field stays text until the stage that needs a
//! number parses one, so a bad value only surfaces at the stage that reads
//! it.

use serde::Serialize;

/// Canonical column order of a trip export.
pub const TRIP_FIELDS: [&str; 19] = [
    "vendor_id",
    "pickup_datetime",
    "dropoff_datetime",
    "passenger_count",
    "trip_distance",
    "rate_code",
    "store_and_fwd_flag",
    "pu_location_id",
    "do_location_id",
    "payment_type",
    "fare_amount",
    "extra",
    "mta_tax",
    "tip_amount",
    "tolls_amount",
    "improvement_surcharge",
    "total_amount",
    "congestion_surcharge",
    "airport_fee",
];

/// One trip row, keyed by the canonical layout.
///
/// Field declaration order matches [`TRIP_FIELDS`]. Every field is plain
/// text; a column the row did not supply is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRecord {
    pub vendor_id: String,
    pub pickup_datetime: String,
    pub dropoff_datetime: String,
    pub passenger_count: String,
    pub trip_distance: String,
    pub rate_code: String,
    pub store_and_fwd_flag: String,
    pub pu_location_id: String,
    pub do_location_id: String,
    pub payment_type: String,
    pub fare_amount: String,
    pub extra: String,
    pub mta_tax: String,
    pub tip_amount: String,
    pub tolls_amount: String,
    pub improvement_surcharge: String,
    pub total_amount: String,
    pub congestion_surcharge: String,
    pub airport_fee: String,
}

impl TripRecord {
    /// Build a record from a raw CSV row against the canonical layout.
    ///
    /// A short row fills its missing trailing columns with empty strings,
    /// and columns past the layout are ignored, so the full field set is
    /// always present. A stage that needs a number out of an empty field
    /// rejects the record at that stage.
    pub fn from_record(record: &csv::StringRecord) -> Self {
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        Self {
            vendor_id: field(0),
            pickup_datetime: field(1),
            dropoff_datetime: field(2),
            passenger_count: field(3),
            trip_distance: field(4),
            rate_code: field(5),
            store_and_fwd_flag: field(6),
            pu_location_id: field(7),
            do_location_id: field(8),
            payment_type: field(9),
            fare_amount: field(10),
            extra: field(11),
            mta_tax: field(12),
            tip_amount: field(13),
            tolls_amount: field(14),
            improvement_surcharge: field(15),
            total_amount: field(16),
            congestion_surcharge: field(17),
            airport_fee: field(18),
        }
    }
}

/// A trip after the derive stage: the two grouping keys and the two measures
/// the aggregate views consume. Nothing downstream reads the other columns,
/// so they are dropped here.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTrip {
    pub pu_location_id: String,
    pub do_location_id: String,
    pub trip_distance: f64,
    /// Fare plus tip, the derived measure behind the pickup view.
    pub total_fare_amount: f64,
}
