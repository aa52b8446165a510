//! Record-level cleaning stages: the short-trip filter and the total-fare
//! derivation.

use log::warn;
use rayon::prelude::*;

use crate::reject::{Outcomes, RecordError, Reject};
use crate::trip::{DerivedTrip, TripRecord};

/// Trips shorter than this many miles are discarded.
pub const MIN_TRIP_DISTANCE: f64 = 0.1;

/// Parse a numeric field. Surrounding whitespace is tolerated; anything
/// `f64` cannot read, including an empty value, rejects the record.
fn numeric_field(field: &'static str, value: &str) -> Result<f64, RecordError> {
    value.trim().parse::<f64>().map_err(|_| RecordError::NotNumeric {
        field,
        value: value.to_string(),
    })
}

/// Filter predicate: keep trips of at least [`MIN_TRIP_DISTANCE`] miles.
pub fn passes_distance_filter(trip: &TripRecord) -> Result<bool, RecordError> {
    Ok(numeric_field("trip_distance", &trip.trip_distance)? >= MIN_TRIP_DISTANCE)
}

/// Derive stage: total fare is fare plus tip. Carries the grouping keys and
/// the distance forward and drops every other column.
pub fn derive_total_fare(trip: &TripRecord) -> Result<DerivedTrip, RecordError> {
    let distance = numeric_field("trip_distance", &trip.trip_distance)?;
    let fare = numeric_field("fare_amount", &trip.fare_amount)?;
    let tip = numeric_field("tip_amount", &trip.tip_amount)?;
    Ok(DerivedTrip {
        pu_location_id: trip.pu_location_id.clone(),
        do_location_id: trip.do_location_id.clone(),
        trip_distance: distance,
        total_fare_amount: fare + tip,
    })
}

/// Output of [`filter_and_derive`]: the surviving derived trips, the rows
/// rejected over non-numeric fields, and how many parseable trips fell
/// under the distance cutoff (dropped by policy, not by error).
#[derive(Debug, Default)]
pub struct Transformed {
    pub derived: Outcomes<DerivedTrip>,
    pub filtered_short: u64,
}

/// Run filter and derive over the parsed stream in parallel.
///
/// Rejects keep their source line numbers and come back sorted by line.
/// Derived trip order is unspecified; nothing downstream depends on it.
pub fn filter_and_derive(parsed: Vec<(u64, TripRecord)>) -> Transformed {
    let mut out = parsed
        .into_par_iter()
        .fold(Transformed::default, |mut acc, (line, trip)| {
            let step = passes_distance_filter(&trip).and_then(|keep| {
                if keep {
                    derive_total_fare(&trip).map(Some)
                } else {
                    Ok(None)
                }
            });
            match step {
                Ok(Some(derived)) => acc.derived.valid.push(derived),
                Ok(None) => acc.filtered_short += 1,
                Err(error) => {
                    warn!("dropping line {line}: {error}");
                    acc.derived.rejected.push(Reject { line, error });
                }
            }
            acc
        })
        .reduce(Transformed::default, |mut a, mut b| {
            a.derived.valid.append(&mut b.derived.valid);
            a.derived.rejected.append(&mut b.derived.rejected);
            a.filtered_short += b.filtered_short;
            a
        });
    out.derived.rejected.sort_by_key(|reject| reject.line);
    out
}
