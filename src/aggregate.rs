//! The two aggregate views computed from the derived stream.
//!
//! Each view is an independent reduce-by-key over the same input: one keyed
//! by pickup zone averaging the derived total fare, one keyed by dropoff
//! zone averaging the trip distance. Grouping keys are the location ids
//! exactly as they appeared in the source, so an empty cell groups under the
//! empty-string key instead of vanishing.

use serde::{Deserialize, Serialize};

use crate::combine::{Mean, combine_by_key_par};
use crate::trip::DerivedTrip;

/// Mean derived total fare over all trips departing from one pickup zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupFareAggregate {
    pub pickup_location_id: String,
    pub average_total_fare: f64,
}

/// Mean trip distance over all trips ending in one dropoff zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropoffDistanceAggregate {
    pub dropoff_location_id: String,
    pub average_trip_distance: f64,
}

/// One aggregate per distinct pickup zone seen in `trips`.
pub fn average_fare_by_pickup(trips: &[DerivedTrip]) -> Vec<PickupFareAggregate> {
    let pairs: Vec<(String, f64)> = trips
        .iter()
        .map(|trip| (trip.pu_location_id.clone(), trip.total_fare_amount))
        .collect();
    combine_by_key_par(pairs, &Mean)
        .into_iter()
        .map(|(pickup_location_id, average_total_fare)| PickupFareAggregate {
            pickup_location_id,
            average_total_fare,
        })
        .collect()
}

/// One aggregate per distinct dropoff zone seen in `trips`.
pub fn average_distance_by_dropoff(trips: &[DerivedTrip]) -> Vec<DropoffDistanceAggregate> {
    let pairs: Vec<(String, f64)> = trips
        .iter()
        .map(|trip| (trip.do_location_id.clone(), trip.trip_distance))
        .collect();
    combine_by_key_par(pairs, &Mean)
        .into_iter()
        .map(|(dropoff_location_id, average_trip_distance)| DropoffDistanceAggregate {
            dropoff_location_id,
            average_trip_distance,
        })
        .collect()
}
