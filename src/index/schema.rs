//! Static schema for the aggregate index.

use serde_json::{Value, json};

/// Index settings and mappings: one primary shard, no replicas, and typed
/// numeric fields covering both aggregate views. The schema is created once
/// and never altered; there is no versioning or migration step.
pub fn index_body() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0
        },
        "mappings": {
            "properties": {
                "pickup_location_id": { "type": "integer" },
                "dropoff_location_id": { "type": "integer" },
                "trip_distance": { "type": "float" },
                "total_fare_amount": { "type": "float" },
                "average_total_fare": { "type": "float" },
                "average_trip_distance": { "type": "float" }
            }
        }
    })
}
