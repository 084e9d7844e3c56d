//! Derived alert views over a SafetyNet data snapshot.
//!
//! Everything here is pure: callers hand in a [`DataSnapshot`] and a reference date and
//! get response DTOs back. Loading and saving the document belongs to the store.

use safetynet_core::{AlertsError, DataSnapshot};
use serde::Deserialize;
use serde_json::Value;

pub mod household;
pub mod join;
pub mod views;

pub use household::{extract_children, fetch_households, household_key};
pub use join::{combine, match_record, persons_by_addresses, records_for};
pub use views::{
    child_alert, community_email, count_adults_and_children, fire_by_address, flood_stations,
    person_info, phone_alert, station_addresses, station_coverage, station_for_address,
};

/// Parse a data document from a JSON string.
pub fn parse_snapshot_str(document: &str) -> Result<DataSnapshot, AlertsError> {
    let value: Value =
        serde_json::from_str(document).map_err(|err| AlertsError::Parse(err.to_string()))?;
    parse_snapshot_value(&value)
}

/// Parse a data document from a `serde_json::Value`.
pub fn parse_snapshot_value(document: &Value) -> Result<DataSnapshot, AlertsError> {
    if !document.is_object() {
        return Err(AlertsError::Parse(format!(
            "Expected a JSON object with persons, firestations and medicalrecords, received {}",
            kind_of(document)
        )));
    }

    DataSnapshot::deserialize(document).map_err(|err| AlertsError::Parse(err.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
