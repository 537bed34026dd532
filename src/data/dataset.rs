//! Marker dataset parsing
//!
//! The dataset is a JSON array of `{ "lat": number, "lng": number, "n": string }`
//! objects. Records are validated one by one so that a single malformed entry
//! is rejected and reported without losing the rest of the file.

use crate::{core::geo::LatLng, MapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One entry of the marker dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub lat: f64,
    pub lng: f64,
    /// Display name
    #[serde(rename = "n", default)]
    pub name: String,
}

impl MarkerRecord {
    pub fn new(lat_lng: LatLng, name: impl Into<String>) -> Self {
        Self {
            lat: lat_lng.lat,
            lng: lat_lng.lng,
            name: name.into(),
        }
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Why a single record was rejected
#[derive(Debug, Clone, PartialEq)]
pub struct RecordError {
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record #{}: {}", self.index, self.reason)
    }
}

impl From<RecordError> for MapError {
    fn from(err: RecordError) -> Self {
        MapError::InvalidRecord {
            index: err.index,
            reason: err.reason,
        }
    }
}

/// Outcome of parsing a dataset: the usable records plus the rejected ones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetLoad {
    pub records: Vec<MarkerRecord>,
    pub rejected: Vec<RecordError>,
}

/// Parses a dataset document.
///
/// Fails only when the document itself is unusable (invalid JSON or not an
/// array); bad elements end up in [`DatasetLoad::rejected`].
pub fn parse_dataset(json: &str) -> Result<DatasetLoad> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| MapError::DataLoad(format!("invalid dataset JSON: {}", e)))?;

    let Value::Array(items) = document else {
        return Err(MapError::DataLoad(
            "dataset must be a JSON array of marker records".to_string(),
        ));
    };

    let mut load = DatasetLoad::default();
    for (index, item) in items.iter().enumerate() {
        match parse_record(index, item) {
            Ok(record) => load.records.push(record),
            Err(err) => {
                log::warn!("rejected marker {}", err);
                load.rejected.push(err);
            }
        }
    }

    log::debug!(
        "parsed dataset: {} records, {} rejected",
        load.records.len(),
        load.rejected.len()
    );
    Ok(load)
}

fn parse_record(index: usize, item: &Value) -> std::result::Result<MarkerRecord, RecordError> {
    let reject = |reason: String| RecordError { index, reason };

    let Value::Object(fields) = item else {
        return Err(reject(format!("expected an object, got {}", item)));
    };

    let coordinate = |key: &str| -> std::result::Result<f64, RecordError> {
        match fields.get(key) {
            None | Some(Value::Null) => Err(reject(format!("missing `{}`", key))),
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| reject(format!("`{}` is not a finite number", key))),
            Some(other) => Err(reject(format!("`{}` is not a number: {}", key, other))),
        }
    };

    let lat = coordinate("lat")?;
    let lng = coordinate("lng")?;
    let name = match fields.get("n") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(MarkerRecord { lat, lng, name })
}
