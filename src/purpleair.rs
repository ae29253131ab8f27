//! PurpleAir `/json` records
//!
//! The PurpleAir listing returns `{"results": [...]}` where every record
//! carries the PM2.5 value as a string and a nested `Stats` JSON document
//! encoded as a string. These types mirror that layout and convert records
//! into [`SensorReading`] values.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AqiError, Result};
use crate::sensor::SensorReading;

/// Rolling averages embedded in a record's `Stats` string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Current value
    pub v: f64,
    /// 10 minute average
    #[serde(default)]
    pub v1: Option<f64>,
    /// Milliseconds since epoch
    #[serde(rename = "lastModified", default)]
    pub last_modified: i64,
}

impl Statistics {
    #[must_use]
    pub fn current(&self) -> f64 {
        self.v
    }

    #[must_use]
    pub fn avg_10_min(&self) -> f64 {
        self.v1.unwrap_or(self.v)
    }
}

/// One record of the PurpleAir sensor listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurpleAirSensor {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Label", default)]
    pub label: Option<String>,
    #[serde(rename = "DEVICE_LOCATIONTYPE", default)]
    pub location_type: Option<String>,
    #[serde(rename = "Lat", default)]
    pub lat: Option<f64>,
    #[serde(rename = "Lon", default)]
    pub lon: Option<f64>,
    /// Usually a string; numeric values are kept in their JSON text form
    #[serde(rename = "PM2_5Value", default, deserialize_with = "string_or_number")]
    pub pm2_5_value: Option<String>,
    /// Seconds since epoch
    #[serde(rename = "LastSeen", default)]
    pub last_seen: Option<i64>,
    #[serde(rename = "Stats", default)]
    pub stats: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        StringOrNumber::String(text) => text,
        StringOrNumber::Number(number) => number.to_string(),
    }))
}

/// Envelope returned by the listing endpoint
///
/// Records stay as raw JSON so a single malformed record can be skipped
/// without losing the rest of the listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorResults {
    pub results: Vec<serde_json::Value>,
}

impl PurpleAirSensor {
    fn last_seen_millis(&self) -> i64 {
        self.last_seen.map_or(0, |s| s.saturating_mul(1000))
    }

    /// `PM2_5Value` as a number, if present and numeric.
    #[must_use]
    pub fn raw_pm25(&self) -> Option<f64> {
        let raw = self.pm2_5_value.as_deref()?;
        match raw.trim().parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(
                    sensor_id = self.id,
                    "{}",
                    AqiError::invalid_field("PM2_5Value", raw)
                );
                None
            }
        }
    }

    /// Parsed `Stats`, falling back to statistics built from `PM2_5Value`.
    #[must_use]
    pub fn statistics(&self) -> Option<Statistics> {
        if let Some(stats) = self.stats.as_deref() {
            match serde_json::from_str::<Statistics>(stats) {
                Ok(statistics) => return Some(statistics),
                Err(err) => {
                    tracing::warn!(sensor_id = self.id, error = %err, "unreadable Stats field");
                }
            }
        }

        self.raw_pm25().map(|value| Statistics {
            v: value,
            v1: Some(value),
            last_modified: self.last_seen_millis(),
        })
    }

    /// 10 minute average, else the raw value, else absent.
    #[must_use]
    pub fn pm25(&self) -> Option<f64> {
        self.statistics().map(|s| s.avg_10_min())
    }

    /// Time of the last update in milliseconds: `Stats.lastModified`, else
    /// `LastSeen`, else `0`.
    #[must_use]
    pub fn last_modified_millis(&self) -> i64 {
        self.statistics()
            .map(|s| s.last_modified)
            .filter(|&millis| millis != 0)
            .unwrap_or_else(|| self.last_seen_millis())
    }

    /// Whether the record carries everything needed to show and rank it.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stats.is_some()
            && self.pm2_5_value.is_some()
            && self.lat.is_some()
            && self.lon.is_some()
    }

    #[must_use]
    pub fn to_reading(&self) -> SensorReading {
        SensorReading {
            id: self.id,
            name: self.label.clone(),
            latitude: self.lat,
            longitude: self.lon,
            pm25: self.pm25(),
            last_seen_seconds: Some(self.last_modified_millis() / 1000).filter(|&s| s != 0),
        }
    }
}

impl From<PurpleAirSensor> for SensorReading {
    fn from(sensor: PurpleAirSensor) -> Self {
        sensor.to_reading()
    }
}

/// Parse the full listing, keeping only complete records.
///
/// # Errors
///
/// * `AqiError::Json` - payload is not a valid listing
pub fn parse_sensor_results(json: &str) -> Result<Vec<SensorReading>> {
    let listing: SensorResults = serde_json::from_str(json)?;
    let total = listing.results.len();

    let sensors: Vec<SensorReading> = listing
        .results
        .into_iter()
        .filter_map(|record| {
            if record.is_null() {
                tracing::warn!("skipping null sensor record");
                return None;
            }
            match serde_json::from_value::<PurpleAirSensor>(record) {
                Ok(sensor) if sensor.is_complete() => Some(sensor.to_reading()),
                Ok(sensor) => {
                    tracing::warn!(sensor_id = sensor.id, "skipping incomplete sensor");
                    None
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed sensor record");
                    None
                }
            }
        })
        .collect();

    tracing::debug!(total, kept = sensors.len(), "parsed sensor listing");
    Ok(sensors)
}

/// Parse a single-sensor response and return the first complete record
/// matching `sensor_id`.
///
/// # Errors
///
/// * `AqiError::Json` - payload is not a valid listing
/// * `AqiError::SensorNotFound` - no complete record has that id
pub fn parse_sensor(json: &str, sensor_id: u32) -> Result<SensorReading> {
    parse_sensor_results(json)?
        .into_iter()
        .find(|sensor| sensor.id == sensor_id)
        .ok_or(AqiError::SensorNotFound(sensor_id))
}
