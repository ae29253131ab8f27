//! Sensor reading and coordinate types consumed by the converter and ranker

use serde::{Deserialize, Serialize};

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside the valid degree ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One sensor observation as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Unique sensor identifier
    pub id: u32,
    /// Display label
    pub name: Option<String>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// PM2.5 in μg/m³, `None` when the source had neither an average nor a raw value
    pub pm25: Option<f64>,
    /// Unix timestamp (seconds) of the last observation
    pub last_seen_seconds: Option<i64>,
}

impl SensorReading {
    /// Create a reading with only an id; the remaining fields start absent.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: None,
            latitude: None,
            longitude: None,
            pm25: None,
            last_seen_seconds: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_coordinate(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn with_pm25(mut self, pm25: f64) -> Self {
        self.pm25 = Some(pm25);
        self
    }

    #[must_use]
    pub fn with_last_seen(mut self, seconds: i64) -> Self {
        self.last_seen_seconds = Some(seconds);
        self
    }

    /// Resolved PM2.5 concentration, `0.0` when absent.
    #[must_use]
    pub fn pm25(&self) -> f64 {
        self.pm25.unwrap_or(0.0)
    }

    /// The sensor position, if both components are present and valid.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let coordinate = Coordinate::new(self.latitude?, self.longitude?);
        coordinate.is_valid().then_some(coordinate)
    }

    /// Label to show for this sensor: its name, or the id when unnamed.
    #[must_use]
    pub fn title(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}
