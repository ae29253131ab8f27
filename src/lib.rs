//! PurpleAir AQI
//!
//! This crate turns PurpleAir sensor readings into EPA Air Quality Index
//! values and ranks sensors by distance from a reference point:
//! - PM2.5 to AQI conversion with category, color and progress fraction
//! - Nearest-first sensor ranking with per-call distance memoization
//! - PurpleAir `/json` listing parsing
//!
//! # Example
//!
//! ```rust
//! use purpleair_aqi::{
//!     AqiCategory, Coordinate, SensorReading, convert_pm25_to_aqi, rank_by_distance,
//! };
//!
//! let result = convert_pm25_to_aqi(12.0);
//! assert_eq!(result.aqi, 50);
//! assert_eq!(result.category, AqiCategory::Good);
//!
//! let mut sensors = vec![
//!     SensorReading::new(1).with_coordinate(38.5, -121.5),
//!     SensorReading::new(2),
//!     SensorReading::new(3).with_coordinate(37.81, -122.27),
//! ];
//! rank_by_distance(Coordinate::new(37.8044, -122.2712), &mut sensors);
//! let ids: Vec<u32> = sensors.iter().map(|s| s.id).collect();
//! assert_eq!(ids, vec![3, 1, 2]);
//! ```

pub mod aqi;
pub mod display;
pub mod distance;
pub mod error;
pub mod picker;
pub mod purpleair;
pub mod sensor;

pub use aqi::{
    AqiCategory, AqiResult, Color, color_for, convert_pm25_to_aqi, percentage, time_ago,
    validate_sensor,
};
pub use display::SensorSummary;
pub use distance::{DistanceCache, comparator, rank_by_distance};
pub use error::{AqiError, Result};
pub use picker::{PickerConfig, PickerEntry, prepare_picker_list};
pub use purpleair::{parse_sensor, parse_sensor_results};
pub use sensor::{Coordinate, SensorReading};

/// Validate a sensor and build its display summary
///
/// # Arguments
///
/// * `sensor` - Reading to summarize
/// * `now_seconds` - Current Unix time, used for the "time ago" text
///
/// # Returns
///
/// * `Ok(SensorSummary)` - Render-ready summary
/// * `Err(AqiError)` - Sensor has no usable data; show [`SensorSummary::placeholder`]
///
/// # Errors
///
/// * `AqiError::InvalidSensor` - PM2.5, coordinates and timestamp are all absent
pub fn summarize(sensor: SensorReading, now_seconds: i64) -> Result<SensorSummary> {
    let sensor = validate_sensor(sensor)?;
    Ok(SensorSummary::from_sensor(&sensor, now_seconds))
}
