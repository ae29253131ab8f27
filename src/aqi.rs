//! PM2.5 to EPA Air Quality Index conversion
//!
//! Breakpoints follow the EPA PM2.5 table used by AirNow before the 2024
//! revision. Concentrations are truncated to one decimal place before lookup,
//! matching the EPA reporting rule, so values between two bands resolve to
//! the lower one.

use serde::{Deserialize, Serialize};

use crate::error::{AqiError, Result};
use crate::sensor::SensorReading;

/// Highest index value on the scale
pub const AQI_MAX: u16 = 500;

/// Placeholder shown when there is nothing to render
pub const NO_DATA: &str = "--";

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// EPA health category for an index value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Index range `(low, high)` covered by this category
    #[must_use]
    pub fn index_range(self) -> (u16, u16) {
        let band = &BREAKPOINTS[self as usize];
        (band.index_low, band.index_high)
    }

    /// Human readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

/// One row of the breakpoint table
#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    concentration_low: f64,
    concentration_high: f64,
    index_low: u16,
    index_high: u16,
    category: AqiCategory,
}

const fn band(
    concentration_low: f64,
    concentration_high: f64,
    index_low: u16,
    index_high: u16,
    category: AqiCategory,
) -> Breakpoint {
    Breakpoint {
        concentration_low,
        concentration_high,
        index_low,
        index_high,
        category,
    }
}

// Ordered by concentration; indexed by `AqiCategory as usize`.
const BREAKPOINTS: [Breakpoint; 6] = [
    band(0.0, 12.0, 0, 50, AqiCategory::Good),
    band(12.1, 35.4, 51, 100, AqiCategory::Moderate),
    band(35.5, 55.4, 101, 150, AqiCategory::UnhealthyForSensitiveGroups),
    band(55.5, 150.4, 151, 200, AqiCategory::Unhealthy),
    band(150.5, 250.4, 201, 300, AqiCategory::VeryUnhealthy),
    band(250.5, 500.4, 301, 500, AqiCategory::Hazardous),
];

/// Converted index for a single concentration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AqiResult {
    /// Index value, 0..=500
    pub aqi: u16,
    /// Category the index falls in
    pub category: AqiCategory,
    /// Position of `aqi` within the category's index range, 0.0..=1.0
    pub percentage: f64,
}

/// RGB color used to render a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0xAARRGGBB` value with full opacity
    #[must_use]
    pub fn argb(self) -> u32 {
        0xFF00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// `#rrggbb` hex notation
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Convert a PM2.5 concentration (μg/m³) to an AQI result.
///
/// Negative and `NaN` inputs are treated as `0.0`. Concentrations above the
/// top breakpoint clamp to 500 / Hazardous. This never fails.
///
/// # Example
///
/// ```rust
/// use purpleair_aqi::aqi::{convert_pm25_to_aqi, AqiCategory};
///
/// let result = convert_pm25_to_aqi(35.4);
/// assert_eq!(result.aqi, 100);
/// assert_eq!(result.category, AqiCategory::Moderate);
/// ```
#[must_use]
pub fn convert_pm25_to_aqi(pm25: f64) -> AqiResult {
    // f64::max discards NaN
    let concentration = truncate_to_tenth(pm25.max(0.0));

    let Some(band) = BREAKPOINTS
        .iter()
        .find(|band| concentration <= band.concentration_high)
    else {
        return finish(AQI_MAX, AqiCategory::Hazardous);
    };

    let slope = f64::from(band.index_high - band.index_low)
        / (band.concentration_high - band.concentration_low);
    let value = slope * (concentration - band.concentration_low) + f64::from(band.index_low);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let aqi = (value.round() as u16).clamp(band.index_low, band.index_high);

    finish(aqi, band.category)
}

fn finish(aqi: u16, category: AqiCategory) -> AqiResult {
    let mut result = AqiResult {
        aqi,
        category,
        percentage: 0.0,
    };
    result.percentage = percentage(&result);
    result
}

fn truncate_to_tenth(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Nudge so that e.g. 35.4 * 10 = 353.99999.. still truncates to 354
    ((value * 10.0) + 1e-9).floor() / 10.0
}

/// Fraction of the way `result.aqi` is through its category's index range.
#[must_use]
pub fn percentage(result: &AqiResult) -> f64 {
    let (low, high) = result.category.index_range();
    let span = f64::from(high - low);
    (f64::from(result.aqi.saturating_sub(low)) / span).clamp(0.0, 1.0)
}

/// Standard EPA color for a category.
#[must_use]
pub fn color_for(category: AqiCategory) -> Color {
    match category {
        AqiCategory::Good => Color::rgb(0, 228, 0),
        AqiCategory::Moderate => Color::rgb(255, 255, 0),
        AqiCategory::UnhealthyForSensitiveGroups => Color::rgb(255, 126, 0),
        AqiCategory::Unhealthy => Color::rgb(255, 0, 0),
        AqiCategory::VeryUnhealthy => Color::rgb(143, 63, 151),
        AqiCategory::Hazardous => Color::rgb(126, 0, 35),
    }
}

/// Relative time text such as `"5m ago"`, `"3h ago"` or `"2d ago"`.
///
/// Returns [`NO_DATA`] when the timestamp is absent or zero. Timestamps in
/// the future read as `"0m ago"`.
#[must_use]
pub fn time_ago(timestamp_seconds: Option<i64>, now_seconds: i64) -> String {
    let Some(timestamp) = timestamp_seconds.filter(|&t| t != 0) else {
        return NO_DATA.to_string();
    };

    let elapsed = now_seconds.saturating_sub(timestamp).max(0);
    if elapsed < SECONDS_PER_HOUR {
        format!("{}m ago", elapsed / SECONDS_PER_MINUTE)
    } else if elapsed < SECONDS_PER_DAY {
        format!("{}h ago", elapsed / SECONDS_PER_HOUR)
    } else {
        format!("{}d ago", elapsed / SECONDS_PER_DAY)
    }
}

/// Pass a sensor through unless it has no usable data at all.
///
/// # Errors
///
/// * `AqiError::InvalidSensor` - PM2.5, coordinates and timestamp are all absent
#[doc(alias = "throw_if_invalid")]
pub fn validate_sensor(sensor: SensorReading) -> Result<SensorReading> {
    tracing::trace!(sensor_id = sensor.id, "validating sensor");

    let has_pm25 = sensor.pm25.is_some_and(f64::is_finite);
    let has_coordinate = sensor.coordinate().is_some();
    let has_timestamp = sensor.last_seen_seconds.is_some_and(|t| t != 0);

    if has_pm25 || has_coordinate || has_timestamp {
        Ok(sensor)
    } else {
        Err(AqiError::InvalidSensor(sensor.id))
    }
}
