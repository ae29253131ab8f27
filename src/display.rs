//! Render-ready summary of a sensor for the detail screen and complication

use serde::Serialize;

use crate::aqi::{AQI_MAX, AqiCategory, Color, NO_DATA, color_for, convert_pm25_to_aqi, time_ago};
use crate::sensor::SensorReading;

/// Everything a presentation layer needs to draw one sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSummary {
    pub title: String,
    pub aqi_text: String,
    pub category: Option<AqiCategory>,
    pub color: Option<Color>,
    /// Progress ring fill, 0..=100
    pub progress: f64,
    pub time_ago: String,
    /// Value for a ranged complication, capped at 500
    pub complication_value: u16,
}

impl SensorSummary {
    #[must_use]
    pub fn from_sensor(sensor: &SensorReading, now_seconds: i64) -> Self {
        let result = convert_pm25_to_aqi(sensor.pm25());

        Self {
            title: sensor.title(),
            aqi_text: result.aqi.to_string(),
            category: Some(result.category),
            color: Some(color_for(result.category)),
            progress: result.percentage * 100.0,
            time_ago: time_ago(sensor.last_seen_seconds, now_seconds),
            complication_value: result.aqi.min(AQI_MAX),
        }
    }

    /// Neutral "no data" state.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            title: String::new(),
            aqi_text: NO_DATA.to_string(),
            category: None,
            color: None,
            progress: 0.0,
            time_ago: NO_DATA.to_string(),
            complication_value: 0,
        }
    }

    /// Text like `"AQI 42 as of 5m ago"`
    #[must_use]
    pub fn description(&self) -> String {
        if self.category.is_none() {
            return NO_DATA.to_string();
        }
        format!("AQI {} as of {}", self.aqi_text, self.time_ago)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_sensor() {
        let sensor = SensorReading::new(1)
            .with_name("Rooftop")
            .with_pm25(35.4)
            .with_last_seen(1_000);
        let summary = SensorSummary::from_sensor(&sensor, 1_000 + 300);

        assert_eq!(summary.title, "Rooftop");
        assert_eq!(summary.aqi_text, "100");
        assert_eq!(summary.category, Some(AqiCategory::Moderate));
        assert_eq!(summary.color, Some(Color::rgb(255, 255, 0)));
        assert!((summary.progress - 100.0).abs() < 1e-9);
        assert_eq!(summary.time_ago, "5m ago");
        assert_eq!(summary.complication_value, 100);
        assert_eq!(summary.description(), "AQI 100 as of 5m ago");
    }

    #[test]
    fn test_summary_clamps_extremes() {
        let sensor = SensorReading::new(2).with_pm25(900.0);
        let summary = SensorSummary::from_sensor(&sensor, 0);
        assert_eq!(summary.title, "2");
        assert_eq!(summary.complication_value, 500);
        assert_eq!(summary.time_ago, "--");
    }

    #[test]
    fn test_placeholder() {
        let summary = SensorSummary::placeholder();
        assert_eq!(summary.aqi_text, "--");
        assert_eq!(summary.description(), "--");
        assert_eq!(summary.category, None);
    }
}
