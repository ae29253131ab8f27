//! Error types for AQI conversion and sensor parsing

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, AqiError>;

/// Errors that can occur while validating or parsing sensor data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AqiError {
    /// Sensor carries no PM2.5 value, no coordinates and no timestamp
    #[error("Invalid sensor data: sensor {0} has no usable readings")]
    InvalidSensor(u32),

    /// Payload is not valid JSON or does not match the expected layout
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// A field was present but could not be interpreted
    #[error("Invalid data values: {0}")]
    InvalidData(String),

    /// Requested sensor is not part of the payload
    #[error("Sensor not found: {0}")]
    SensorNotFound(u32),
}

impl AqiError {
    /// Create a new `InvalidData` error for a specific field
    #[must_use]
    pub fn invalid_field(field: &str, value: &str) -> Self {
        Self::InvalidData(format!("Invalid {field} value: {value}"))
    }
}

impl From<serde_json::Error> for AqiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AqiError::InvalidSensor(37149);
        assert_eq!(
            err.to_string(),
            "Invalid sensor data: sensor 37149 has no usable readings"
        );

        let err = AqiError::invalid_field("PM2_5Value", "n/a");
        assert_eq!(
            err.to_string(),
            "Invalid data values: Invalid PM2_5Value value: n/a"
        );

        let err = AqiError::SensorNotFound(7);
        assert_eq!(err.to_string(), "Sensor not found: 7");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: AqiError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AqiError::Json(_)));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(AqiError::InvalidSensor(5), AqiError::InvalidSensor(5));
        assert_ne!(AqiError::InvalidSensor(5), AqiError::InvalidSensor(6));
    }
}
