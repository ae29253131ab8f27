//! Building the nearby-sensor list shown in the picker

use serde::{Deserialize, Serialize};

use crate::distance::rank_by_distance;
use crate::sensor::{Coordinate, SensorReading};

/// Default cap on the number of sensors offered
pub const DEFAULT_MAX_SENSORS: usize = 100;

/// Picker list options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Maximum number of sensors in the list
    pub max_sensors: usize,
    /// Sensor the user picked previously, pinned to the top when present
    pub selected_sensor_id: Option<u32>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_sensors: DEFAULT_MAX_SENSORS,
            selected_sensor_id: None,
        }
    }
}

/// A sensor row in the picker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerEntry {
    pub sensor: SensorReading,
    pub selected: bool,
}

/// Rank `sensors` by distance, cap the list and pin the selected sensor first.
#[must_use]
pub fn prepare_picker_list(
    reference: Coordinate,
    mut sensors: Vec<SensorReading>,
    config: &PickerConfig,
) -> Vec<PickerEntry> {
    rank_by_distance(reference, &mut sensors);
    sensors.truncate(config.max_sensors);

    let mut entries: Vec<PickerEntry> = sensors
        .into_iter()
        .map(|sensor| PickerEntry {
            selected: config.selected_sensor_id == Some(sensor.id),
            sensor,
        })
        .collect();

    // Stable, so the rest stays in distance order
    entries.sort_by_key(|entry| !entry.selected);
    entries
}
