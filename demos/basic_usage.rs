//! Basic Usage Example for PurpleAir AQI
//!
//! Parses a small PurpleAir listing, ranks the sensors around a location and
//! prints the summary a watch face would render for each of them.
//!
//! Run with: cargo run --example basic_usage

use purpleair_aqi::{
    Coordinate, PickerConfig, SensorSummary, parse_sensor_results, prepare_picker_list, summarize,
};

const LISTING: &str = r#"{"results": [
    {"ID": 37149, "Label": "East Bay German International School", "Lat": 37.832604, "Lon": -122.278556,
     "PM2_5Value": "7.32", "LastSeen": 1598546748,
     "Stats": "{\"v\":7.32,\"v1\":5.91,\"lastModified\":1598546748230}"},
    {"ID": 2, "Label": "Lake Merritt", "Lat": 37.8027, "Lon": -122.2566,
     "PM2_5Value": "41.0", "LastSeen": 1598543148, "Stats": "{\"v\":41.0,\"v1\":39.5}"},
    {"ID": 3, "Label": "Indoor sensor", "PM2_5Value": "2.0"}
]}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("PurpleAir AQI - Basic Usage Example\n");

    let here = Coordinate::new(37.8044, -122.2712);
    let now = 1_598_547_000;

    let sensors = parse_sensor_results(LISTING)?;
    println!("Parsed {} complete sensors", sensors.len());

    let config = PickerConfig {
        selected_sensor_id: Some(37149),
        ..PickerConfig::default()
    };

    for entry in prepare_picker_list(here, sensors, &config) {
        let marker = if entry.selected { "*" } else { " " };
        let summary = summarize(entry.sensor, now).unwrap_or_else(|err| {
            println!("  {err}");
            SensorSummary::placeholder()
        });
        let color = summary.color.map_or_else(|| "--".to_string(), |c| c.to_hex());
        println!(
            "{marker} {:<40} AQI {:>3} ({color}) {}",
            summary.title, summary.aqi_text, summary.time_ago
        );
    }

    Ok(())
}
