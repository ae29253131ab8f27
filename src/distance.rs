//! Ranking sensors by great-circle distance from a reference point

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::sensor::{Coordinate, SensorReading};

/// Mean earth radius in metres
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distance assigned to sensors whose coordinates cannot be used
pub const UNKNOWN_DISTANCE: f64 = f64::MAX;

/// Haversine distance in metres between two coordinates.
#[must_use]
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_METERS * c
}

/// Distances from one reference point, memoized by sensor id.
///
/// A cache belongs to a single ranking call. Build a new one for every
/// reference point or sensor collection. Each entry remembers the position it
/// was computed for; a reading that reuses an id with a different position is
/// computed on its own and never served the other reading's distance.
#[derive(Debug)]
pub struct DistanceCache {
    reference: Coordinate,
    distances: HashMap<u32, (PositionKey, f64)>,
    computations: usize,
}

/// Bit patterns of the raw latitude and longitude
type PositionKey = (Option<u64>, Option<u64>);

fn position_key(sensor: &SensorReading) -> PositionKey {
    (
        sensor.latitude.map(f64::to_bits),
        sensor.longitude.map(f64::to_bits),
    )
}

impl DistanceCache {
    #[must_use]
    pub fn new(reference: Coordinate) -> Self {
        Self {
            reference,
            distances: HashMap::new(),
            computations: 0,
        }
    }

    #[must_use]
    pub fn reference(&self) -> Coordinate {
        self.reference
    }

    /// Distance in metres from the reference to `sensor`, or
    /// [`UNKNOWN_DISTANCE`] when its coordinates are missing or invalid.
    pub fn distance(&mut self, sensor: &SensorReading) -> f64 {
        let key = position_key(sensor);
        match self.distances.get(&sensor.id) {
            Some(&(cached_key, distance)) if cached_key == key => return distance,
            Some(_) => {
                tracing::warn!(sensor_id = sensor.id, "sensor id reused with another position");
                self.computations += 1;
                return self.compute(sensor);
            }
            None => {}
        }

        self.computations += 1;
        let distance = self.compute(sensor);
        self.distances.insert(sensor.id, (key, distance));
        distance
    }

    fn compute(&self, sensor: &SensorReading) -> f64 {
        if !self.reference.is_valid() {
            return UNKNOWN_DISTANCE;
        }
        match sensor.coordinate() {
            Some(coordinate) => {
                let distance = haversine_meters(self.reference, coordinate);
                if distance.is_finite() {
                    distance
                } else {
                    UNKNOWN_DISTANCE
                }
            }
            None => {
                tracing::warn!(sensor_id = sensor.id, "invalid sensor coordinates");
                UNKNOWN_DISTANCE
            }
        }
    }

    /// Order two sensors by distance, nearest first.
    pub fn compare(&mut self, a: &SensorReading, b: &SensorReading) -> Ordering {
        let da = self.distance(a);
        let db = self.distance(b);
        da.total_cmp(&db)
    }

    /// Number of distances actually computed so far.
    #[must_use]
    pub fn computations(&self) -> usize {
        self.computations
    }
}

/// Comparator ordering sensors nearest-first from `reference`.
///
/// The returned closure owns its own [`DistanceCache`], so every call to
/// `comparator` starts with empty state.
pub fn comparator(
    reference: Coordinate,
) -> impl FnMut(&SensorReading, &SensorReading) -> Ordering {
    let mut cache = DistanceCache::new(reference);
    move |a: &SensorReading, b: &SensorReading| cache.compare(a, b)
}

/// Stable sort of `sensors` by distance from `reference`.
///
/// Sensors without usable coordinates end up last, in their input order.
/// Distances are memoized by sensor id, so ids are expected to be unique;
/// a duplicated id is still ranked by its own position.
pub fn rank_by_distance(reference: Coordinate, sensors: &mut [SensorReading]) {
    let mut cache = DistanceCache::new(reference);
    sensors.sort_by(|a, b| cache.compare(a, b));
    tracing::debug!(
        sensors = sensors.len(),
        computations = cache.computations(),
        "ranked sensors by distance"
    );
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const OAKLAND: Coordinate = Coordinate::new(37.8044, -122.2712);

    fn sensor(id: u32, lat: f64, lon: f64) -> SensorReading {
        SensorReading::new(id).with_coordinate(lat, lon)
    }

    fn ids(sensors: &[SensorReading]) -> Vec<u32> {
        sensors.iter().map(|s| s.id).collect()
    }

    #[rstest]
    #[case::same_point(OAKLAND, OAKLAND, 0.0, 1e-6)]
    #[case::oakland_to_sf(OAKLAND, Coordinate::new(37.7749, -122.4194), 13_400.0, 500.0)]
    #[case::quarter_meridian(
        Coordinate::new(0.0, 0.0),
        Coordinate::new(90.0, 0.0),
        10_007_543.0,
        1.0
    )]
    fn haversine_known_distances(
        #[case] from: Coordinate,
        #[case] to: Coordinate,
        #[case] expected: f64,
        #[case] tolerance: f64,
    ) {
        let d = haversine_meters(from, to);
        assert!((d - expected).abs() < tolerance, "expected ~{expected}, got {d}");
    }

    #[test]
    fn test_cache_memoizes() {
        let mut cache = DistanceCache::new(OAKLAND);
        let s = sensor(1, 37.9, -122.3);

        let first = cache.distance(&s);
        let second = cache.distance(&s);
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(cache.computations(), 1);
    }

    #[test]
    fn test_missing_coordinates_use_sentinel() {
        let mut cache = DistanceCache::new(OAKLAND);
        assert_eq!(cache.distance(&SensorReading::new(1)), UNKNOWN_DISTANCE);
        assert_eq!(cache.distance(&sensor(2, 95.0, 0.0)), UNKNOWN_DISTANCE);
    }

    #[test]
    fn test_rank_orders_nearest_first() {
        let mut sensors = vec![
            sensor(1, 38.5, -121.5),
            SensorReading::new(2),
            sensor(3, 37.80, -122.27),
            sensor(4, 37.9, -122.3),
            SensorReading::new(5).with_coordinate(f64::NAN, 1.0),
        ];
        rank_by_distance(OAKLAND, &mut sensors);
        assert_eq!(ids(&sensors), vec![3, 4, 1, 2, 5]);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let mut sensors = vec![
            sensor(7, 37.9, -122.3),
            sensor(3, 37.9, -122.3),
            sensor(5, 37.9, -122.3),
        ];
        rank_by_distance(OAKLAND, &mut sensors);
        assert_eq!(ids(&sensors), vec![7, 3, 5]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let mut sensors: Vec<SensorReading> = (0..40_u32)
            .map(|i| {
                if i % 7 == 0 {
                    SensorReading::new(i)
                } else {
                    let offset = f64::from((i * 37) % 23) / 10.0;
                    sensor(i, 37.0 + offset, -122.0 - offset / 2.0)
                }
            })
            .collect();
        rank_by_distance(OAKLAND, &mut sensors);
        let once = ids(&sensors);
        rank_by_distance(OAKLAND, &mut sensors);
        assert_eq!(ids(&sensors), once);

        let unknown: Vec<u32> = once.iter().copied().filter(|i| i % 7 == 0).collect();
        assert_eq!(&once[once.len() - unknown.len()..], unknown.as_slice());
        assert_eq!(unknown, vec![0, 7, 14, 21, 28, 35]);
    }

    #[test]
    fn test_reused_id_ranked_by_own_position() {
        let mut sensors = vec![sensor(1, 40.0, -122.2712), sensor(1, 37.8044, -122.2712)];
        rank_by_distance(OAKLAND, &mut sensors);
        assert!((sensors[0].latitude.unwrap() - 37.8044).abs() < 1e-9);

        let mut cache = DistanceCache::new(OAKLAND);
        let far = cache.distance(&sensors[1]);
        let near = cache.distance(&sensors[0]);
        assert!(near < 1.0, "got {near}");
        assert!(far > 200_000.0, "got {far}");
        assert_eq!(cache.distance(&sensors[1]).to_bits(), far.to_bits());
        assert_eq!(cache.computations(), 2);
    }

    #[test]
    fn test_comparator_is_total() {
        let sensors = [
            sensor(1, 37.81, -122.27),
            sensor(2, 38.0, -122.0),
            SensorReading::new(3),
            sensor(4, 37.81, -122.27),
        ];
        let mut cmp = comparator(OAKLAND);
        for a in &sensors {
            assert_eq!(cmp(a, a), Ordering::Equal);
            for b in &sensors {
                assert_eq!(cmp(a, b), cmp(b, a).reverse());
                for c in &sensors {
                    if cmp(a, b) != Ordering::Greater && cmp(b, c) != Ordering::Greater {
                        assert_ne!(cmp(a, c), Ordering::Greater);
                    }
                }
            }
        }
    }

    #[test]
    fn test_each_distance_computed_once() {
        let mut sensors: Vec<SensorReading> = (0..64_u32)
            .map(|i| sensor(i, 37.0 + f64::from(i) / 100.0, -122.0))
            .rev()
            .collect();
        let mut cache = DistanceCache::new(OAKLAND);
        sensors.sort_by(|a, b| cache.compare(a, b));
        assert_eq!(cache.computations(), 64);
    }
}
