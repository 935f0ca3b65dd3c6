//! Distance, bearing, and ETA primitives.
//!
//! Two distance formulas co-exist on purpose: the medic matcher uses a
//! planar degree-delta approximation, the landing-zone selector uses true
//! great-circle haversine. They produce different numbers over the same
//! points and must stay separate functions.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of arc, used by the planar approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Aerial unit cruise speed.
pub const AERIAL_SPEED_KMH: f64 = 120.0;

/// Ground ambulance average speed in traffic.
pub const GROUND_SPEED_KMH: f64 = 40.0;

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Transport mode for ETA estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Aerial,
    Ground,
}

impl TravelMode {
    fn speed_kmh(self) -> f64 {
        match self {
            Self::Aerial => AERIAL_SPEED_KMH,
            Self::Ground => GROUND_SPEED_KMH,
        }
    }
}

/// Great-circle distance between two points in kilometers (haversine).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Planar degree-delta distance in kilometers.
///
/// Adequate over a ~20 km service area. Used by the medic matcher only;
/// NOT interchangeable with [`haversine_km`].
pub fn planar_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).abs();
    let dlon = (b.lon - a.lon).abs();
    (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE
}

/// Initial compass bearing from `a` to `b` in degrees, normalized to [0, 360).
pub fn initial_bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Eight-point cardinal direction for a bearing in degrees.
pub fn bearing_to_cardinal(bearing: f64) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = ((bearing / 45.0).round() as usize) % 8;
    DIRECTIONS[index]
}

/// Minutes to cover `distance_km` at the mode's average speed.
///
/// Non-positive distances return 0.0.
pub fn eta_minutes(distance_km: f64, mode: TravelMode) -> f64 {
    if distance_km <= 0.0 {
        return 0.0;
    }
    distance_km / mode.speed_kmh() * 60.0
}

/// Aerial flight time in minutes.
pub fn flight_time_min(distance_km: f64) -> f64 {
    eta_minutes(distance_km, TravelMode::Aerial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_distance() {
        let p = GeoPoint::new(24.7745, 46.6575);
        assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_known_pair() {
        // Patient default to the nearest park in the reference data,
        // a bit over half a kilometer.
        let patient = GeoPoint::new(24.7745, 46.6575);
        let park = GeoPoint::new(24.7703, 46.6529);
        let d = haversine_km(patient, park);
        assert!(d > 0.4 && d < 0.9, "got {} km", d);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        // One degree of latitude is ~111 km everywhere.
        let a = GeoPoint::new(24.0, 46.0);
        let b = GeoPoint::new(25.0, 46.0);
        let d = haversine_km(a, b);
        assert!((d - 111.2).abs() < 1.0, "got {} km", d);
    }

    #[test]
    fn test_planar_differs_from_haversine() {
        // Longitude deltas are not shortened by latitude in the planar
        // formula, so the two must disagree away from the equator.
        let a = GeoPoint::new(24.7, 46.6);
        let b = GeoPoint::new(24.7, 46.8);
        let planar = planar_distance_km(a, b);
        let great_circle = haversine_km(a, b);
        assert!((planar - great_circle).abs() > 1.0);
    }

    #[test]
    fn test_planar_symmetric() {
        let a = GeoPoint::new(24.70, 46.60);
        let b = GeoPoint::new(24.75, 46.68);
        let d1 = planar_distance_km(a, b);
        let d2 = planar_distance_km(b, a);
        assert!((d1 - d2).abs() < 1e-12);
    }

    #[test]
    fn test_bearing_north() {
        let a = GeoPoint::new(24.0, 46.0);
        let b = GeoPoint::new(25.0, 46.0);
        let bearing = initial_bearing_deg(a, b);
        assert!(bearing < 1.0 || bearing > 359.0, "got {}", bearing);
    }

    #[test]
    fn test_bearing_east() {
        let a = GeoPoint::new(0.0, 46.0);
        let b = GeoPoint::new(0.0, 47.0);
        let bearing = initial_bearing_deg(a, b);
        assert!((bearing - 90.0).abs() < 1.0, "got {}", bearing);
    }

    #[test]
    fn test_bearing_in_range() {
        let a = GeoPoint::new(24.7745, 46.6575);
        let points = [
            GeoPoint::new(24.7703, 46.6529),
            GeoPoint::new(24.7812, 46.6495),
            GeoPoint::new(24.7641, 46.6688),
        ];
        for p in points {
            let b = initial_bearing_deg(a, p);
            assert!((0.0..360.0).contains(&b), "bearing {} out of range", b);
        }
    }

    #[test]
    fn test_cardinal_directions() {
        assert_eq!(bearing_to_cardinal(0.0), "N");
        assert_eq!(bearing_to_cardinal(45.0), "NE");
        assert_eq!(bearing_to_cardinal(90.0), "E");
        assert_eq!(bearing_to_cardinal(180.0), "S");
        assert_eq!(bearing_to_cardinal(270.0), "W");
        assert_eq!(bearing_to_cardinal(359.0), "N");
    }

    #[test]
    fn test_eta_minutes() {
        // 120 km/h aerial: 2 km per minute.
        assert!((eta_minutes(6.0, TravelMode::Aerial) - 3.0).abs() < 1e-9);
        // 40 km/h ground: 1.5 min per km.
        assert!((eta_minutes(6.0, TravelMode::Ground) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_eta_nonpositive_distance() {
        assert_eq!(eta_minutes(0.0, TravelMode::Aerial), 0.0);
        assert_eq!(eta_minutes(-3.0, TravelMode::Ground), 0.0);
    }

    #[test]
    fn test_flight_time() {
        assert!((flight_time_min(3.2) - 1.6).abs() < 1e-9);
    }
}
