//! Landing-zone selection.
//!
//! Nearest-neighbor search over a small static list of GPS points using
//! true haversine distance (the medic matcher deliberately uses a
//! different, planar formula). First minimum encountered wins, so the
//! result is stable under input order.

use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoPoint};

/// Default patient location used when no coordinates are supplied.
pub const DEFAULT_PATIENT_LAT: f64 = 24.7745;
pub const DEFAULT_PATIENT_LON: f64 = 46.6575;

/// One landing zone from the read-only reference list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingZone {
    pub id: u32,
    pub name: String,
    /// Landing area dimensions, e.g. "20 x 20 m".
    pub area: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A selected zone with distance, bearing, and flight-time estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneFix {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub area: String,
    pub distance_km: f64,
    /// Initial bearing from the patient to the zone, degrees 0-360.
    pub bearing_deg: f64,
    pub flight_time_min: f64,
}

/// Aggregate statistics over a zone list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneStats {
    pub count: usize,
    pub nearest_km: f64,
    pub farthest_km: f64,
    pub mean_km: f64,
    pub nearest_name: Option<String>,
}

/// Basic sanity check; rejects out-of-range values and the (0, 0)
/// placeholder.
pub fn valid_coordinates(lat: f64, lon: f64) -> bool {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return false;
    }
    !(lat == 0.0 && lon == 0.0)
}

fn fix_for(zone: &LandingZone, patient: GeoPoint) -> ZoneFix {
    let here = GeoPoint::new(zone.latitude, zone.longitude);
    let distance_km = geo::haversine_km(patient, here);
    ZoneFix {
        name: zone.name.clone(),
        latitude: zone.latitude,
        longitude: zone.longitude,
        area: zone.area.clone(),
        distance_km,
        bearing_deg: geo::initial_bearing_deg(patient, here),
        flight_time_min: geo::flight_time_min(distance_km),
    }
}

/// Find the nearest valid landing zone to the patient.
///
/// Zones with invalid coordinates are skipped. Returns `None` when the
/// list is empty or no zone has usable coordinates.
pub fn nearest_zone(zones: &[LandingZone], patient_lat: f64, patient_lon: f64) -> Option<ZoneFix> {
    let patient = GeoPoint::new(patient_lat, patient_lon);

    let mut best: Option<(&LandingZone, f64)> = None;
    for zone in zones {
        if !valid_coordinates(zone.latitude, zone.longitude) {
            continue;
        }
        let d = geo::haversine_km(patient, GeoPoint::new(zone.latitude, zone.longitude));
        // Strict less-than: the first zone at the minimum distance wins.
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((zone, d));
        }
    }

    best.map(|(zone, _)| fix_for(zone, patient))
}

/// All valid zones sorted by distance, nearest first.
pub fn zones_by_distance(
    zones: &[LandingZone],
    patient_lat: f64,
    patient_lon: f64,
) -> Vec<ZoneFix> {
    let patient = GeoPoint::new(patient_lat, patient_lon);

    let mut fixes: Vec<ZoneFix> = zones
        .iter()
        .filter(|z| valid_coordinates(z.latitude, z.longitude))
        .map(|z| fix_for(z, patient))
        .collect();

    fixes.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fixes
}

/// Valid zones within `radius_km`, sorted by distance.
pub fn zones_within_radius(
    zones: &[LandingZone],
    radius_km: f64,
    patient_lat: f64,
    patient_lon: f64,
) -> Vec<ZoneFix> {
    zones_by_distance(zones, patient_lat, patient_lon)
        .into_iter()
        .filter(|z| z.distance_km <= radius_km)
        .collect()
}

/// Distance statistics for a zone list relative to the patient.
pub fn zone_stats(zones: &[LandingZone], patient_lat: f64, patient_lon: f64) -> ZoneStats {
    let sorted = zones_by_distance(zones, patient_lat, patient_lon);
    if sorted.is_empty() {
        return ZoneStats {
            count: 0,
            nearest_km: 0.0,
            farthest_km: 0.0,
            mean_km: 0.0,
            nearest_name: None,
        };
    }

    let total: f64 = sorted.iter().map(|z| z.distance_km).sum();
    ZoneStats {
        count: sorted.len(),
        nearest_km: sorted[0].distance_km,
        farthest_km: sorted[sorted.len() - 1].distance_km,
        mean_km: total / sorted.len() as f64,
        nearest_name: Some(sorted[0].name.clone()),
    }
}
