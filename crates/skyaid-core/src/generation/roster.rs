//! Seeded mock-roster generation.
//!
//! The roster is generated once at startup from an explicit seed and
//! treated as read-only for the lifetime of the process. ChaCha8 keeps
//! the stream identical across platforms, so the same seed always yields
//! the same roster everywhere.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use skyaid_logic::geo::GeoPoint;
use skyaid_logic::matcher::{Certification, Medic, MedicStatus, Specialty};

use super::names::MEDIC_NAMES;

/// Center of the simulated service area.
pub const DISTRICT_CENTER: GeoPoint = GeoPoint {
    lat: 24.7136,
    lon: 46.6753,
};

/// Seed used when the caller has no preference.
pub const DEFAULT_ROSTER_SEED: u64 = 42;

/// Number of medics generated — one per name in the fixed list.
pub const ROSTER_SIZE: usize = 15;

/// Medic GPS spread around the district center, degrees.
const ROSTER_SPREAD_DEG: f64 = 0.18;

/// Derived patient-location spread around the district center, degrees.
const PATIENT_SPREAD_DEG: f64 = 0.15;

const SPECIALTIES: [Specialty; 6] = [
    Specialty::Cardiac,
    Specialty::Trauma,
    Specialty::Respiratory,
    Specialty::Neuro,
    Specialty::Pediatric,
    Specialty::General,
];

const CERTIFICATIONS: [Certification; 3] = [
    Certification::Paramedic,
    Certification::EmtAdvanced,
    Certification::CriticalCare,
];

/// Availability weighted 7:2:1 available / on mission / off duty.
const STATUS_POOL: [MedicStatus; 10] = [
    MedicStatus::Available,
    MedicStatus::Available,
    MedicStatus::Available,
    MedicStatus::Available,
    MedicStatus::Available,
    MedicStatus::Available,
    MedicStatus::Available,
    MedicStatus::OnMission,
    MedicStatus::OnMission,
    MedicStatus::OffDuty,
];

const LANGUAGE_POOL: [&str; 4] = ["ar", "en", "ur", "fr"];

/// Generate the mock roster for a seed.
///
/// Specialty and certification rotate by index so the mix is the same
/// for every seed; position, status, workload, experience, rating, and
/// languages come from the seeded stream.
pub fn generate_roster(seed: u64) -> Vec<Medic> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    MEDIC_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let lat = DISTRICT_CENTER.lat + rng.gen_range(-ROSTER_SPREAD_DEG..ROSTER_SPREAD_DEG);
            let lon = DISTRICT_CENTER.lon + rng.gen_range(-ROSTER_SPREAD_DEG..ROSTER_SPREAD_DEG);
            let status = STATUS_POOL[rng.gen_range(0..STATUS_POOL.len())];
            let current_load = rng.gen_range(0..=80);
            let missions_completed = rng.gen_range(15..=250);
            let rating = round1(rng.gen_range(4.2..=5.0));
            let languages = sample_languages(&mut rng);

            Medic {
                id: format!("MED-{}", 1000 + i),
                name: (*name).to_string(),
                specialty: SPECIALTIES[i % SPECIALTIES.len()],
                certification: CERTIFICATIONS[i % CERTIFICATIONS.len()],
                location: GeoPoint::new(round6(lat), round6(lon)),
                status,
                current_load,
                missions_completed,
                rating,
                languages,
            }
        })
        .collect()
}

/// Derive a patient location deterministically from a scenario seed.
///
/// Used when the caller supplies no explicit coordinates — NOT a live
/// geolocation source.
pub fn derive_patient_location(seed: u64) -> GeoPoint {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    GeoPoint::new(
        DISTRICT_CENTER.lat + rng.gen_range(-PATIENT_SPREAD_DEG..PATIENT_SPREAD_DEG),
        DISTRICT_CENTER.lon + rng.gen_range(-PATIENT_SPREAD_DEG..PATIENT_SPREAD_DEG),
    )
}

/// Draw 2-3 distinct languages from the fixed pool.
fn sample_languages(rng: &mut ChaCha8Rng) -> Vec<String> {
    let count = rng.gen_range(2..=3);
    let mut pool: Vec<&str> = LANGUAGE_POOL.to_vec();
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = rng.gen_range(0..pool.len());
        out.push(pool.swap_remove(idx).to_string());
    }
    out
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
