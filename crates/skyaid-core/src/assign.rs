//! Medic assignment entry point.
//!
//! Ties the pieces together for callers: derives a patient location from
//! the scenario seed when none is supplied, then runs the pure matcher.
//! The roster is passed in explicitly — construct it once with
//! [`crate::generation::generate_roster`] and reuse it; there is no
//! hidden shared instance.

use skyaid_logic::dispatch::ResponseMode;
use skyaid_logic::geo::GeoPoint;
use skyaid_logic::matcher::{find_best_match, MatchOutcome, Medic};
use skyaid_logic::triage::MedicalCategory;

use crate::generation::derive_patient_location;

/// Assign the best available medic for a case.
///
/// `location` wins when present; otherwise the patient position is
/// derived deterministically from `seed`. Repeated calls with the same
/// arguments return the same assignment.
pub fn assign_medic(
    roster: &[Medic],
    response_mode: ResponseMode,
    category: MedicalCategory,
    severity: u8,
    location: Option<GeoPoint>,
    seed: u64,
) -> MatchOutcome {
    let patient = location.unwrap_or_else(|| derive_patient_location(seed));
    find_best_match(response_mode, category, severity, patient, roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{generate_roster, DEFAULT_ROSTER_SEED};
    use skyaid_logic::matcher::MedicStatus;

    #[test]
    fn test_ground_only_needs_no_medic() {
        let roster = generate_roster(DEFAULT_ROSTER_SEED);
        let outcome = assign_medic(
            &roster,
            ResponseMode::Ambulance,
            MedicalCategory::Cardiac,
            3,
            None,
            1,
        );
        assert!(matches!(outcome, MatchOutcome::NoMedicNeeded { .. }));
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let roster = generate_roster(DEFAULT_ROSTER_SEED);
        let a = assign_medic(
            &roster,
            ResponseMode::Both,
            MedicalCategory::Cardiac,
            3,
            None,
            17,
        );
        let b = assign_medic(
            &roster,
            ResponseMode::Both,
            MedicalCategory::Cardiac,
            3,
            None,
            17,
        );
        match (a, b) {
            (MatchOutcome::Assigned(x), MatchOutcome::Assigned(y)) => {
                assert_eq!(x.medic.medic.id, y.medic.medic.id);
                assert!((x.medic.composite_score - y.medic.composite_score).abs() < f64::EPSILON);
            }
            (MatchOutcome::NoneAvailable { .. }, MatchOutcome::NoneAvailable { .. }) => {}
            _ => panic!("outcomes diverged for identical inputs"),
        }
    }

    #[test]
    fn test_explicit_location_overrides_seed() {
        let roster = generate_roster(DEFAULT_ROSTER_SEED);
        let here = GeoPoint::new(24.72, 46.68);
        let a = assign_medic(
            &roster,
            ResponseMode::Both,
            MedicalCategory::Respiratory,
            2,
            Some(here),
            1,
        );
        let b = assign_medic(
            &roster,
            ResponseMode::Both,
            MedicalCategory::Respiratory,
            2,
            Some(here),
            9999,
        );
        // Same explicit location: the seed must not matter.
        match (a, b) {
            (MatchOutcome::Assigned(x), MatchOutcome::Assigned(y)) => {
                assert_eq!(x.medic.medic.id, y.medic.medic.id);
                assert_eq!(x.patient_location, here);
            }
            (MatchOutcome::NoneAvailable { .. }, MatchOutcome::NoneAvailable { .. }) => {}
            _ => panic!("outcomes diverged for identical location"),
        }
    }

    #[test]
    fn test_roster_untouched_by_assignment() {
        let roster = generate_roster(DEFAULT_ROSTER_SEED);
        let statuses: Vec<MedicStatus> = roster.iter().map(|m| m.status).collect();
        let _ = assign_medic(
            &roster,
            ResponseMode::Both,
            MedicalCategory::Neuro,
            3,
            None,
            5,
        );
        let after: Vec<MedicStatus> = roster.iter().map(|m| m.status).collect();
        assert_eq!(statuses, after);
    }
}
