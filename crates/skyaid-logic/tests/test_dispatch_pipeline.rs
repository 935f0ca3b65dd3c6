//! Integration tests for the full decision pipeline.
//!
//! Exercises: triage → dispatch → medic matching → landing-zone
//! selection over hand-built data. All tests are pure logic — no data
//! files, no RNG.

use skyaid_logic::dispatch::{dispatch, DispatchRule, ResponseMode};
use skyaid_logic::geo::GeoPoint;
use skyaid_logic::landing::{nearest_zone, LandingZone};
use skyaid_logic::matcher::{
    find_best_match, Certification, MatchOutcome, Medic, MedicStatus, Specialty,
};
use skyaid_logic::triage::{triage, MedicalCategory};

// ── Helpers ────────────────────────────────────────────────────────────

fn patient() -> GeoPoint {
    GeoPoint::new(24.7745, 46.6575)
}

fn roster() -> Vec<Medic> {
    let mk = |id: &str, specialty, certification, lat: f64, lon: f64, status| Medic {
        id: id.to_string(),
        name: format!("Medic {}", id),
        specialty,
        certification,
        location: GeoPoint::new(lat, lon),
        status,
        current_load: 25,
        missions_completed: 80,
        rating: 4.6,
        languages: vec!["en".to_string(), "fr".to_string()],
    };
    vec![
        mk(
            "M1",
            Specialty::Cardiac,
            Certification::CriticalCare,
            24.7800,
            46.6600,
            MedicStatus::Available,
        ),
        mk(
            "M2",
            Specialty::Trauma,
            Certification::EmtAdvanced,
            24.7700,
            46.6500,
            MedicStatus::Available,
        ),
        mk(
            "M3",
            Specialty::General,
            Certification::Paramedic,
            24.7600,
            46.6700,
            MedicStatus::Available,
        ),
        mk(
            "M4",
            Specialty::Cardiac,
            Certification::CriticalCare,
            24.7750,
            46.6580,
            MedicStatus::OnMission,
        ),
    ]
}

fn zones() -> Vec<LandingZone> {
    let mk = |id: u32, name: &str, lat: f64, lon: f64| LandingZone {
        id,
        name: name.to_string(),
        area: "20 x 20 m".to_string(),
        latitude: lat,
        longitude: lon,
    };
    vec![
        mk(1, "Riverside Park", 24.7703, 46.6529),
        mk(2, "Community Sports Field", 24.7779, 46.6662),
        mk(3, "District Hospital Helipad", 24.7641, 46.6688),
    ]
}

// ── Full pipeline ──────────────────────────────────────────────────────

#[test]
fn critical_cardiac_case_flows_end_to_end() {
    // Crushing chest pain: red flag, cardiac, severity 3.
    let triaged = triage(
        &["chest_pain_crushing", "shortness_of_breath"],
        "crushing pressure radiating to left arm",
        Some(15),
        Some(0.90),
    );
    assert_eq!(triaged.category, MedicalCategory::Cardiac);
    assert_eq!(triaged.severity_level, 3);
    assert!(triaged.escalate);
    assert!(triaged.breakdown.red_flag);

    // Clear weather, ground too slow for the harm window: both units.
    let decision = dispatch(14.0, 4.0, 29.8, 3.6);
    assert_eq!(decision.response_mode, ResponseMode::Both);
    assert_eq!(decision.rule_triggered, DispatchRule::EmergencyOverride);

    // Aerial component means a medic gets matched.
    let outcome = find_best_match(
        decision.response_mode,
        triaged.category,
        triaged.severity_level,
        patient(),
        &roster(),
    );
    let assignment = outcome.assigned().expect("aerial response must assign");
    // The on-mission cardiac specialist sits closest but is filtered out;
    // the available cardiac specialist wins on the specialty weight.
    assert_eq!(assignment.medic.medic.id, "M1");
    assert_eq!(assignment.medic.medic.specialty, Specialty::Cardiac);

    // And the drone needs somewhere to land.
    let fix = nearest_zone(&zones(), patient().lat, patient().lon).expect("zones exist");
    assert_eq!(fix.name, "Riverside Park");
    assert!(fix.flight_time_min > 0.0);
}

#[test]
fn stormy_weather_keeps_everything_on_the_ground() {
    let triaged = triage(&["severe_bleeding"], "", Some(5), Some(0.95));
    assert_eq!(triaged.severity_level, 3);

    // Severity is maximal but the weather rule still wins.
    let decision = dispatch(88.0, 4.0, 29.8, 3.6);
    assert_eq!(decision.response_mode, ResponseMode::Ambulance);
    assert_eq!(decision.rule_triggered, DispatchRule::SafetyFilter);

    let outcome = find_best_match(
        decision.response_mode,
        triaged.category,
        triaged.severity_level,
        patient(),
        &roster(),
    );
    assert!(matches!(outcome, MatchOutcome::NoMedicNeeded { .. }));
}

#[test]
fn routine_case_takes_the_default_path() {
    let triaged = triage(&["headache"], "mild headache since morning", Some(180), Some(0.1));
    assert_eq!(triaged.severity_level, 1);
    assert!(!triaged.escalate);

    let decision = dispatch(2.0, 15.0, 10.1, 3.6);
    assert_eq!(decision.response_mode, ResponseMode::Ambulance);
    assert_eq!(decision.rule_triggered, DispatchRule::Default);

    let outcome = find_best_match(
        decision.response_mode,
        triaged.category,
        triaged.severity_level,
        patient(),
        &roster(),
    );
    assert!(matches!(outcome, MatchOutcome::NoMedicNeeded { .. }));
}

#[test]
fn efficiency_launch_matches_a_generalist_for_unclear_cases() {
    let triaged = triage(&["fever", "chills"], "", Some(300), None);
    assert_eq!(triaged.category, MedicalCategory::InfectionFever);

    // Inside the harm window but the aerial unit saves 26 minutes.
    let decision = dispatch(6.0, 35.0, 29.8, 3.6);
    assert_eq!(decision.rule_triggered, DispatchRule::EfficiencyOptimization);
    assert_eq!(decision.response_mode, ResponseMode::Both);

    let outcome = find_best_match(
        decision.response_mode,
        triaged.category,
        triaged.severity_level,
        patient(),
        &roster(),
    );
    let assignment = outcome.assigned().expect("aerial response must assign");
    // The generalist covers infection cases exactly (1.0 specialty score)
    // while both specialists sit at 0.4.
    assert_eq!(assignment.medic.medic.id, "M3");
}

// ── Pipeline invariants ────────────────────────────────────────────────

#[test]
fn pipeline_is_deterministic() {
    let run = || {
        let t = triage(&["wheezing", "shortness_of_breath"], "", Some(30), Some(0.7));
        let d = dispatch(10.0, 10.0, 16.4, 3.4);
        let m = find_best_match(d.response_mode, t.category, t.severity_level, patient(), &roster());
        (t, d, m)
    };
    let (t1, d1, m1) = run();
    let (t2, d2, m2) = run();

    assert_eq!(t1.severity_level, t2.severity_level);
    assert_eq!(t1.breakdown.total_score, t2.breakdown.total_score);
    assert_eq!(d1.rule_triggered, d2.rule_triggered);
    let (a, b) = (m1.assigned().unwrap(), m2.assigned().unwrap());
    assert_eq!(a.medic.medic.id, b.medic.medic.id);
}

#[test]
fn escalated_triage_always_pairs_with_a_reason_trail() {
    let decision = dispatch(14.0, 4.0, 29.8, 3.6);
    assert!(!decision.reasons.is_empty());

    let outcome = find_best_match(
        decision.response_mode,
        MedicalCategory::Cardiac,
        3,
        patient(),
        &roster(),
    );
    let assignment = outcome.assigned().unwrap();
    assert!(!assignment.reasoning.is_empty());
    assert!(assignment
        .reasoning
        .iter()
        .any(|r| r.contains("Specialty match")));
}

#[test]
fn empty_roster_degrades_gracefully_not_fatally() {
    let outcome = find_best_match(
        ResponseMode::Both,
        MedicalCategory::Cardiac,
        3,
        patient(),
        &[],
    );
    match outcome {
        MatchOutcome::NoneAvailable { reason } => assert!(!reason.is_empty()),
        other => panic!("expected NoneAvailable, got {:?}", other),
    }
}
