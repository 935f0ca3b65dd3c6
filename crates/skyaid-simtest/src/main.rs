//! SkyAid Headless Validation Harness
//!
//! Sweeps the bundled reference data through every engine: loader
//! normalization, the dispatch rules, the triage scorer, the fuzzy
//! categorizer, roster generation plus matching, and landing-zone
//! selection. Runs entirely in-process — no network, no rendering.
//!
//! Usage:
//!   cargo run -p skyaid-simtest
//!   cargo run -p skyaid-simtest -- --verbose

use serde::Deserialize;

use skyaid_core::assign::assign_medic;
use skyaid_core::generation::{generate_roster, DEFAULT_ROSTER_SEED};
use skyaid_core::loader::{
    parse_catalog, parse_dispatch_cases, parse_landing_zones, parse_scenarios,
};
use skyaid_logic::catalog::{categorize, MatchMethod};
use skyaid_logic::dispatch::{dispatch, validate_inputs, ResponseMode};
use skyaid_logic::geo::bearing_to_cardinal;
use skyaid_logic::landing::{
    nearest_zone, zone_stats, zones_by_distance, zones_within_radius, DEFAULT_PATIENT_LAT,
    DEFAULT_PATIENT_LON,
};
use skyaid_logic::matcher::{MatchOutcome, MedicStatus};
use skyaid_logic::triage::{triage, MedicalCategory};

// ── Reference data (same JSON any host would load) ──────────────────────
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");
const CASES_JSON: &str = include_str!("../../../data/dispatch_cases.json");
const ZONES_JSON: &str = include_str!("../../../data/landing_zones.json");
const CATALOG_JSON: &str = include_str!("../../../data/medical_catalog.json");

/// Raw landing-zone row, used to sanity-check the file shape before the
/// loader normalizes it.
#[derive(Debug, Deserialize)]
struct RawZone {
    #[serde(rename = "Place Name")]
    place_name: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== SkyAid Validation Harness ===\n");

    let mut results = Vec::new();

    // 1. Reference data loading & normalization
    results.extend(validate_reference_data(verbose));

    // 2. Scenario sweep against the dispatch engine
    results.extend(validate_scenarios(verbose));

    // 3. Dispatch case sweep
    results.extend(validate_dispatch_cases(verbose));

    // 4. Triage scorer sweep
    results.extend(validate_triage(verbose));

    // 5. Categorizer matching over the real catalog
    results.extend(validate_categorizer(verbose));

    // 6. Roster generation & medic matching
    results.extend(validate_matching(verbose));

    // 7. Landing-zone selection
    results.extend(validate_landing_zones(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Reference data ───────────────────────────────────────────────────

fn validate_reference_data(_verbose: bool) -> Vec<TestResult> {
    println!("--- Reference Data ---");
    let mut results = Vec::new();

    // Raw shape check before normalization.
    let raw: Result<serde_json::Value, _> = serde_json::from_str(ZONES_JSON);
    let raw_zones: Vec<RawZone> = raw
        .ok()
        .and_then(|v| {
            v.get("sheets")
                .and_then(|s| s.as_object())
                .and_then(|sheets| sheets.values().next().cloned())
        })
        .and_then(|rows| serde_json::from_value(rows).ok())
        .unwrap_or_default();
    results.push(check(
        "zones_raw_shape",
        !raw_zones.is_empty(),
        format!("{} raw zone rows under the sheets wrapper", raw_zones.len()),
    ));
    let in_range = raw_zones
        .iter()
        .filter(|z| z.latitude != 0.0 || z.longitude != 0.0)
        .count();
    results.push(check(
        "zones_raw_coordinates",
        in_range >= 5,
        format!(
            "{} of {} raw zones carry real coordinates (first: {})",
            in_range,
            raw_zones.len(),
            raw_zones.first().map(|z| z.place_name.as_str()).unwrap_or("-")
        ),
    ));

    let scenarios = parse_scenarios(SCENARIOS_JSON).unwrap_or_default();
    results.push(check(
        "scenarios_loaded",
        scenarios.len() >= 5,
        format!("{} scenarios normalized", scenarios.len()),
    ));
    results.push(check(
        "scenarios_weather_normalized",
        scenarios
            .iter()
            .all(|s| (0.0..=100.0).contains(&s.weather_risk_pct)),
        "all weather risks in 0-100%".to_string(),
    ));
    results.push(check(
        "scenarios_harm_windows_ordered",
        scenarios
            .iter()
            .all(|s| s.harm_threshold_min <= s.harm_threshold_max && s.harm_threshold_min > 0),
        "all harm windows positive and ordered".to_string(),
    ));

    let cases = parse_dispatch_cases(CASES_JSON).unwrap_or_default();
    results.push(check(
        "cases_loaded",
        cases.len() >= 6,
        format!("{} dispatch cases normalized", cases.len()),
    ));

    let catalog = parse_catalog(CATALOG_JSON).unwrap_or_default();
    results.push(check(
        "catalog_loaded",
        catalog.len() >= 10,
        format!("{} catalog entries", catalog.len()),
    ));
    results.push(check(
        "catalog_names_normalized",
        catalog
            .iter()
            .all(|c| !c.case_name_normalized.is_empty()
                && c.case_name_normalized == c.case_name_normalized.to_lowercase()),
        "all catalog names carry a normalized form".to_string(),
    ));

    let zones = parse_landing_zones(ZONES_JSON).unwrap_or_default();
    results.push(check(
        "zones_loaded",
        zones.len() >= 6,
        format!("{} landing zones", zones.len()),
    ));

    results
}

// ── 2. Scenario sweep ───────────────────────────────────────────────────

fn validate_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Scenario Sweep ---");
    let mut results = Vec::new();

    let scenarios = match parse_scenarios(SCENARIOS_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("scenarios_parse", false, format!("{}", e)));
            return results;
        }
    };

    let mut matches = 0usize;
    for s in &scenarios {
        let decision = dispatch(
            s.weather_risk_pct,
            f64::from(s.harm_threshold_min),
            s.ground_eta_min,
            s.air_eta_min,
        );
        let agreed = s.expected_response.matches(decision.response_mode);
        if agreed {
            matches += 1;
        }
        if verbose || !agreed {
            println!(
                "  scenario {}: {} expected {}, engine {} via {:?}",
                s.scenario_id,
                s.emergency_case,
                s.expected_response.label(),
                decision.response_mode.label(),
                decision.rule_triggered,
            );
        }
        if !agreed {
            results.push(check(
                &format!("scenario_{}", s.scenario_id),
                false,
                format!(
                    "expected {}, engine chose {}",
                    s.expected_response.label(),
                    decision.response_mode.label()
                ),
            ));
        }
    }

    results.push(check(
        "scenario_decisions",
        matches == scenarios.len(),
        format!("{}/{} expected decisions reproduced", matches, scenarios.len()),
    ));

    let warning_free = scenarios
        .iter()
        .filter(|s| {
            validate_inputs(
                s.weather_risk_pct,
                f64::from(s.harm_threshold_min),
                s.ground_eta_min,
                s.air_eta_min,
            )
            .is_empty()
        })
        .count();
    results.push(check(
        "scenario_inputs_clean",
        warning_free == scenarios.len(),
        format!("{}/{} scenarios free of advisory warnings", warning_free, scenarios.len()),
    ));

    results
}

// ── 3. Dispatch case sweep ──────────────────────────────────────────────

fn validate_dispatch_cases(verbose: bool) -> Vec<TestResult> {
    println!("--- Dispatch Case Sweep ---");
    let mut results = Vec::new();

    let cases = match parse_dispatch_cases(CASES_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("cases_parse", false, format!("{}", e)));
            return results;
        }
    };

    let mut matches = 0usize;
    for c in &cases {
        let decision = dispatch(
            c.weather_risk_pct,
            f64::from(c.harm_threshold_min),
            c.ground_eta_min,
            c.air_eta_min,
        );
        let agreed = c.expected_response.matches(decision.response_mode);
        if agreed {
            matches += 1;
        }
        if verbose || !agreed {
            println!(
                "  case {}: {} expected {}, engine {} via {:?}",
                c.case_id,
                c.case_name,
                c.expected_response.label(),
                decision.response_mode.label(),
                decision.rule_triggered,
            );
        }
    }

    results.push(check(
        "case_decisions",
        matches == cases.len(),
        format!("{}/{} expected decisions reproduced", matches, cases.len()),
    ));

    results
}

// ── 4. Triage sweep ─────────────────────────────────────────────────────

fn validate_triage(verbose: bool) -> Vec<TestResult> {
    println!("--- Triage Sweep ---");
    let mut results = Vec::new();

    struct TriageCase {
        name: &'static str,
        symptoms: &'static [&'static str],
        free_text: &'static str,
        voice_stress: Option<f64>,
        expect_severity: u8,
        expect_category: MedicalCategory,
        expect_escalate: bool,
    }

    let sweep = [
        TriageCase {
            name: "severe_bleeding_red_flag",
            symptoms: &["severe_bleeding"],
            free_text: "deep cut, blood will not stop with pressure",
            voice_stress: Some(0.75),
            expect_severity: 3,
            expect_category: MedicalCategory::TraumaBleeding,
            expect_escalate: true,
        },
        TriageCase {
            name: "crushing_chest_pain_red_flag",
            symptoms: &["chest_pain_crushing"],
            free_text: "crushing pressure radiating to left arm",
            voice_stress: Some(0.85),
            expect_severity: 3,
            expect_category: MedicalCategory::Cardiac,
            expect_escalate: true,
        },
        TriageCase {
            name: "stroke_signs_red_flags",
            symptoms: &["face_droop", "slurred_speech", "arm_weakness"],
            free_text: "sudden onset, face drooping on one side",
            voice_stress: Some(0.65),
            expect_severity: 3,
            expect_category: MedicalCategory::Neuro,
            expect_escalate: true,
        },
        TriageCase {
            name: "breathing_difficulty_scores_high",
            symptoms: &["shortness_of_breath", "wheezing"],
            free_text: "can only talk in short sentences",
            voice_stress: Some(0.70),
            // 4 + 2 = 6 points: the documented table says level 3.
            expect_severity: 3,
            expect_category: MedicalCategory::Respiratory,
            expect_escalate: true,
        },
        TriageCase {
            name: "fever_with_chills_level_2",
            symptoms: &["high_fever", "chills"],
            free_text: "fever since last night",
            voice_stress: Some(0.40),
            expect_severity: 2,
            expect_category: MedicalCategory::InfectionFever,
            expect_escalate: false,
        },
        TriageCase {
            name: "mild_headache_level_1",
            symptoms: &["headache", "mild_pain"],
            free_text: "dull headache for a few hours",
            voice_stress: Some(0.20),
            expect_severity: 1,
            expect_category: MedicalCategory::OtherUnclear,
            expect_escalate: false,
        },
        TriageCase {
            name: "nausea_with_stress_bonus",
            symptoms: &["nausea"],
            free_text: "",
            voice_stress: Some(0.85),
            // 1 + 1 stress bonus = 2 points, still level 1.
            expect_severity: 1,
            expect_category: MedicalCategory::GiDehydration,
            expect_escalate: false,
        },
    ];

    let mut agreed = 0usize;
    for case in &sweep {
        let r = triage(case.symptoms, case.free_text, Some(10), case.voice_stress);
        let ok = r.severity_level == case.expect_severity
            && r.category == case.expect_category
            && r.escalate == case.expect_escalate;
        if ok {
            agreed += 1;
        }
        if verbose || !ok {
            println!(
                "  {}: severity {} ({} expected), category {:?}, escalate {}",
                case.name, r.severity_level, case.expect_severity, r.category, r.escalate,
            );
        }
    }
    results.push(check(
        "triage_sweep",
        agreed == sweep.len(),
        format!("{}/{} triage expectations reproduced", agreed, sweep.len()),
    ));

    let empty = triage(&[], "", None, None);
    results.push(check(
        "triage_empty_input",
        empty.severity_level == 0 && !empty.followup_questions.is_empty(),
        format!(
            "severity 0 with {} follow-up questions",
            empty.followup_questions.len()
        ),
    ));

    results
}

// ── 5. Categorizer ──────────────────────────────────────────────────────

fn validate_categorizer(verbose: bool) -> Vec<TestResult> {
    println!("--- Categorizer ---");
    let mut results = Vec::new();

    let catalog = match parse_catalog(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("catalog_parse", false, format!("{}", e)));
            return results;
        }
    };

    // Exact matches on real catalog names.
    for name in ["Cardiac Arrest", "COPD Exacerbation", "Severe Anaphylaxis"] {
        let m = categorize(name, &[], &catalog);
        let ok = m
            .as_ref()
            .map(|m| m.method == MatchMethod::Exact && (m.confidence - 1.0).abs() < f64::EPSILON)
            .unwrap_or(false);
        results.push(check(
            &format!("exact_{}", name.to_lowercase().replace(' ', "_")),
            ok,
            m.map(|m| format!("matched '{}' at {:.2}", m.case_name, m.confidence))
                .unwrap_or_else(|| "no match".to_string()),
        ));
    }

    // Fuzzy queries resolve to the right entries.
    let fuzzy = [
        ("sudden collapse no pulse", "Cardiac Arrest"),
        ("wheezing cannot speak", "Severe Asthma Attack"),
        ("face droop slurred speech", "Acute Ischemic Stroke"),
    ];
    for (query, expected) in fuzzy {
        let m = categorize(query, &[], &catalog);
        let ok = m.as_ref().map(|m| m.case_name == expected).unwrap_or(false);
        if verbose {
            if let Some(m) = &m {
                println!(
                    "  '{}' → '{}' ({:?}, {:.2})",
                    query, m.case_name, m.method, m.confidence
                );
            }
        }
        results.push(check(
            &format!("fuzzy_{}", expected.to_lowercase().replace(' ', "_")),
            ok,
            m.map(|m| format!("'{}' → '{}' at {:.2}", query, m.case_name, m.confidence))
                .unwrap_or_else(|| format!("'{}' found nothing", query)),
        ));
    }

    // Nonsense stays unmatched.
    let nonsense = categorize("bicycle parade festival", &[], &catalog);
    results.push(check(
        "nonsense_rejected",
        nonsense.is_none(),
        "unrelated query rejected below score threshold".to_string(),
    ));

    results
}

// ── 6. Roster & matching ────────────────────────────────────────────────

fn validate_matching(verbose: bool) -> Vec<TestResult> {
    println!("--- Roster & Matching ---");
    let mut results = Vec::new();

    let roster = generate_roster(DEFAULT_ROSTER_SEED);
    results.push(check(
        "roster_size",
        roster.len() == 15,
        format!("{} medics generated", roster.len()),
    ));

    let again = generate_roster(DEFAULT_ROSTER_SEED);
    let identical = roster
        .iter()
        .zip(again.iter())
        .all(|(a, b)| a.id == b.id && a.status == b.status && a.location == b.location);
    results.push(check(
        "roster_deterministic",
        identical,
        "same seed reproduces the same roster".to_string(),
    ));

    let available = roster
        .iter()
        .filter(|m| m.status == MedicStatus::Available)
        .count();
    results.push(check(
        "roster_has_availability",
        available > 0,
        format!("{}/15 medics available", available),
    ));

    // Ground-only: no medic needed.
    let ground = assign_medic(
        &roster,
        ResponseMode::Ambulance,
        MedicalCategory::Cardiac,
        3,
        None,
        1,
    );
    results.push(check(
        "ground_only_no_medic",
        matches!(ground, MatchOutcome::NoMedicNeeded { .. }),
        "ground-only response skips matching".to_string(),
    ));

    // Aerial: an assignment comes back, deterministically.
    let first = assign_medic(
        &roster,
        ResponseMode::Both,
        MedicalCategory::Cardiac,
        3,
        None,
        7,
    );
    let second = assign_medic(
        &roster,
        ResponseMode::Both,
        MedicalCategory::Cardiac,
        3,
        None,
        7,
    );
    match (&first, &second) {
        (MatchOutcome::Assigned(a), MatchOutcome::Assigned(b)) => {
            if verbose {
                println!(
                    "  assigned {} ({}, {:.3}) at {:.2} km",
                    a.medic.medic.name,
                    a.medic.medic.specialty.label(),
                    a.medic.composite_score,
                    a.medic.distance_km,
                );
            }
            results.push(check(
                "assignment_deterministic",
                a.medic.medic.id == b.medic.medic.id
                    && (a.medic.composite_score - b.medic.composite_score).abs() < f64::EPSILON,
                format!("seed 7 assigns {} twice", a.medic.medic.id),
            ));
            results.push(check(
                "assignment_alternatives",
                a.alternatives.len() <= 3,
                format!("{} alternatives returned", a.alternatives.len()),
            ));
            results.push(check(
                "assignment_roster_view",
                a.roster_view.len() == roster.len()
                    && a.roster_view.iter().any(|r| r.display_status == "En Route"),
                "full roster annotated with an en-route medic".to_string(),
            ));
            results.push(check(
                "assignment_score_bounds",
                a.medic.composite_score > 0.0 && a.medic.composite_score <= 1.0,
                format!("composite score {:.3}", a.medic.composite_score),
            ));
        }
        _ => {
            results.push(check(
                "assignment_returned",
                false,
                "aerial response produced no assignment".to_string(),
            ));
        }
    }

    // The roster is never mutated by matching.
    let untouched = roster
        .iter()
        .zip(generate_roster(DEFAULT_ROSTER_SEED).iter())
        .all(|(a, b)| a.status == b.status);
    results.push(check(
        "roster_immutable",
        untouched,
        "matching left roster statuses untouched".to_string(),
    ));

    results
}

// ── 7. Landing zones ────────────────────────────────────────────────────

fn validate_landing_zones(verbose: bool) -> Vec<TestResult> {
    println!("--- Landing Zones ---");
    let mut results = Vec::new();

    let zones = match parse_landing_zones(ZONES_JSON) {
        Ok(z) => z,
        Err(e) => {
            results.push(check("zones_parse", false, format!("{}", e)));
            return results;
        }
    };

    let nearest = nearest_zone(&zones, DEFAULT_PATIENT_LAT, DEFAULT_PATIENT_LON);
    match &nearest {
        Some(fix) => {
            if verbose {
                println!(
                    "  nearest: {} at {:.2} km {} ({:.1} min flight)",
                    fix.name,
                    fix.distance_km,
                    bearing_to_cardinal(fix.bearing_deg),
                    fix.flight_time_min,
                );
            }
            results.push(check(
                "nearest_zone",
                fix.name == "Riverside Park",
                format!("nearest is {} at {:.2} km", fix.name, fix.distance_km),
            ));
            results.push(check(
                "nearest_distance_sane",
                fix.distance_km > 0.3 && fix.distance_km < 1.0,
                format!("{:.2} km from the default patient location", fix.distance_km),
            ));
            results.push(check(
                "nearest_flight_time",
                fix.flight_time_min > 0.0 && fix.flight_time_min < 2.0,
                format!("{:.1} min estimated flight", fix.flight_time_min),
            ));
        }
        None => {
            results.push(check(
                "nearest_zone",
                false,
                "no nearest zone found".to_string(),
            ));
        }
    }

    let sorted = zones_by_distance(&zones, DEFAULT_PATIENT_LAT, DEFAULT_PATIENT_LON);
    let in_order = sorted
        .windows(2)
        .all(|pair| pair[0].distance_km <= pair[1].distance_km);
    results.push(check(
        "zones_sorted",
        in_order && sorted.len() == 6,
        format!("{} valid zones sorted by distance (placeholder dropped)", sorted.len()),
    ));

    let nearby = zones_within_radius(&zones, 1.0, DEFAULT_PATIENT_LAT, DEFAULT_PATIENT_LON);
    results.push(check(
        "zones_within_radius",
        !nearby.is_empty()
            && nearby.len() < sorted.len()
            && nearby.iter().all(|z| z.distance_km <= 1.0),
        format!("{} zones within 1 km", nearby.len()),
    ));

    let stats = zone_stats(&zones, DEFAULT_PATIENT_LAT, DEFAULT_PATIENT_LON);
    results.push(check(
        "zone_stats",
        stats.count == 6 && stats.nearest_km <= stats.mean_km && stats.mean_km <= stats.farthest_km,
        format!(
            "{} zones, {:.2}-{:.2} km (mean {:.2})",
            stats.count, stats.nearest_km, stats.farthest_km, stats.mean_km
        ),
    ));

    results
}
