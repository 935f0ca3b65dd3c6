//! Weighted composite ranking of available medics.
//!
//! Scores every available roster member against the case (distance,
//! specialty fit, workload, rating, certification) and picks the highest
//! composite. Matching never mutates the roster, so repeated calls with
//! the same inputs return the same assignment.
//!
//! Distance here is the planar degree-delta approximation — the
//! landing-zone selector uses true haversine. Keep them separate.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::dispatch::ResponseMode;
use crate::geo::{self, GeoPoint, TravelMode};
use crate::triage::MedicalCategory;

/// Distance beyond which the distance factor bottoms out.
pub const MAX_RANGE_KM: f64 = 20.0;

// Composite weights. Must sum to 1.0.
const DISTANCE_WEIGHT: f64 = 0.40;
const SPECIALTY_WEIGHT: f64 = 0.30;
const WORKLOAD_WEIGHT: f64 = 0.15;
const RATING_WEIGHT: f64 = 0.10;
const CERTIFICATION_WEIGHT: f64 = 0.05;

/// Responder specialty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Cardiac,
    Trauma,
    Respiratory,
    Neuro,
    Pediatric,
    General,
}

impl Specialty {
    /// Whether this specialty is an exact fit for a triage category.
    pub fn covers(self, category: MedicalCategory) -> bool {
        match self {
            Self::Cardiac => matches!(category, MedicalCategory::Cardiac),
            Self::Trauma => matches!(category, MedicalCategory::TraumaBleeding),
            Self::Respiratory => matches!(category, MedicalCategory::Respiratory),
            Self::Neuro => matches!(category, MedicalCategory::Neuro),
            Self::Pediatric => false,
            Self::General => matches!(
                category,
                MedicalCategory::InfectionFever
                    | MedicalCategory::GiDehydration
                    | MedicalCategory::Allergic
                    | MedicalCategory::MentalHealth
                    | MedicalCategory::OtherUnclear
            ),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cardiac => "cardiac",
            Self::Trauma => "trauma",
            Self::Respiratory => "respiratory",
            Self::Neuro => "neuro",
            Self::Pediatric => "pediatric",
            Self::General => "general",
        }
    }
}

/// Certification tier, mapped to a fixed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Certification {
    Paramedic,
    EmtAdvanced,
    CriticalCare,
}

impl Certification {
    pub fn score(self) -> f64 {
        match self {
            Self::Paramedic => 0.7,
            Self::EmtAdvanced => 0.85,
            Self::CriticalCare => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Paramedic => "paramedic",
            Self::EmtAdvanced => "emt_advanced",
            Self::CriticalCare => "critical_care",
        }
    }
}

/// Availability state. Matching only considers `Available` members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicStatus {
    Available,
    OnMission,
    OffDuty,
}

impl MedicStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::OnMission => "On Mission",
            Self::OffDuty => "Off Duty",
        }
    }
}

/// One roster member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medic {
    pub id: String,
    pub name: String,
    pub specialty: Specialty,
    pub certification: Certification,
    pub location: GeoPoint,
    pub status: MedicStatus,
    /// Current workload percentage, 0-100.
    pub current_load: u8,
    pub missions_completed: u32,
    /// 0.0 to 5.0.
    pub rating: f64,
    pub languages: Vec<String>,
}

/// Per-factor contributions to a composite score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub distance_score: f64,
    pub specialty_score: f64,
    pub workload_score: f64,
    pub rating_score: f64,
    pub certification_score: f64,
}

/// A medic with their computed score for one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMedic {
    pub medic: Medic,
    pub composite_score: f64,
    pub distance_km: f64,
    pub eta_minutes: f64,
    pub breakdown: MatchBreakdown,
}

/// Roster row annotated for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub specialty: Specialty,
    pub display_status: String,
    pub location: GeoPoint,
}

/// A successful assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub medic: ScoredMedic,
    pub reasoning: Vec<String>,
    /// Up to three runner-ups, best first.
    pub alternatives: Vec<ScoredMedic>,
    /// Full roster annotated with display status; the assigned medic
    /// shows as en route.
    pub roster_view: Vec<RosterEntry>,
    pub patient_location: GeoPoint,
}

/// Outcome of a matching request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchOutcome {
    Assigned(Box<Assignment>),
    /// Ground-only response: no aerial medic required.
    NoMedicNeeded { reason: String },
    /// Nobody on the roster is available right now.
    NoneAvailable { reason: String },
}

impl MatchOutcome {
    pub fn assigned(&self) -> Option<&Assignment> {
        match self {
            Self::Assigned(a) => Some(a),
            _ => None,
        }
    }
}

/// Specialty fit: exact category membership 1.0, general fallback 0.7,
/// anything else 0.4.
pub fn specialty_score(specialty: Specialty, category: MedicalCategory) -> f64 {
    if specialty.covers(category) {
        1.0
    } else if specialty == Specialty::General {
        0.7
    } else {
        0.4
    }
}

/// Score one medic against a case at a patient location.
pub fn score_medic(medic: &Medic, category: MedicalCategory, patient: GeoPoint) -> ScoredMedic {
    let distance_km = geo::planar_distance_km(medic.location, patient);
    let eta_minutes = geo::eta_minutes(distance_km, TravelMode::Aerial);

    let breakdown = MatchBreakdown {
        distance_score: (1.0 - distance_km / MAX_RANGE_KM).max(0.0),
        specialty_score: specialty_score(medic.specialty, category),
        workload_score: 1.0 - f64::from(medic.current_load) / 100.0,
        rating_score: medic.rating / 5.0,
        certification_score: medic.certification.score(),
    };

    let composite_score = breakdown.distance_score * DISTANCE_WEIGHT
        + breakdown.specialty_score * SPECIALTY_WEIGHT
        + breakdown.workload_score * WORKLOAD_WEIGHT
        + breakdown.rating_score * RATING_WEIGHT
        + breakdown.certification_score * CERTIFICATION_WEIGHT;

    ScoredMedic {
        medic: medic.clone(),
        composite_score,
        distance_km,
        eta_minutes,
        breakdown,
    }
}

/// Rank the roster for a case and pick the best available medic.
///
/// Ground-only responses short-circuit; an empty available pool returns
/// an explicit no-match outcome. The roster is read, never written.
pub fn find_best_match(
    response_mode: ResponseMode,
    category: MedicalCategory,
    severity: u8,
    patient: GeoPoint,
    roster: &[Medic],
) -> MatchOutcome {
    if !response_mode.includes_aerial() {
        return MatchOutcome::NoMedicNeeded {
            reason: "Ground ambulance only, no aerial medic needed".to_string(),
        };
    }

    let mut scored: Vec<ScoredMedic> = roster
        .iter()
        .filter(|m| m.status == MedicStatus::Available)
        .map(|m| score_medic(m, category, patient))
        .collect();

    if scored.is_empty() {
        return MatchOutcome::NoneAvailable {
            reason: "No medics currently available".to_string(),
        };
    }

    // Stable sort keeps roster order on exact ties.
    scored.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(Ordering::Equal)
    });

    let best = scored.remove(0);
    let alternatives: Vec<ScoredMedic> = scored.into_iter().take(3).collect();

    let reasoning = vec![
        format!(
            "Specialty match: {} for severity {} {} case",
            best.medic.specialty.label(),
            severity,
            category.label()
        ),
        format!(
            "Distance: {:.2} km (ETA {:.1} min)",
            best.distance_km, best.eta_minutes
        ),
        format!("Certification: {}", best.medic.certification.label()),
        format!(
            "Rating: {}/5.0 ({} missions)",
            best.medic.rating, best.medic.missions_completed
        ),
    ];

    let roster_view = roster
        .iter()
        .map(|m| RosterEntry {
            id: m.id.clone(),
            name: m.name.clone(),
            specialty: m.specialty,
            display_status: if m.id == best.medic.id {
                "En Route".to_string()
            } else {
                m.status.label().to_string()
            },
            location: m.location,
        })
        .collect();

    MatchOutcome::Assigned(Box::new(Assignment {
        medic: best,
        reasoning,
        alternatives,
        roster_view,
        patient_location: patient,
    }))
}
