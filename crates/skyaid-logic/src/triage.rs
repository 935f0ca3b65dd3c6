//! Symptom-point triage scoring.
//!
//! Maps a set of symptom tags (plus an optional voice-stress signal) to a
//! medical category and a 0-3 severity level. Red-flag tags short-circuit
//! to maximum severity; everything else accumulates points from a fixed
//! table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Voice stress at or above this adds one point when symptoms are present.
pub const VOICE_STRESS_THRESHOLD: f64 = 0.80;

/// Symptom tags that alone mandate severity 3 and escalation.
pub const RED_FLAGS: [&str; 14] = [
    "trouble_breathing",
    "choking",
    "turning_blue",
    "chest_pain_crushing",
    "unconscious",
    "not_responding",
    "seizure_now",
    "face_droop",
    "slurred_speech",
    "arm_weakness",
    "severe_bleeding",
    "heavy_bleeding",
    "anaphylaxis_signs",
    "severe_allergy_swelling",
];

/// Follow-up questions returned when there is not enough to score.
pub const FOLLOWUP_QUESTIONS: [&str; 5] = [
    "What is the main symptom?",
    "How long has it been happening?",
    "Is the person conscious and breathing normally?",
    "Is there any bleeding or visible injury?",
    "Can the person speak in full sentences?",
];

/// Point value for a symptom tag. Unknown tags score zero.
pub fn symptom_points(tag: &str) -> u32 {
    match tag {
        // Critical
        "unconscious" | "not_responding" | "fainting" | "severe_bleeding" | "heavy_bleeding"
        | "face_droop" | "slurred_speech" | "arm_weakness" | "stroke_signs"
        | "severe_allergy_swelling" | "anaphylaxis_signs" => 5,
        // Urgent
        "trouble_breathing" | "shortness_of_breath" | "chest_pain" | "chest_pain_crushing"
        | "choking" | "turning_blue" => 4,
        // Concerning
        "moderate_bleeding" | "seizure_now" | "major_trauma" | "head_injury" | "confusion" => 3,
        // Moderate
        "high_fever" | "fever" | "vomiting_severe" | "diarrhea_severe" | "dehydration"
        | "palpitations" | "wheezing" => 2,
        // Mild
        "mild_pain" | "headache" | "rash" | "chills" | "nausea" | "vomiting" | "diarrhea"
        | "panic" | "severe_distress" | "swelling_face_lips" => 1,
        _ => 0,
    }
}

/// Medical category assigned by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalCategory {
    TraumaBleeding,
    Cardiac,
    Respiratory,
    Neuro,
    Allergic,
    InfectionFever,
    GiDehydration,
    MentalHealth,
    OtherUnclear,
}

impl MedicalCategory {
    /// Resolution order when a symptom set spans several categories.
    pub const PRIORITY: [MedicalCategory; 8] = [
        Self::TraumaBleeding,
        Self::Cardiac,
        Self::Respiratory,
        Self::Neuro,
        Self::Allergic,
        Self::InfectionFever,
        Self::GiDehydration,
        Self::MentalHealth,
    ];

    /// Symptom tags belonging to this category.
    pub fn symptom_set(self) -> &'static [&'static str] {
        match self {
            Self::TraumaBleeding => &[
                "severe_bleeding",
                "heavy_bleeding",
                "moderate_bleeding",
                "major_trauma",
                "head_injury",
            ],
            Self::Cardiac => &["chest_pain", "chest_pain_crushing", "palpitations"],
            Self::Respiratory => &[
                "shortness_of_breath",
                "wheezing",
                "choking",
                "trouble_breathing",
                "turning_blue",
            ],
            Self::Neuro => &[
                "seizure_now",
                "fainting",
                "face_droop",
                "slurred_speech",
                "arm_weakness",
                "stroke_signs",
                "confusion",
                "unconscious",
                "not_responding",
            ],
            Self::Allergic => &[
                "rash",
                "swelling_face_lips",
                "anaphylaxis_signs",
                "severe_allergy_swelling",
            ],
            Self::InfectionFever => &["fever", "high_fever", "chills"],
            Self::GiDehydration => &[
                "vomiting",
                "vomiting_severe",
                "diarrhea",
                "diarrhea_severe",
                "dehydration",
                "nausea",
            ],
            Self::MentalHealth => &["panic", "severe_distress"],
            Self::OtherUnclear => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TraumaBleeding => "trauma_bleeding",
            Self::Cardiac => "cardiac",
            Self::Respiratory => "respiratory",
            Self::Neuro => "neuro",
            Self::Allergic => "allergic",
            Self::InfectionFever => "infection_fever",
            Self::GiDehydration => "gi_dehydration",
            Self::MentalHealth => "mental_health",
            Self::OtherUnclear => "other_unclear",
        }
    }
}

/// Scoring details kept for auditability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub symptom_score: u32,
    pub voice_bonus: u32,
    pub total_score: u32,
    pub red_flag: bool,
    pub duration_minutes: Option<u32>,
}

/// Triage output, produced fresh on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageResult {
    pub category: MedicalCategory,
    pub severity_level: u8,
    pub escalate: bool,
    pub confidence: f64,
    /// Non-empty exactly when severity is 0.
    pub followup_questions: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Assign a category from the symptom set, resolving multiple hits by
/// the fixed priority order.
pub fn pick_category(symptoms: &BTreeSet<&str>) -> MedicalCategory {
    for category in MedicalCategory::PRIORITY {
        if category
            .symptom_set()
            .iter()
            .any(|tag| symptoms.contains(tag))
        {
            return category;
        }
    }
    MedicalCategory::OtherUnclear
}

/// Sum the point values of every symptom in the set.
pub fn symptom_score(symptoms: &BTreeSet<&str>) -> u32 {
    symptoms.iter().map(|tag| symptom_points(tag)).sum()
}

/// Map a total point score to a 0-3 severity level.
///
/// 0 points → 0, 1-2 → 1, 3-4 → 2, 5+ → 3.
pub fn severity_for_score(score: u32) -> u8 {
    match score {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        _ => 3,
    }
}

fn has_red_flag(symptoms: &BTreeSet<&str>) -> bool {
    RED_FLAGS.iter().any(|tag| symptoms.contains(tag))
}

fn voice_bonus(base_score: u32, voice_stress: Option<f64>) -> u32 {
    // Stress amplifies apparent severity only when symptoms are present.
    if base_score > 0 && voice_stress.map_or(false, |v| v >= VOICE_STRESS_THRESHOLD) {
        1
    } else {
        0
    }
}

/// Score a call: symptom tags, optional free text, optional duration and
/// voice-stress signal.
///
/// Red flags force severity 3 immediately. Otherwise points accumulate
/// from the fixed table, a voice-stress bonus may add one, and the total
/// maps to a severity level. Escalation happens exactly at severity 3.
pub fn triage(
    symptoms: &[&str],
    free_text: &str,
    duration_minutes: Option<u32>,
    voice_stress: Option<f64>,
) -> TriageResult {
    let symptom_set: BTreeSet<&str> = symptoms.iter().copied().collect();

    // Nothing to go on: ask the fixed follow-up questions.
    if symptom_set.is_empty() && free_text.trim().is_empty() {
        return TriageResult {
            category: MedicalCategory::OtherUnclear,
            severity_level: 0,
            escalate: false,
            confidence: 0.0,
            followup_questions: followups(),
            breakdown: ScoreBreakdown {
                symptom_score: 0,
                voice_bonus: 0,
                total_score: 0,
                red_flag: false,
                duration_minutes,
            },
        };
    }

    let category = pick_category(&symptom_set);
    let red_flag = has_red_flag(&symptom_set);

    let base_score = symptom_score(&symptom_set);
    let bonus = voice_bonus(base_score, voice_stress);
    let total_score = base_score + bonus;

    let severity_level = if red_flag {
        3
    } else {
        severity_for_score(total_score)
    };
    let escalate = severity_level == 3;

    let confidence = match severity_level {
        0 => 0.0,
        3 => 0.90,
        2 => 0.75,
        _ => 0.65,
    };

    TriageResult {
        category,
        severity_level,
        escalate,
        confidence,
        followup_questions: if severity_level == 0 {
            followups()
        } else {
            Vec::new()
        },
        breakdown: ScoreBreakdown {
            symptom_score: base_score,
            voice_bonus: bonus,
            total_score,
            red_flag,
            duration_minutes,
        },
    }
}

fn followups() -> Vec<String> {
    FOLLOWUP_QUESTIONS.iter().map(|q| q.to_string()).collect()
}
