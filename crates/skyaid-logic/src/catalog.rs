//! Token-set fuzzy matching against the medical reference catalog.
//!
//! Two stages: an exact match on normalized case names, then a weighted
//! token-overlap score (query coverage + Jaccard) with substring,
//! category, and critical-keyword bonuses. Best score below 0.1 means
//! no match.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Scores below this are rejected outright.
pub const MIN_MATCH_SCORE: f64 = 0.1;

/// Common words that carry no matching signal.
pub const MEDICAL_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "in", "on", "at", "to", "for", "with", "after",
    "before", "is", "are", "was", "were", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "should", "could", "may", "might", "must", "can", "be", "am",
    "patient", "person",
];

/// High-signal tokens that indicate specific conditions.
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "cardiac",
    "arrest",
    "anaphylaxis",
    "stroke",
    "seizure",
    "unconscious",
    "bleeding",
    "choking",
    "trauma",
    "collapse",
    "respiratory",
    "asthma",
    "copd",
    "heart",
    "chest",
    "pain",
    "breathing",
    "airway",
    "hypoglycemic",
];

/// One entry of the read-only medical reference catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCase {
    pub id: u32,
    pub case_name: String,
    pub case_name_normalized: String,
    pub category: String,
    pub description: String,
    pub severity: String,
    pub severity_level: u8,
    /// Canadian Triage and Acuity Scale value, carried through as-is.
    pub ctas: u8,
    pub harm_threshold_min: u32,
    pub harm_threshold_max: u32,
    pub harm_threshold_raw: String,
    pub intervention: String,
    pub equipment: String,
}

/// How a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    TokenOverlap,
    Partial,
    Fallback,
}

/// Result of matching a case description against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMatch {
    /// The query as supplied by the caller.
    pub query: String,
    pub case_name: String,
    pub category: String,
    pub severity: String,
    pub severity_level: u8,
    pub ctas: u8,
    pub harm_threshold_min: u32,
    pub harm_threshold_max: u32,
    pub harm_threshold_raw: String,
    pub confidence: f64,
    pub method: MatchMethod,
    pub matched_keywords: Vec<String>,
    pub intervention: String,
    pub equipment: String,
    /// Runner-up case names with their scores, best first.
    pub alternatives: Vec<(String, f64)>,
}

/// Normalize a case name for matching: lowercase, punctuation stripped
/// (hyphens kept), whitespace collapsed.
pub fn normalize_case_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_space = true;
    for ch in name.trim().chars() {
        let ch = if ch.is_alphanumeric() || ch == '-' {
            ch.to_ascii_lowercase()
        } else {
            ' '
        };
        if ch == ' ' {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    out.trim_end().to_string()
}

/// Lowercase token set with punctuation and stopwords removed.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            cleaned.push(ch.to_ascii_lowercase());
        } else {
            cleaned.push(' ');
        }
    }
    cleaned
        .split_whitespace()
        .filter(|t| !MEDICAL_STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Jaccard similarity coefficient: |A ∩ B| / |A ∪ B|.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Weighted overlap: 60% query coverage, 40% Jaccard similarity.
///
/// Prioritizes matching the caller's terms while still weighing overall
/// similarity.
pub fn token_overlap_score(query: &BTreeSet<String>, case: &BTreeSet<String>) -> f64 {
    if query.is_empty() || case.is_empty() {
        return 0.0;
    }
    let coverage = query.intersection(case).count() as f64 / query.len() as f64;
    0.6 * coverage + 0.4 * jaccard(query, case)
}

/// Bonus for shared critical keywords: 0.1 each, capped at 0.2.
fn keyword_bonus(query: &BTreeSet<String>, case: &BTreeSet<String>) -> f64 {
    let shared = query
        .intersection(case)
        .filter(|t| CRITICAL_KEYWORDS.contains(&t.as_str()))
        .count();
    (shared as f64 * 0.1).min(0.2)
}

fn score_case(
    case: &CatalogCase,
    query_normalized: &str,
    query_tokens: &BTreeSet<String>,
) -> (f64, Vec<String>) {
    let case_tokens = tokenize(&format!("{} {}", case.case_name, case.description));

    let mut score = token_overlap_score(query_tokens, &case_tokens);

    // Substring bonuses on the normalized names.
    if case.case_name_normalized.contains(query_normalized) {
        score += 0.3;
    } else if query_normalized.contains(&case.case_name_normalized)
        && !case.case_name_normalized.is_empty()
    {
        score += 0.25;
    }

    // Category token bonus.
    let category_tokens = tokenize(&case.category);
    if query_tokens.intersection(&category_tokens).next().is_some() {
        score += 0.1;
    }

    score += keyword_bonus(query_tokens, &case_tokens);

    let matched: Vec<String> = query_tokens.intersection(&case_tokens).cloned().collect();

    (score.min(1.0), matched)
}

/// Match a free-text case description (plus optional symptom tags)
/// against the catalog.
///
/// Returns `None` when the query is empty, the catalog is empty, or the
/// best score falls below [`MIN_MATCH_SCORE`].
pub fn categorize(
    description: &str,
    symptoms: &[&str],
    catalog: &[CatalogCase],
) -> Option<CaseMatch> {
    if catalog.is_empty() {
        return None;
    }

    let mut query_text = description.trim().to_string();
    for s in symptoms {
        query_text.push(' ');
        query_text.push_str(s);
    }
    if query_text.trim().is_empty() {
        return None;
    }

    let query_normalized = normalize_case_name(&query_text);
    let query_tokens = tokenize(&query_text);

    // Stage 1: exact match after normalization.
    for case in catalog {
        if query_normalized == case.case_name_normalized {
            return Some(build_match(
                description,
                case,
                1.0,
                MatchMethod::Exact,
                vec![query_normalized],
                Vec::new(),
            ));
        }
    }

    // Stage 2: scored token overlap.
    let mut scored: Vec<(&CatalogCase, f64, Vec<String>)> = catalog
        .iter()
        .map(|case| {
            let (score, matched) = score_case(case, &query_normalized, &query_tokens);
            (case, score, matched)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let (best_case, best_score, matched) = match scored.first() {
        Some((case, score, matched)) if *score >= MIN_MATCH_SCORE => {
            (*case, *score, matched.clone())
        }
        _ => return None,
    };

    let alternatives: Vec<(String, f64)> = scored
        .iter()
        .skip(1)
        .take(3)
        .filter(|(_, score, _)| *score > MIN_MATCH_SCORE)
        .map(|(case, score, _)| (case.case_name.clone(), round2(*score)))
        .collect();

    // Confidence sits slightly below the raw score for safety.
    let confidence = best_score.min(0.95);

    let method = if best_score >= 0.7 {
        MatchMethod::TokenOverlap
    } else if best_score >= 0.4 {
        MatchMethod::Partial
    } else {
        MatchMethod::Fallback
    };

    Some(build_match(
        description,
        best_case,
        confidence,
        method,
        matched,
        alternatives,
    ))
}

fn build_match(
    query: &str,
    case: &CatalogCase,
    confidence: f64,
    method: MatchMethod,
    matched_keywords: Vec<String>,
    alternatives: Vec<(String, f64)>,
) -> CaseMatch {
    CaseMatch {
        query: query.to_string(),
        case_name: case.case_name.clone(),
        category: case.category.clone(),
        severity: case.severity.clone(),
        severity_level: case.severity_level,
        ctas: case.ctas,
        harm_threshold_min: case.harm_threshold_min,
        harm_threshold_max: case.harm_threshold_max,
        harm_threshold_raw: case.harm_threshold_raw.clone(),
        confidence: round2(confidence),
        method,
        matched_keywords,
        intervention: case.intervention.clone(),
        equipment: case.equipment.clone(),
        alternatives,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Top `n` scored matches for a query, useful for disambiguation.
pub fn top_matches<'a>(
    query: &str,
    catalog: &'a [CatalogCase],
    n: usize,
) -> Vec<(&'a CatalogCase, f64)> {
    if query.trim().is_empty() || catalog.is_empty() {
        return Vec::new();
    }

    let query_normalized = normalize_case_name(query);
    let query_tokens = tokenize(query);

    let mut scored: Vec<(&CatalogCase, f64)> = catalog
        .iter()
        .map(|case| {
            let score = if query_normalized == case.case_name_normalized {
                1.0
            } else {
                score_case(case, &query_normalized, &query_tokens).0
            };
            (case, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(n);
    scored
}

/// All catalog entries in a category (case-insensitive).
pub fn cases_by_category<'a>(category: &str, catalog: &'a [CatalogCase]) -> Vec<&'a CatalogCase> {
    catalog
        .iter()
        .filter(|c| c.category.eq_ignore_ascii_case(category))
        .collect()
}

/// All catalog entries at a severity level.
pub fn cases_by_severity(level: u8, catalog: &[CatalogCase]) -> Vec<&CatalogCase> {
    catalog.iter().filter(|c| c.severity_level == level).collect()
}

/// Display label for a numeric severity level.
pub fn severity_label(level: u8) -> &'static str {
    match level {
        0 => "Insufficient Info",
        1 => "Medium",
        2 => "High",
        3 => "Critical",
        _ => "Unknown",
    }
}
