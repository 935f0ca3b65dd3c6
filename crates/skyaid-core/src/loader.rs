//! Reference-data loading and normalization.
//!
//! The four reference files arrive in heterogeneous shapes: flat JSON
//! arrays or a nested `{"sheets": {...}}` wrapper, with field names that
//! drifted over time (`"Weather Risk"` vs `weather_risk_score`). Loaders
//! coerce everything into the canonical structs before any engine sees
//! it. Malformed fields degrade to safe defaults with a `log::warn!`;
//! only a missing or undecodable file is a hard error.

use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use skyaid_logic::catalog::{normalize_case_name, CatalogCase};
use skyaid_logic::dispatch::ResponseMode;
use skyaid_logic::landing::LandingZone;

/// Fallback harm window in minutes when a time string cannot be parsed.
pub const DEFAULT_HARM_WINDOW: (u32, u32) = (30, 30);

/// What a reference record says the dispatcher should do.
///
/// Source data only distinguishes ground from aerial; the engine's
/// `Both` satisfies an aerial expectation since the aerial component is
/// what the label asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedResponse {
    Ambulance,
    DoctorDrone,
}

impl ExpectedResponse {
    pub fn matches(self, actual: ResponseMode) -> bool {
        match self {
            Self::Ambulance => actual == ResponseMode::Ambulance,
            Self::DoctorDrone => actual.includes_aerial(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ambulance => "AMBULANCE",
            Self::DoctorDrone => "DOCTOR_DRONE",
        }
    }
}

/// A normalized dispatch scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: u32,
    pub location: String,
    pub time_of_day: String,
    pub emergency_case: String,
    pub severity: String,
    pub severity_level: u8,
    pub weather_risk_pct: f64,
    pub harm_threshold_min: u32,
    pub harm_threshold_max: u32,
    pub ground_eta_min: f64,
    pub air_eta_min: f64,
    pub voice_stress_score: f64,
    pub expected_response: ExpectedResponse,
    pub rationale: String,
}

/// A normalized dispatch test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchCase {
    pub case_id: u32,
    pub case_name: String,
    pub severity: String,
    pub severity_level: u8,
    pub weather_risk_pct: f64,
    pub harm_threshold_min: u32,
    pub harm_threshold_max: u32,
    pub ground_eta_min: f64,
    pub air_eta_min: f64,
    pub voice_stress_score: f64,
    pub expected_response: ExpectedResponse,
    pub reasoning: String,
}

/// Whole-file load failure. Field-level problems never produce this —
/// they default and warn instead.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Shape(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Json(e) => write!(f, "json error: {}", e),
            Self::Shape(msg) => write!(f, "unexpected data shape: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ── Normalization helpers ───────────────────────────────────────────────

/// Normalize a weather-risk value to a 0-100 percentage.
///
/// Strings may carry a `%` suffix; numerics at or below 1.0 are treated
/// as fractions. Unparsable input defaults to 0.0.
pub fn normalize_weather_risk(value: Option<&Value>) -> f64 {
    let num = match value {
        None | Some(Value::Null) => {
            return 0.0;
        }
        Some(Value::String(s)) => {
            let clean = s.replace('%', "");
            match clean.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => {
                    warn!("unparsable weather risk '{}', defaulting to 0", s);
                    return 0.0;
                }
            }
        }
        Some(v) => match v.as_f64() {
            Some(n) => n,
            None => {
                warn!("unexpected weather risk value {:?}, defaulting to 0", v);
                return 0.0;
            }
        },
    };

    let pct = if num <= 1.0 { num * 100.0 } else { num };
    pct.clamp(0.0, 100.0)
}

/// Parse a time-to-irreversible-harm string into (min, max) minutes.
///
/// Accepts `"4-6 m"`, `"30 min"`, `">60 m"`, and bare numbers. Swapped
/// ranges are reordered; anything unparsable falls back to
/// [`DEFAULT_HARM_WINDOW`].
pub fn parse_harm_time(raw: &str) -> (u32, u32) {
    let clean = raw.trim().trim_start_matches('>').trim();
    if clean.is_empty() {
        warn!("empty harm time, using default {:?}", DEFAULT_HARM_WINDOW);
        return DEFAULT_HARM_WINDOW;
    }

    if let Some((lo, hi)) = clean.split_once('-') {
        match (parse_minutes(lo), parse_minutes(hi)) {
            (Some(a), Some(b)) => {
                return if a <= b { (a, b) } else { (b, a) };
            }
            _ => {
                warn!("unparsable harm range '{}', using default", raw);
                return DEFAULT_HARM_WINDOW;
            }
        }
    }

    match parse_minutes(clean) {
        // Single values are floored at one minute.
        Some(v) => (v.max(1), v.max(1)),
        None => {
            warn!("unparsable harm time '{}', using default", raw);
            DEFAULT_HARM_WINDOW
        }
    }
}

fn parse_minutes(s: &str) -> Option<u32> {
    strip_unit(s).trim().parse::<f64>().ok().map(|v| v as u32)
}

/// Strip a trailing minutes unit: "minutes", "mins", "min", or "m".
fn strip_unit(s: &str) -> &str {
    let t = s.trim();
    let bytes = t.as_bytes();
    for suffix in ["minutes", "minute", "mins", "min", "m"] {
        let sb = suffix.as_bytes();
        if bytes.len() >= sb.len() && bytes[bytes.len() - sb.len()..].eq_ignore_ascii_case(sb) {
            return t[..t.len() - sb.len()].trim_end();
        }
    }
    t
}

/// Convert a severity word to the numeric 0-3 level. Unknown wording
/// defaults to 2 (high).
pub fn normalize_severity(severity: &str) -> u8 {
    match severity.trim().to_lowercase().as_str() {
        "critical" | "life-threatening" | "emergency" => 3,
        "high" | "serious" => 2,
        "medium" | "moderate" => 1,
        "low" | "minor" => 0,
        "" => 2,
        other => {
            warn!("unknown severity '{}', defaulting to high", other);
            2
        }
    }
}

/// Normalize a free-form decision label.
///
/// Any drone/doctor/aerial/air wording maps to the aerial expectation;
/// everything else (including empty input) is the ambulance default.
pub fn normalize_expected_response(label: &str) -> ExpectedResponse {
    let clean: String = label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                ' '
            }
        })
        .collect();

    let aerial = clean
        .split_whitespace()
        .any(|w| w.contains("DRONE") || w.contains("DOCTOR") || w.contains("AERIAL") || w == "AIR");

    if aerial {
        ExpectedResponse::DoctorDrone
    } else {
        ExpectedResponse::Ambulance
    }
}

// ── Row access helpers ──────────────────────────────────────────────────

/// Unwrap a file body into rows: either a flat array or the first array
/// inside a `{"sheets": {...}}` wrapper.
fn sheet_rows(raw: Value) -> Result<Vec<Value>, LoadError> {
    match raw {
        Value::Array(rows) => Ok(rows),
        Value::Object(map) => {
            let sheets = map
                .get("sheets")
                .and_then(Value::as_object)
                .ok_or_else(|| LoadError::Shape("expected array or sheets object".to_string()))?;
            for sheet in sheets.values() {
                if let Value::Array(rows) = sheet {
                    return Ok(rows.clone());
                }
            }
            Err(LoadError::Shape("sheets object holds no array".to_string()))
        }
        other => Err(LoadError::Shape(format!(
            "expected array or object, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First present field among the given name variants.
fn field<'a>(row: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let obj = row.as_object()?;
    names.iter().find_map(|n| obj.get(*n))
}

fn str_field(row: &Value, names: &[&str], default: &str) -> String {
    field(row, names)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn f64_field(row: &Value, names: &[&str], default: f64) -> f64 {
    match field(row, names) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        Some(v) => v.as_f64().unwrap_or(default),
        None => default,
    }
}

fn u32_field(row: &Value, names: &[&str], default: u32) -> u32 {
    field(row, names)
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(default)
}

/// Harm threshold fields may be a range string or a bare number.
fn harm_field(row: &Value, names: &[&str]) -> (u32, u32) {
    match field(row, names) {
        Some(Value::String(s)) => parse_harm_time(s),
        Some(v) => match v.as_f64() {
            Some(n) if n > 0.0 => {
                let n = n as u32;
                (n.max(1), n.max(1))
            }
            _ => DEFAULT_HARM_WINDOW,
        },
        None => DEFAULT_HARM_WINDOW,
    }
}

// ── Loaders ─────────────────────────────────────────────────────────────

/// Parse the scenario list from a JSON string.
pub fn parse_scenarios(body: &str) -> Result<Vec<Scenario>, LoadError> {
    let rows = sheet_rows(serde_json::from_str(body)?)?;

    let scenarios = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            if !row.is_object() {
                warn!("scenario {} is not an object, skipping", idx + 1);
                return None;
            }
            let severity = str_field(row, &["severity", "Severity"], "High");
            let (harm_min, harm_max) =
                harm_field(row, &["harm_threshold_min", "Harm Threshold (min)"]);
            Some(Scenario {
                scenario_id: u32_field(row, &["scenario_id", "Scenario ID"], idx as u32 + 1),
                location: str_field(row, &["location", "Location"], "Unknown"),
                time_of_day: str_field(row, &["time_of_day", "Time of Day"], "Unknown"),
                emergency_case: str_field(
                    row,
                    &["emergency_case", "Emergency Case"],
                    "Unknown Emergency",
                ),
                severity_level: normalize_severity(&severity),
                severity,
                weather_risk_pct: normalize_weather_risk(field(
                    row,
                    &["weather_risk_score", "Weather Risk"],
                )),
                harm_threshold_min: harm_min,
                harm_threshold_max: harm_max,
                ground_eta_min: f64_field(row, &["ground_time_min", "Ground Time (min)"], 20.0),
                air_eta_min: f64_field(row, &["air_time_min", "Air Time (min)"], 3.6),
                voice_stress_score: f64_field(row, &["voice_stress_score"], 0.0),
                expected_response: normalize_expected_response(&str_field(
                    row,
                    &["ai_decision", "AI Decision"],
                    "",
                )),
                rationale: str_field(row, &["rationale", "Rationale"], ""),
            })
        })
        .collect();

    Ok(scenarios)
}

/// Parse the dispatch-case list from a JSON string.
pub fn parse_dispatch_cases(body: &str) -> Result<Vec<DispatchCase>, LoadError> {
    let rows = sheet_rows(serde_json::from_str(body)?)?;

    let cases = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            if !row.is_object() {
                warn!("dispatch case {} is not an object, skipping", idx + 1);
                return None;
            }
            let severity = str_field(row, &["severity", "Severity"], "High");
            let (harm_min, harm_max) = harm_field(row, &["harm_threshold_min", "Harm Limit (Min)"]);
            Some(DispatchCase {
                case_id: idx as u32 + 1,
                case_name: str_field(row, &["case_name", "Case"], "Unknown Case"),
                severity_level: normalize_severity(&severity),
                severity,
                weather_risk_pct: normalize_weather_risk(field(
                    row,
                    &["weather_risk_score", "Weather Risk"],
                )),
                harm_threshold_min: harm_min,
                harm_threshold_max: harm_max,
                ground_eta_min: f64_field(row, &["ground_eta_min", "Ground ETA"], 20.0),
                air_eta_min: f64_field(row, &["air_eta_min", "Air ETA"], 3.6),
                voice_stress_score: f64_field(row, &["voice_stress_score"], 0.0),
                expected_response: normalize_expected_response(&str_field(
                    row,
                    &["ai_dispatch_prediction", "AI Dispatch"],
                    "",
                )),
                reasoning: str_field(row, &["reasoning", "Reasoning"], ""),
            })
        })
        .collect();

    Ok(cases)
}

/// Parse the landing-zone list from a JSON string.
///
/// Out-of-range coordinates are kept (the selector skips them) but
/// warned about here so bad reference data is visible at load time.
pub fn parse_landing_zones(body: &str) -> Result<Vec<LandingZone>, LoadError> {
    let rows = sheet_rows(serde_json::from_str(body)?)?;

    let zones = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            if !row.is_object() {
                warn!("landing zone {} is not an object, skipping", idx + 1);
                return None;
            }
            let zone = LandingZone {
                id: idx as u32 + 1,
                name: str_field(row, &["name", "Place Name"], &format!("Zone {}", idx + 1)),
                area: str_field(row, &["area", "Estimated Landing Area"], "Unknown"),
                latitude: f64_field(row, &["latitude", "Latitude"], 0.0),
                longitude: f64_field(row, &["longitude", "Longitude"], 0.0),
            };
            if !(-90.0..=90.0).contains(&zone.latitude)
                || !(-180.0..=180.0).contains(&zone.longitude)
            {
                warn!(
                    "zone '{}' has out-of-range coordinates ({}, {})",
                    zone.name, zone.latitude, zone.longitude
                );
            }
            Some(zone)
        })
        .collect();

    Ok(zones)
}

/// Parse the medical reference catalog from a JSON string.
pub fn parse_catalog(body: &str) -> Result<Vec<CatalogCase>, LoadError> {
    let rows = sheet_rows(serde_json::from_str(body)?)?;

    let catalog = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            if !row.is_object() {
                warn!("catalog entry {} is not an object, skipping", idx + 1);
                return None;
            }
            let case_name = str_field(row, &["case_name", "Case"], "Unknown Case");
            let severity = str_field(row, &["severity", "Severity"], "High");
            let harm_raw = str_field(row, &["time_to_irreversible_harm"], "30 m");
            let (harm_min, harm_max) = parse_harm_time(&harm_raw);
            Some(CatalogCase {
                id: u32_field(row, &["id"], idx as u32 + 1),
                case_name_normalized: normalize_case_name(&case_name),
                case_name,
                category: str_field(row, &["category", "Category"], "Unknown"),
                description: str_field(row, &["description", "Description"], ""),
                severity_level: normalize_severity(&severity),
                severity,
                ctas: u32_field(row, &["ctas"], 2) as u8,
                harm_threshold_min: harm_min,
                harm_threshold_max: harm_max,
                harm_threshold_raw: harm_raw,
                intervention: str_field(row, &["intervention_first_5m", "intervention"], ""),
                equipment: str_field(row, &["required_core_equipments", "equipment"], ""),
            })
        })
        .collect();

    Ok(catalog)
}

// ── File-level wrappers ─────────────────────────────────────────────────

pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>, LoadError> {
    parse_scenarios(&fs::read_to_string(path)?)
}

pub fn load_dispatch_cases(path: &Path) -> Result<Vec<DispatchCase>, LoadError> {
    parse_dispatch_cases(&fs::read_to_string(path)?)
}

pub fn load_landing_zones(path: &Path) -> Result<Vec<LandingZone>, LoadError> {
    parse_landing_zones(&fs::read_to_string(path)?)
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogCase>, LoadError> {
    parse_catalog(&fs::read_to_string(path)?)
}
