//! Rule-based dispatch decision engine.
//!
//! Evaluates three ordered threshold rules (weather safety, harm-window
//! survival, time-savings efficiency) and falls back to a ground
//! ambulance. First matching rule wins. Every boundary comparison is
//! strict `>`, so an exactly-at-threshold input falls through to the
//! next rule.

use serde::{Deserialize, Serialize};

/// Weather risk percentage above which aerial operations are unsafe.
pub const WEATHER_RISK_THRESHOLD: f64 = 35.0;

/// Minutes of time savings that justify launching the aerial unit.
pub const EFFICIENCY_TIME_DELTA: f64 = 10.0;

/// Which units get dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseMode {
    /// Ground ambulance only.
    Ambulance,
    /// Aerial unit only.
    DoctorDrone,
    /// Simultaneous aerial unit and ground ambulance.
    Both,
}

impl ResponseMode {
    /// Whether an aerial unit is part of the response.
    pub fn includes_aerial(self) -> bool {
        matches!(self, Self::DoctorDrone | Self::Both)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ambulance => "AMBULANCE",
            Self::DoctorDrone => "DOCTOR_DRONE",
            Self::Both => "BOTH",
        }
    }
}

/// Which rule made the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchRule {
    SafetyFilter,
    EmergencyOverride,
    EfficiencyOptimization,
    Default,
}

/// Decision output, produced fresh on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    pub response_mode: ResponseMode,
    pub rule_triggered: DispatchRule,
    /// Human-readable reasoning, in evaluation order.
    pub reasons: Vec<String>,

    // Inputs, echoed for reference.
    pub weather_risk_pct: f64,
    pub harm_threshold_min: f64,
    pub ground_eta_min: f64,
    pub air_eta_min: f64,

    // Derived values.
    pub time_delta_min: f64,
    pub exceeds_weather: bool,
    pub exceeds_harm: bool,
    pub exceeds_efficiency: bool,

    pub confidence: f64,
}

/// Pick a response mode for the given situational parameters.
///
/// Rules in priority order:
/// 1. Weather risk above 35% grounds the aerial unit regardless of
///    everything else.
/// 2. Ground ETA beyond the irreversible-harm window dispatches both
///    units, aerial for speed and ground for transport.
/// 3. Aerial savings above 10 minutes dispatches both units.
/// 4. Otherwise the ground ambulance is sufficient.
///
/// Total over the numeric domain; performs no range validation (see
/// [`validate_inputs`]).
pub fn dispatch(
    weather_risk_pct: f64,
    harm_threshold_min: f64,
    ground_eta_min: f64,
    air_eta_min: f64,
) -> DispatchResult {
    let time_delta = ground_eta_min - air_eta_min;

    let exceeds_weather = weather_risk_pct > WEATHER_RISK_THRESHOLD;
    let exceeds_harm = ground_eta_min > harm_threshold_min;
    let exceeds_efficiency = time_delta > EFFICIENCY_TIME_DELTA;

    let (response_mode, rule_triggered, reasons, confidence) = if exceeds_weather {
        (
            ResponseMode::Ambulance,
            DispatchRule::SafetyFilter,
            vec![
                format!(
                    "Weather risk {:.1}% exceeds safety threshold ({}%)",
                    weather_risk_pct, WEATHER_RISK_THRESHOLD
                ),
                "Aerial operations unsafe, dispatching ground ambulance".to_string(),
            ],
            1.0,
        )
    } else if exceeds_harm {
        (
            ResponseMode::Both,
            DispatchRule::EmergencyOverride,
            vec![
                format!(
                    "Ground ETA ({:.1} min) exceeds harm threshold ({} min)",
                    ground_eta_min, harm_threshold_min
                ),
                "Critical window: simultaneous aerial unit (speed) and ambulance (transport)"
                    .to_string(),
                format!(
                    "Aerial arrival in {:.1} min saves {:.1} min",
                    air_eta_min, time_delta
                ),
            ],
            0.98,
        )
    } else if exceeds_efficiency {
        (
            ResponseMode::Both,
            DispatchRule::EfficiencyOptimization,
            vec![
                format!(
                    "Aerial unit saves {:.1} min (threshold: {} min)",
                    time_delta, EFFICIENCY_TIME_DELTA
                ),
                format!(
                    "Ground ETA {:.1} min vs aerial ETA {:.1} min",
                    ground_eta_min, air_eta_min
                ),
                "Dispatching aerial unit for immediate aid plus ambulance for transport"
                    .to_string(),
            ],
            0.90,
        )
    } else {
        (
            ResponseMode::Ambulance,
            DispatchRule::Default,
            vec![
                "Ground ambulance is safe and sufficient".to_string(),
                format!("Weather risk acceptable ({:.1}%)", weather_risk_pct),
                format!(
                    "Ground ETA ({:.1} min) within harm threshold ({} min)",
                    ground_eta_min, harm_threshold_min
                ),
                format!(
                    "Time savings ({:.1} min) below efficiency threshold ({} min)",
                    time_delta, EFFICIENCY_TIME_DELTA
                ),
            ],
            0.9,
        )
    };

    DispatchResult {
        response_mode,
        rule_triggered,
        reasons,
        weather_risk_pct,
        harm_threshold_min,
        ground_eta_min,
        air_eta_min,
        time_delta_min: time_delta,
        exceeds_weather,
        exceeds_harm,
        exceeds_efficiency,
        confidence,
    }
}

/// Advisory range checks on dispatch inputs.
///
/// Returns warning strings only. The engine itself stays total and never
/// rejects input; callers decide whether to surface these.
pub fn validate_inputs(
    weather_risk_pct: f64,
    harm_threshold_min: f64,
    ground_eta_min: f64,
    air_eta_min: f64,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if !(0.0..=100.0).contains(&weather_risk_pct) {
        warnings.push(format!(
            "Weather risk {}% outside valid range (0-100%)",
            weather_risk_pct
        ));
    }

    if harm_threshold_min <= 0.0 {
        warnings.push(format!(
            "Harm threshold {} min must be positive",
            harm_threshold_min
        ));
    }

    if ground_eta_min <= 0.0 {
        warnings.push(format!("Ground ETA {} min must be positive", ground_eta_min));
    }

    if air_eta_min <= 0.0 {
        warnings.push(format!("Air ETA {} min must be positive", air_eta_min));
    }

    if air_eta_min > ground_eta_min {
        warnings.push(format!(
            "Air ETA ({} min) slower than ground ({} min), unusual",
            air_eta_min, ground_eta_min
        ));
    }

    if ground_eta_min > 120.0 {
        warnings.push(format!(
            "Ground ETA {} min seems unreasonably high",
            ground_eta_min
        ));
    }

    if air_eta_min > 30.0 {
        warnings.push(format!(
            "Air ETA {} min seems unreasonably high for an aerial unit",
            air_eta_min
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_filter() {
        let r = dispatch(88.0, 4.0, 29.8, 3.6);
        assert_eq!(r.response_mode, ResponseMode::Ambulance);
        assert_eq!(r.rule_triggered, DispatchRule::SafetyFilter);
        assert!((r.confidence - 1.0).abs() < f64::EPSILON);
        assert!(r.exceeds_weather);
    }

    #[test]
    fn test_safety_filter_overrides_everything() {
        // Harm and efficiency thresholds both exceeded, but weather wins.
        let r = dispatch(36.0, 1.0, 100.0, 1.0);
        assert_eq!(r.response_mode, ResponseMode::Ambulance);
        assert_eq!(r.rule_triggered, DispatchRule::SafetyFilter);
    }

    #[test]
    fn test_emergency_override() {
        let r = dispatch(14.0, 4.0, 29.8, 3.6);
        assert_eq!(r.response_mode, ResponseMode::Both);
        assert_eq!(r.rule_triggered, DispatchRule::EmergencyOverride);
        assert!((r.confidence - 0.98).abs() < f64::EPSILON);
        assert!(r.exceeds_harm);
    }

    #[test]
    fn test_efficiency_optimization() {
        // Ground within the harm window, but the aerial unit saves far
        // more than 10 minutes.
        let r = dispatch(6.0, 35.0, 29.8, 3.6);
        assert_eq!(r.response_mode, ResponseMode::Both);
        assert_eq!(r.rule_triggered, DispatchRule::EfficiencyOptimization);
        assert!((r.confidence - 0.90).abs() < f64::EPSILON);
        assert!(r.exceeds_efficiency);
        assert!(!r.exceeds_harm);
    }

    #[test]
    fn test_default_rule() {
        let r = dispatch(2.0, 15.0, 10.1, 3.6);
        assert_eq!(r.response_mode, ResponseMode::Ambulance);
        assert_eq!(r.rule_triggered, DispatchRule::Default);
        assert!((r.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weather_boundary_is_strict() {
        // Exactly at the threshold must NOT trigger the safety filter.
        let r = dispatch(35.0, 10.0, 15.0, 3.6);
        assert_ne!(r.rule_triggered, DispatchRule::SafetyFilter);
        assert!(!r.exceeds_weather);
        // Ground 15.0 > harm 10.0, so the override fires instead.
        assert_eq!(r.rule_triggered, DispatchRule::EmergencyOverride);
    }

    #[test]
    fn test_efficiency_boundary_is_strict() {
        // Delta of exactly 10.0 minutes falls through to the default.
        let r = dispatch(5.0, 20.0, 13.6, 3.6);
        assert!((r.time_delta_min - 10.0).abs() < 1e-9);
        assert_eq!(r.response_mode, ResponseMode::Ambulance);
        assert_eq!(r.rule_triggered, DispatchRule::Default);
    }

    #[test]
    fn test_harm_boundary_is_strict() {
        // Ground ETA exactly at the harm threshold does not override.
        let r = dispatch(5.0, 12.0, 12.0, 3.6);
        assert_ne!(r.rule_triggered, DispatchRule::EmergencyOverride);
        assert!(!r.exceeds_harm);
    }

    #[test]
    fn test_reasons_populated() {
        for r in [
            dispatch(88.0, 4.0, 29.8, 3.6),
            dispatch(14.0, 4.0, 29.8, 3.6),
            dispatch(6.0, 35.0, 29.8, 3.6),
            dispatch(2.0, 15.0, 10.1, 3.6),
        ] {
            assert!(!r.reasons.is_empty());
            assert!(r.confidence > 0.0 && r.confidence <= 1.0);
        }
    }

    #[test]
    fn test_time_delta_computed() {
        let r = dispatch(2.0, 15.0, 10.1, 3.6);
        assert!((r.time_delta_min - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let a = dispatch(14.0, 4.0, 29.8, 3.6);
        let b = dispatch(14.0, 4.0, 29.8, 3.6);
        assert_eq!(a.response_mode, b.response_mode);
        assert_eq!(a.rule_triggered, b.rule_triggered);
        assert_eq!(a.reasons, b.reasons);
    }

    #[test]
    fn test_includes_aerial() {
        assert!(!ResponseMode::Ambulance.includes_aerial());
        assert!(ResponseMode::DoctorDrone.includes_aerial());
        assert!(ResponseMode::Both.includes_aerial());
    }

    #[test]
    fn test_validate_clean_inputs() {
        assert!(validate_inputs(14.0, 4.0, 29.8, 3.6).is_empty());
    }

    #[test]
    fn test_validate_bad_inputs() {
        let warnings = validate_inputs(150.0, -5.0, 200.0, 50.0);
        // Out-of-range weather, negative threshold, huge ground ETA,
        // huge air ETA — all reported, none fatal.
        assert!(warnings.len() >= 4);
    }

    #[test]
    fn test_validate_air_slower_than_ground() {
        let warnings = validate_inputs(10.0, 20.0, 5.0, 8.0);
        assert!(warnings.iter().any(|w| w.contains("slower than ground")));
    }
}
