//! Joint strength analysis
//!
//! Estimates the thread stripping strength of both sides of the joint from
//! the engaged length and the mean pitch diameter, takes the lesser as the
//! limiting strength, and grades the safety factor against the required
//! load. The proof load of the weaker part is reported alongside even when
//! the shear numbers pass.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::verdict::{classify, Classification, Finding};
use crate::specs::part::PartSpecification;
use crate::specs::thread::ThreadSpecification;

const PI: Decimal = dec!(3.1415926535897932384626433833);

/// Shear strength as a fraction of tensile strength (von Mises)
const SHEAR_TO_TENSILE: Decimal = dec!(0.577);

/// Internal threads strip at roughly 25% above the external figure
const INTERNAL_THREAD_BONUS: Decimal = dec!(1.25);

/// Safety factor at or above this is fully acceptable
const OPTIMAL_SAFETY_FACTOR: Decimal = dec!(2.0);

/// Safety factor below this blocks the joint
const MINIMUM_SAFETY_FACTOR: Decimal = dec!(1.25);

/// Thread-form shear factor for a tolerance class
///
/// Tighter classes keep more flank in contact at worst case; unknown
/// classes get the conservative floor.
pub fn thread_form_factor(tolerance_class: &str) -> Decimal {
    let class = tolerance_class.trim();
    if class.contains('4') || class.contains('5') {
        dec!(0.85)
    } else if class.contains('6') {
        dec!(0.80)
    } else if class.contains('7') || class.contains('8') {
        dec!(0.75)
    } else {
        dec!(0.70)
    }
}

/// Which side of the joint strips first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    ExternalThreadStrip,
    InternalThreadStrip,
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureMode::ExternalThreadStrip => write!(f, "external thread strip"),
            FailureMode::InternalThreadStrip => write!(f, "internal thread strip"),
        }
    }
}

/// Result of the strength stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthReport {
    pub classification: Classification,
    pub findings: Vec<Finding>,

    /// Shear area of the external thread (mm^2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shear_area_external_mm2: Option<Decimal>,

    /// Shear area of the internal thread (mm^2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shear_area_internal_mm2: Option<Decimal>,

    /// External thread strip strength (kN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_strip_kn: Option<Decimal>,

    /// Internal thread strip strength (kN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_strip_kn: Option<Decimal>,

    /// Lesser of the two strip strengths (kN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limiting_strength_kn: Option<Decimal>,

    /// The failure mode behind the limiting strength
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limiting_mode: Option<FailureMode>,

    /// Limiting strength over required load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_factor: Option<Decimal>,

    /// Proof load of the weaker part (kN), reported for transparency
    pub weaker_part_proof_load_kn: Decimal,
}

/// Grade the joint's strength margin against the required load
pub fn check_strength(
    external_thread: Option<&ThreadSpecification>,
    internal_thread: Option<&ThreadSpecification>,
    external_part: &PartSpecification,
    internal_part: &PartSpecification,
    engagement_length_mm: Decimal,
    required_load_kn: Decimal,
) -> StrengthReport {
    let weaker_proof = external_part
        .proof_load_kn
        .min(internal_part.proof_load_kn);

    let (Some(ext), Some(int)) = (external_thread, internal_thread) else {
        return StrengthReport {
            classification: Classification::Blocked,
            findings: vec![Finding::blocked(
                "thread geometry unavailable; strength cannot be assessed",
            )],
            shear_area_external_mm2: None,
            shear_area_internal_mm2: None,
            external_strip_kn: None,
            internal_strip_kn: None,
            limiting_strength_kn: None,
            limiting_mode: None,
            safety_factor: None,
            weaker_part_proof_load_kn: weaker_proof,
        };
    };

    // Shear area ~ engaged cylinder at the mean pitch diameter, derated by
    // the thread form factor of each side's tolerance class
    let area_ext = PI
        * ext.pitch_diameter_mean()
        * engagement_length_mm
        * thread_form_factor(&ext.tolerance_class);
    let area_int = PI
        * int.pitch_diameter_mean()
        * engagement_length_mm
        * thread_form_factor(&int.tolerance_class);

    // MPa * mm^2 gives N; scale to kN
    let external_strip =
        area_ext * external_part.tensile_strength_mpa * SHEAR_TO_TENSILE / dec!(1000);
    let internal_strip = area_int
        * internal_part.tensile_strength_mpa
        * SHEAR_TO_TENSILE
        * INTERNAL_THREAD_BONUS
        / dec!(1000);

    let (limiting, mode) = if external_strip <= internal_strip {
        (external_strip, FailureMode::ExternalThreadStrip)
    } else {
        (internal_strip, FailureMode::InternalThreadStrip)
    };

    let mut findings = Vec::new();
    let safety_factor = if required_load_kn > Decimal::ZERO {
        let factor = limiting / required_load_kn;
        if factor < MINIMUM_SAFETY_FACTOR {
            findings.push(Finding::blocked(format!(
                "insufficient strength margin: safety factor {} against {} kN",
                factor.round_dp(2).normalize(),
                required_load_kn.normalize()
            )));
        } else if factor < OPTIMAL_SAFETY_FACTOR {
            findings.push(
                Finding::caution("reduced safety margin, verify load assumptions")
                    .with_mitigation(format!(
                        "safety factor {} is below the preferred 2.0",
                        factor.round_dp(2).normalize()
                    )),
            );
        }
        Some(factor)
    } else {
        findings.push(Finding::info("no holding load specified"));
        None
    };

    let classification = classify(&findings);
    StrengthReport {
        classification,
        findings,
        shear_area_external_mm2: Some(area_ext),
        shear_area_internal_mm2: Some(area_int),
        external_strip_kn: Some(external_strip),
        internal_strip_kn: Some(internal_strip),
        limiting_strength_kn: Some(limiting),
        limiting_mode: Some(mode),
        safety_factor,
        weaker_part_proof_load_kn: weaker_proof,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::thread::{Handedness, ThreadGender, ThreadStandard};

    fn m5_thread(gender: ThreadGender, class: &str, pitch_bounds: (Decimal, Decimal)) -> ThreadSpecification {
        ThreadSpecification {
            id: format!("M5x0.8-{}", class),
            standard: ThreadStandard::IsoMetric,
            gender,
            handedness: Handedness::Right,
            nominal_diameter: dec!(5.0),
            pitch: dec!(0.8),
            major_min: dec!(4.826),
            major_max: dec!(4.976),
            pitch_min: pitch_bounds.0,
            pitch_max: pitch_bounds.1,
            minor_min: dec!(3.869),
            minor_max: dec!(4.019),
            thread_angle_deg: dec!(60),
            tolerance_class: class.to_string(),
            min_engagement_ratio: dec!(1.0),
            max_engagement_ratio: dec!(3.0),
            source: None,
            revised: None,
        }
    }

    fn part(id: &str, tensile: Decimal, proof: Decimal) -> PartSpecification {
        PartSpecification {
            id: id.to_string(),
            category: "fastener".to_string(),
            subcategory: None,
            thread: None,
            length: dec!(16),
            length_tol_plus: Decimal::ZERO,
            length_tol_minus: Decimal::ZERO,
            grip_length: None,
            material: "steel".to_string(),
            material_grade: "8.8".to_string(),
            tensile_strength_mpa: tensile,
            yield_strength_mpa: None,
            proof_load_kn: proof,
            torque_nm: Default::default(),
            required_tool: None,
            head: None,
            history: None,
            source: None,
            revised: None,
        }
    }

    fn setup() -> (
        ThreadSpecification,
        ThreadSpecification,
        PartSpecification,
        PartSpecification,
    ) {
        (
            m5_thread(ThreadGender::External, "6g", (dec!(4.361), dec!(4.456))),
            m5_thread(ThreadGender::Internal, "6H", (dec!(4.480), dec!(4.605))),
            part("screw", dec!(800), dec!(8.14)),
            part("plate", dec!(310), dec!(12.0)),
        )
    }

    #[test]
    fn test_form_factor_by_class() {
        assert_eq!(thread_form_factor("6g"), dec!(0.80));
        assert_eq!(thread_form_factor("6H"), dec!(0.80));
        assert_eq!(thread_form_factor("4g6g"), dec!(0.85));
        assert_eq!(thread_form_factor("5H"), dec!(0.85));
        assert_eq!(thread_form_factor("8g"), dec!(0.75));
        assert_eq!(thread_form_factor("unknown"), dec!(0.70));
    }

    #[test]
    fn test_strong_joint_is_optimal() {
        let (ext, int, screw, plate) = setup();
        // area_ext = pi * 4.4085 * 10 * 0.8 = 110.79 mm^2
        // external strip = 110.79 * 800 * 0.577 / 1000 = 51.1 kN
        // internal strip = pi * 4.5425 * 10 * 0.8 * 310 * 0.577 * 1.25 / 1000 = 25.5 kN
        let report = check_strength(Some(&ext), Some(&int), &screw, &plate, dec!(10), dec!(5));
        assert_eq!(report.classification, Classification::Optimal);
        assert_eq!(report.limiting_mode, Some(FailureMode::InternalThreadStrip));
        let limiting = report.limiting_strength_kn.unwrap();
        assert!(limiting > dec!(25) && limiting < dec!(26));
        let factor = report.safety_factor.unwrap();
        assert!(factor > dec!(5) && factor < dec!(5.2));
        // Weaker part by proof load is the screw
        assert_eq!(report.weaker_part_proof_load_kn, dec!(8.14));
    }

    #[test]
    fn test_caution_band() {
        let (ext, int, screw, plate) = setup();
        // limiting ~25.5 kN; 15 kN load gives a factor ~1.7
        let report = check_strength(Some(&ext), Some(&int), &screw, &plate, dec!(10), dec!(15));
        assert_eq!(report.classification, Classification::Caution);
        assert!(report.findings[0]
            .reason
            .contains("reduced safety margin"));
    }

    #[test]
    fn test_blocked_below_minimum_factor() {
        let (ext, int, screw, plate) = setup();
        // 25 kN load gives a factor ~1.02
        let report = check_strength(Some(&ext), Some(&int), &screw, &plate, dec!(10), dec!(25));
        assert_eq!(report.classification, Classification::Blocked);
        assert!(report.findings[0]
            .reason
            .contains("insufficient strength margin"));
    }

    #[test]
    fn test_monotone_in_required_load() {
        let (ext, int, screw, plate) = setup();
        let mut last = Classification::Optimal;
        for load in [dec!(1), dec!(5), dec!(13), dec!(15), dec!(20), dec!(25), dec!(40)] {
            let report =
                check_strength(Some(&ext), Some(&int), &screw, &plate, dec!(10), load);
            assert!(
                report.classification >= last,
                "classification regressed at load {}",
                load
            );
            last = report.classification;
        }
    }

    #[test]
    fn test_zero_load_is_optimal() {
        let (ext, int, screw, plate) = setup();
        let report = check_strength(Some(&ext), Some(&int), &screw, &plate, dec!(10), dec!(0));
        assert_eq!(report.classification, Classification::Optimal);
        assert!(report.safety_factor.is_none());
        assert!(report.findings[0].reason.contains("no holding load"));
    }

    #[test]
    fn test_external_strip_when_screw_is_softer() {
        let (ext, int, _, plate) = setup();
        let soft_screw = part("screw", dec!(200), dec!(2.0));
        let report =
            check_strength(Some(&ext), Some(&int), &soft_screw, &plate, dec!(10), dec!(1));
        assert_eq!(report.limiting_mode, Some(FailureMode::ExternalThreadStrip));
        assert_eq!(report.weaker_part_proof_load_kn, dec!(2.0));
    }

    #[test]
    fn test_missing_thread_blocks() {
        let (ext, _, screw, plate) = setup();
        let report = check_strength(Some(&ext), None, &screw, &plate, dec!(10), dec!(1));
        assert_eq!(report.classification, Classification::Blocked);
        assert!(report.limiting_strength_kn.is_none());
        // Proof load is still reported for transparency
        assert_eq!(report.weaker_part_proof_load_kn, dec!(8.14));
    }

    #[test]
    fn test_zero_engagement_zeroes_strength() {
        let (ext, int, screw, plate) = setup();
        let report = check_strength(Some(&ext), Some(&int), &screw, &plate, dec!(0), dec!(1));
        assert_eq!(report.classification, Classification::Blocked);
        assert_eq!(report.limiting_strength_kn, Some(Decimal::ZERO));
    }
}
