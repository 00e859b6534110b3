//! Part specification records
//!
//! A part record describes one catalog part: its thread reference, length
//! and tolerance, material and strength figures, installation torque, and
//! the tooling it is installed with. Records are immutable reference data
//! once ingested; the engine only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::specs::tool::ToolRequirement;

/// Head and drive geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadGeometry {
    /// Head outside diameter (mm)
    pub head_diameter: Decimal,

    /// Head height (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_height: Option<Decimal>,

    /// Drive size designation (e.g. "2.5" hex, "T25")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_size: Option<String>,

    /// Clearance the head needs around it (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance_needed: Option<Decimal>,
}

/// Installation torque figures (N*m)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TorqueSpec {
    /// Recommended installation torque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<Decimal>,

    /// Minimum acceptable torque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,

    /// Maximum allowed torque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl TorqueSpec {
    /// The torque figure installation planning works against: the maximum
    /// when stated, otherwise the recommended value
    pub fn planning_torque(&self) -> Option<Decimal> {
        self.max.or(self.recommended)
    }
}

/// Field history for a part, fed into substitution tie-breaking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageHistory {
    /// Installations that held
    pub successful_uses: u32,

    /// Installations that failed
    pub failed_uses: u32,
}

impl UsageHistory {
    /// successes / (successes + failures); None when there is no history
    pub fn success_rate(&self) -> Option<Decimal> {
        let total = self.successful_uses + self.failed_uses;
        if total == 0 {
            return None;
        }
        Some(Decimal::from(self.successful_uses) / Decimal::from(total))
    }
}

/// Complete part specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSpecification {
    /// Opaque unique identifier (e.g. "DIN912-M5x16-8.8")
    pub id: String,

    /// Part category (e.g. "fastener", "plate")
    pub category: String,

    /// Finer classification (e.g. "socket_head_cap_screw", "tapped_hole")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Thread specification id, when the part is threaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,

    /// Nominal length (mm); for a tapped part, the usable thread depth
    pub length: Decimal,

    /// Plus length tolerance, stored positive
    #[serde(default)]
    pub length_tol_plus: Decimal,

    /// Minus length tolerance, stored positive
    #[serde(default)]
    pub length_tol_minus: Decimal,

    /// Unthreaded grip length under the head; absent means fully threaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grip_length: Option<Decimal>,

    /// Material identifier (keys into material compatibility entries)
    pub material: String,

    /// Material grade designation (e.g. "8.8", "A2-70")
    pub material_grade: String,

    /// Ultimate tensile strength (MPa)
    pub tensile_strength_mpa: Decimal,

    /// Yield strength (MPa)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_strength_mpa: Option<Decimal>,

    /// Proof load (kN)
    pub proof_load_kn: Decimal,

    /// Installation torque figures
    #[serde(default)]
    pub torque_nm: TorqueSpec,

    /// Tooling the part is installed with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_tool: Option<ToolRequirement>,

    /// Head and drive geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<HeadGeometry>,

    /// Field usage history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<UsageHistory>,

    /// Originating standard or supplier record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Revision date of the source record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised: Option<DateTime<Utc>>,
}

impl PartSpecification {
    /// Shortest length the part can measure
    pub fn length_min(&self) -> Decimal {
        self.length - self.length_tol_minus
    }

    /// Longest length the part can measure
    pub fn length_max(&self) -> Decimal {
        self.length + self.length_tol_plus
    }

    /// Total length tolerance band
    pub fn length_band(&self) -> Decimal {
        self.length_tol_plus + self.length_tol_minus
    }

    /// Check the record invariants, returning every violation found
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.length <= Decimal::ZERO {
            violations.push("length must be positive".to_string());
        }
        if self.length_tol_plus < Decimal::ZERO {
            violations.push("length_tol_plus must not be negative".to_string());
        }
        if self.length_tol_minus < Decimal::ZERO {
            violations.push("length_tol_minus must not be negative".to_string());
        }
        if self.tensile_strength_mpa <= Decimal::ZERO {
            violations.push("tensile_strength_mpa must be positive".to_string());
        }
        if self.proof_load_kn < Decimal::ZERO {
            violations.push("proof_load_kn must not be negative".to_string());
        }
        if let Some(grip) = self.grip_length {
            if grip < Decimal::ZERO || grip > self.length {
                violations.push("grip_length must lie within the part length".to_string());
            }
        }
        if let (Some(min), Some(rec), Some(max)) = (
            self.torque_nm.min,
            self.torque_nm.recommended,
            self.torque_nm.max,
        ) {
            if !(min <= rec && rec <= max) {
                violations.push(format!(
                    "torque ordering violated: min {} <= recommended {} <= max {} must hold",
                    min, rec, max
                ));
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::tool::ToolKind;
    use rust_decimal_macros::dec;

    fn din912_m5() -> PartSpecification {
        PartSpecification {
            id: "DIN912-M5x16-8.8".to_string(),
            category: "fastener".to_string(),
            subcategory: Some("socket_head_cap_screw".to_string()),
            thread: Some("M5x0.8-6g".to_string()),
            length: dec!(16),
            length_tol_plus: dec!(0),
            length_tol_minus: dec!(0.5),
            grip_length: None,
            material: "steel".to_string(),
            material_grade: "8.8".to_string(),
            tensile_strength_mpa: dec!(800),
            yield_strength_mpa: Some(dec!(640)),
            proof_load_kn: dec!(8.14),
            torque_nm: TorqueSpec {
                recommended: Some(dec!(5.5)),
                min: Some(dec!(4.0)),
                max: Some(dec!(7.0)),
            },
            required_tool: Some(ToolRequirement {
                kind: ToolKind::HexKey,
                size: Some("4".to_string()),
                drive: None,
            }),
            head: Some(HeadGeometry {
                head_diameter: dec!(8.5),
                head_height: Some(dec!(5)),
                drive_size: Some("4".to_string()),
                clearance_needed: Some(dec!(9.5)),
            }),
            history: None,
            source: Some("DIN 912".to_string()),
            revised: None,
        }
    }

    #[test]
    fn test_valid_part_passes() {
        assert!(din912_m5().validate().is_empty());
    }

    #[test]
    fn test_length_bounds() {
        let part = din912_m5();
        assert_eq!(part.length_min(), dec!(15.5));
        assert_eq!(part.length_max(), dec!(16));
        assert_eq!(part.length_band(), dec!(0.5));
    }

    #[test]
    fn test_torque_ordering_enforced() {
        let mut part = din912_m5();
        part.torque_nm.min = Some(dec!(6.0));
        part.torque_nm.recommended = Some(dec!(5.5));
        let violations = part.validate();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("torque ordering"));
    }

    #[test]
    fn test_torque_ordering_skipped_when_partial() {
        // Only full triples are checked; a lone recommended value is fine
        let mut part = din912_m5();
        part.torque_nm.min = None;
        assert!(part.validate().is_empty());
    }

    #[test]
    fn test_planning_torque_prefers_max() {
        let part = din912_m5();
        assert_eq!(part.torque_nm.planning_torque(), Some(dec!(7.0)));

        let mut no_max = part.clone();
        no_max.torque_nm.max = None;
        assert_eq!(no_max.torque_nm.planning_torque(), Some(dec!(5.5)));
    }

    #[test]
    fn test_grip_length_bounds() {
        let mut part = din912_m5();
        part.grip_length = Some(dec!(20));
        assert!(part
            .validate()
            .iter()
            .any(|v| v.contains("grip_length")));
    }

    #[test]
    fn test_success_rate() {
        let history = UsageHistory {
            successful_uses: 3,
            failed_uses: 1,
        };
        assert_eq!(history.success_rate(), Some(dec!(0.75)));
        assert_eq!(UsageHistory::default().success_rate(), None);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let part = din912_m5();
        let yaml = serde_yml::to_string(&part).unwrap();
        let parsed: PartSpecification = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, part);
    }

    #[test]
    fn test_unthreaded_part() {
        let yaml = r#"
id: WASHER-M5-A2
category: washer
length: "1.0"
material: stainless_a2
material_grade: A2
tensile_strength_mpa: "700"
proof_load_kn: "0"
"#;
        let part: PartSpecification = serde_yml::from_str(yaml).unwrap();
        assert!(part.thread.is_none());
        assert!(part.validate().is_empty());
    }
}
