//! Tool inventory, tool requirements, and documented workarounds
//!
//! A part names the tool it is installed with; an application context names
//! the tools actually on hand. When the two do not line up, a documented
//! workaround (e.g. feel-based torque with a ratchet) may bridge the gap at
//! a quantified risk.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tool kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Socket,
    HexKey,
    TorxBit,
    Screwdriver,
    Wrench,
    Ratchet,
    TorqueWrench,
    BreakerBar,
    Pliers,
    Other,
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolKind::Socket => write!(f, "socket"),
            ToolKind::HexKey => write!(f, "hex key"),
            ToolKind::TorxBit => write!(f, "torx bit"),
            ToolKind::Screwdriver => write!(f, "screwdriver"),
            ToolKind::Wrench => write!(f, "wrench"),
            ToolKind::Ratchet => write!(f, "ratchet"),
            ToolKind::TorqueWrench => write!(f, "torque wrench"),
            ToolKind::BreakerBar => write!(f, "breaker bar"),
            ToolKind::Pliers => write!(f, "pliers"),
            ToolKind::Other => write!(f, "other tool"),
        }
    }
}

/// The tooling a part needs for installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequirement {
    /// Tool kind
    pub kind: ToolKind,

    /// Size designation (e.g. "2.5", "11mm", "T25")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Drive interface (e.g. "1/4", "3/8")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive: Option<String>,
}

impl ToolRequirement {
    /// Human-readable "11mm socket" style description
    pub fn describe(&self) -> String {
        match &self.size {
            Some(size) => format!("{} {}", size, self.kind),
            None => self.kind.to_string(),
        }
    }
}

/// A tool in the user's inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInventoryItem {
    /// Opaque unique identifier
    pub id: String,

    /// Tool kind
    pub kind: ToolKind,

    /// Size designation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Drive interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive: Option<String>,

    /// Maximum torque the tool can deliver with measurement (N*m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_torque_nm: Option<Decimal>,

    /// Smallest swing arc the tool needs to actuate (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_swing_deg: Option<Decimal>,

    /// Largest useful swing arc (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_swing_deg: Option<Decimal>,
}

impl ToolInventoryItem {
    /// Human-readable "10mm socket" style description
    pub fn describe(&self) -> String {
        match &self.size {
            Some(size) => format!("{} {}", size, self.kind),
            None => self.kind.to_string(),
        }
    }

    /// Whether the tool can actuate within the available swing arc
    ///
    /// Unknown on either side counts as usable; only a stated requirement
    /// against a stated availability can fail.
    pub fn fits_swing(&self, available_deg: Option<Decimal>) -> bool {
        match (self.min_swing_deg, available_deg) {
            (Some(needed), Some(available)) => available >= needed,
            _ => true,
        }
    }
}

/// Risk severity for workaround warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskSeverity {
    /// Weight used in the probability-weighted risk score
    pub fn weight(self) -> Decimal {
        match self {
            RiskSeverity::Low => dec!(1),
            RiskSeverity::Medium => dec!(2),
            RiskSeverity::High => dec!(3),
            RiskSeverity::Critical => dec!(4),
        }
    }
}

impl std::fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskSeverity::Low => write!(f, "low"),
            RiskSeverity::Medium => write!(f, "medium"),
            RiskSeverity::High => write!(f, "high"),
            RiskSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// A single risk carried by a workaround
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkaroundRisk {
    /// Severity classification
    pub severity: RiskSeverity,

    /// What can go wrong
    pub risk: String,

    /// Estimated probability in [0, 1]
    pub probability: Decimal,

    /// What the failure costs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
}

/// A documented tool substitution for a (required, substitute) kind pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkaroundSpec {
    /// Tool kind the operation calls for
    pub required: ToolKind,

    /// Tool kind standing in for it
    pub substitute: ToolKind,

    /// How the substitution is performed
    pub description: String,

    /// Risks taken on by the substitution
    #[serde(default)]
    pub risks: Vec<WorkaroundRisk>,

    /// Steps that reduce the risks
    #[serde(default)]
    pub mitigations: Vec<String>,
}

impl WorkaroundSpec {
    /// Probability-weighted risk score: sum of severity weight x probability
    pub fn risk_score(&self) -> Decimal {
        self.risks
            .iter()
            .map(|r| r.severity.weight() * r.probability)
            .sum()
    }

    /// Check the record invariants, returning every violation found
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        for risk in &self.risks {
            if risk.probability < Decimal::ZERO || risk.probability > Decimal::ONE {
                violations.push(format!(
                    "risk '{}' probability {} outside [0, 1]",
                    risk.risk, risk.probability
                ));
            }
        }
        violations
    }
}

/// Extract the leading numeric portion of a size designation
///
/// "2.5", "11mm", "10 mm" all parse; "T25" and "1/4" do not (no leading
/// digits or ambiguous fraction), and compare by string equality instead.
pub fn size_numeric(size: &str) -> Option<Decimal> {
    let trimmed = size.trim();
    let numeric: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if numeric.is_empty() || trimmed.contains('/') {
        return None;
    }
    numeric.parse().ok()
}

/// Compare two size designations: numeric when both parse, verbatim otherwise
pub fn size_eq(a: &str, b: &str) -> bool {
    match (size_numeric(a), size_numeric(b)) {
        (Some(na), Some(nb)) => na == nb,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

/// Numeric distance between two size designations, when both parse
pub fn size_delta(a: &str, b: &str) -> Option<Decimal> {
    let (na, nb) = (size_numeric(a)?, size_numeric(b)?);
    Some((na - nb).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_numeric_variants() {
        assert_eq!(size_numeric("2.5"), Some(dec!(2.5)));
        assert_eq!(size_numeric("11mm"), Some(dec!(11)));
        assert_eq!(size_numeric("10 mm"), Some(dec!(10)));
        assert_eq!(size_numeric("T25"), None);
        assert_eq!(size_numeric("1/4"), None);
    }

    #[test]
    fn test_size_eq() {
        assert!(size_eq("11", "11mm"));
        assert!(size_eq("2.5", "2.50"));
        assert!(size_eq("T25", "t25"));
        assert!(!size_eq("10", "11"));
        assert!(!size_eq("T25", "T27"));
    }

    #[test]
    fn test_size_delta() {
        assert_eq!(size_delta("10mm", "11"), Some(dec!(1)));
        assert_eq!(size_delta("T25", "11"), None);
    }

    #[test]
    fn test_risk_score_weighting() {
        // 2 * 0.3 + 3 * 0.2 = 1.2
        let workaround = WorkaroundSpec {
            required: ToolKind::HexKey,
            substitute: ToolKind::Ratchet,
            description: "drive a hex bit socket with the ratchet".to_string(),
            risks: vec![
                WorkaroundRisk {
                    severity: RiskSeverity::Medium,
                    risk: "uneven torque across fasteners".to_string(),
                    probability: dec!(0.3),
                    consequence: None,
                },
                WorkaroundRisk {
                    severity: RiskSeverity::High,
                    risk: "over-torque without measurement".to_string(),
                    probability: dec!(0.2),
                    consequence: Some("stripped threads".to_string()),
                },
            ],
            mitigations: vec!["use star pattern, multiple passes".to_string()],
        };
        assert_eq!(workaround.risk_score(), dec!(1.2));
        assert!(workaround.validate().is_empty());
    }

    #[test]
    fn test_probability_bounds_validated() {
        let workaround = WorkaroundSpec {
            required: ToolKind::Socket,
            substitute: ToolKind::Wrench,
            description: "open-end wrench on the hex head".to_string(),
            risks: vec![WorkaroundRisk {
                severity: RiskSeverity::Low,
                risk: "slipping".to_string(),
                probability: dec!(1.5),
                consequence: None,
            }],
            mitigations: Vec::new(),
        };
        let violations = workaround.validate();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("outside [0, 1]"));
    }

    #[test]
    fn test_fits_swing() {
        let mut tool = ToolInventoryItem {
            id: "ratchet_1".to_string(),
            kind: ToolKind::Ratchet,
            size: None,
            drive: Some("3/8".to_string()),
            max_torque_nm: None,
            min_swing_deg: Some(dec!(30)),
            max_swing_deg: None,
        };
        assert!(tool.fits_swing(Some(dec!(45))));
        assert!(tool.fits_swing(Some(dec!(30))));
        assert!(!tool.fits_swing(Some(dec!(15))));
        assert!(tool.fits_swing(None));

        tool.min_swing_deg = None;
        assert!(tool.fits_swing(Some(dec!(5))));
    }

    #[test]
    fn test_describe() {
        let req = ToolRequirement {
            kind: ToolKind::Socket,
            size: Some("11mm".to_string()),
            drive: None,
        };
        assert_eq!(req.describe(), "11mm socket");

        let bare = ToolRequirement {
            kind: ToolKind::TorqueWrench,
            size: None,
            drive: None,
        };
        assert_eq!(bare.describe(), "torque wrench");
    }

    #[test]
    fn test_tool_kind_serialization() {
        let yaml = serde_yml::to_string(&ToolKind::TorqueWrench).unwrap();
        assert!(yaml.contains("torque_wrench"));
        let parsed: ToolKind = serde_yml::from_str("hex_key").unwrap();
        assert_eq!(parsed, ToolKind::HexKey);
    }
}
