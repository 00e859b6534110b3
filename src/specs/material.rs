//! Material pair compatibility records
//!
//! One entry per unordered pair of materials: galvanic risk, differential
//! thermal expansion, required joint preparations, and the torque reduction
//! factor downstream stages apply.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Galvanic corrosion risk for a material pair in electrical contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalvanicRisk {
    None,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for GalvanicRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GalvanicRisk::None => write!(f, "none"),
            GalvanicRisk::Low => write!(f, "low"),
            GalvanicRisk::Medium => write!(f, "medium"),
            GalvanicRisk::High => write!(f, "high"),
        }
    }
}

/// Normalize a material pair into a symmetric lookup key
///
/// Lookup for (A, B) must equal lookup for (B, A), so keys are
/// case-folded and sorted.
pub fn pair_key(material_a: &str, material_b: &str) -> (String, String) {
    let a = material_a.trim().to_lowercase();
    let b = material_b.trim().to_lowercase();
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn default_torque_factor() -> Decimal {
    Decimal::ONE
}

/// Compatibility record for an unordered material pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCompatibilityEntry {
    /// First material identifier
    pub material_a: String,

    /// Second material identifier
    pub material_b: String,

    /// Galvanic corrosion risk
    pub galvanic_risk: GalvanicRisk,

    /// Differential thermal expansion (um/m*K)
    #[serde(default)]
    pub thermal_expansion_delta: Decimal,

    /// Joint needs thread locker to stay tight
    #[serde(default)]
    pub thread_locker_required: bool,

    /// Joint needs anti-seize to avoid galling
    #[serde(default)]
    pub anti_seize_required: bool,

    /// Joint needs a threaded insert in the softer material
    #[serde(default)]
    pub insert_required: bool,

    /// Multiplier on the part's rated torque, 0 < factor <= 1
    #[serde(default = "default_torque_factor")]
    pub torque_reduction_factor: Decimal,
}

impl MaterialCompatibilityEntry {
    /// The normalized lookup key for this entry
    pub fn key(&self) -> (String, String) {
        pair_key(&self.material_a, &self.material_b)
    }

    /// An implicit entry for a pair with no record: medium galvanic risk,
    /// full torque. Callers surface the defaulting as a caution.
    pub fn default_for(material_a: &str, material_b: &str) -> Self {
        Self {
            material_a: material_a.to_string(),
            material_b: material_b.to_string(),
            galvanic_risk: GalvanicRisk::Medium,
            thermal_expansion_delta: Decimal::ZERO,
            thread_locker_required: false,
            anti_seize_required: false,
            insert_required: false,
            torque_reduction_factor: Decimal::ONE,
        }
    }

    /// An implicit entry for a same-material pair: no galvanic couple forms
    pub fn same_material(material: &str) -> Self {
        Self {
            material_a: material.to_string(),
            material_b: material.to_string(),
            galvanic_risk: GalvanicRisk::None,
            thermal_expansion_delta: Decimal::ZERO,
            thread_locker_required: false,
            anti_seize_required: false,
            insert_required: false,
            torque_reduction_factor: Decimal::ONE,
        }
    }

    /// Check the record invariants, returning every violation found
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.material_a.trim().is_empty() || self.material_b.trim().is_empty() {
            violations.push("material identifiers must not be empty".to_string());
        }
        if self.torque_reduction_factor <= Decimal::ZERO
            || self.torque_reduction_factor > Decimal::ONE
        {
            violations.push(format!(
                "torque_reduction_factor {} outside (0, 1]",
                self.torque_reduction_factor
            ));
        }
        violations
    }
}
