//! Application context for a compatibility query
//!
//! The context describes the joint being built, not the parts: the mating
//! surface materials, stack thickness, the load the joint must hold, the
//! tools on hand, and the installation plan. Contexts serialize
//! deterministically; the evaluation cache hashes them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::specs::tool::ToolInventoryItem;

/// Everything the engine needs to know about the application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationContext {
    /// Material of the first mating surface
    pub material_a: String,

    /// Material of the second mating surface
    pub material_b: String,

    /// Clamped stack thickness (mm)
    pub stack_thickness_mm: Decimal,

    /// Load the joint must hold (kN); zero means no load requirement
    #[serde(default)]
    pub required_load_kn: Decimal,

    /// Tools available for installation
    #[serde(default)]
    pub tools: Vec<ToolInventoryItem>,

    /// Swing arc available at the fastener (degrees); absent means unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swing_clearance_deg: Option<Decimal>,

    /// Linear clearance around the fastener head (mm); absent means unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_clearance_mm: Option<Decimal>,

    /// Thread locker will be applied during installation
    #[serde(default)]
    pub thread_locker_planned: bool,

    /// Anti-seize will be applied during installation
    #[serde(default)]
    pub anti_seize_planned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::tool::ToolKind;
    use rust_decimal_macros::dec;

    fn sample() -> ApplicationContext {
        ApplicationContext {
            material_a: "stainless_a2".to_string(),
            material_b: "stainless_a2".to_string(),
            stack_thickness_mm: dec!(10),
            required_load_kn: dec!(1.0),
            tools: vec![ToolInventoryItem {
                id: "hex25".to_string(),
                kind: ToolKind::HexKey,
                size: Some("2.5".to_string()),
                drive: None,
                max_torque_nm: None,
                min_swing_deg: None,
                max_swing_deg: None,
            }],
            swing_clearance_deg: None,
            access_clearance_mm: None,
            thread_locker_planned: false,
            anti_seize_planned: false,
        }
    }

    #[test]
    fn test_yaml_roundtrip() {
        let ctx = sample();
        let yaml = serde_yml::to_string(&ctx).unwrap();
        let parsed: ApplicationContext = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, ctx);
    }

    #[test]
    fn test_json_serialization_is_stable() {
        // The cache keys on serialized bytes; identical contexts must
        // serialize identically
        let a = serde_json::to_vec(&sample()).unwrap();
        let b = serde_json::to_vec(&sample()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
material_a: steel
material_b: steel
stack_thickness_mm: "8"
"#;
        let ctx: ApplicationContext = serde_yml::from_str(yaml).unwrap();
        assert_eq!(ctx.required_load_kn, Decimal::ZERO);
        assert!(ctx.tools.is_empty());
        assert!(!ctx.thread_locker_planned);
    }
}
