//! In-memory specification repository
//!
//! Read-mostly reference data keyed by opaque identifiers. Records are
//! validated on insert; a record violating its invariants never reaches the
//! calculators. Reads are side-effect free and the maps iterate in a stable
//! order.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use crate::engine::error::{EngineError, SpecKind};
use crate::specs::material::{pair_key, MaterialCompatibilityEntry};
use crate::specs::part::PartSpecification;
use crate::specs::thread::ThreadSpecification;
use crate::specs::tool::{
    RiskSeverity, ToolKind, WorkaroundRisk, WorkaroundSpec,
};

/// Repository of thread, part, material, and workaround records
#[derive(Debug, Clone, Default)]
pub struct SpecRepository {
    threads: BTreeMap<String, ThreadSpecification>,
    parts: BTreeMap<String, PartSpecification>,
    materials: BTreeMap<(String, String), MaterialCompatibilityEntry>,
    workarounds: Vec<WorkaroundSpec>,
}

impl SpecRepository {
    /// An empty repository carrying the built-in workaround table
    pub fn new() -> Self {
        Self {
            workarounds: builtin_workarounds(),
            ..Default::default()
        }
    }

    /// An empty repository with no workarounds at all
    pub fn without_builtin_workarounds() -> Self {
        Self::default()
    }

    /// Insert a thread specification, rejecting invariant violations
    pub fn insert_thread(&mut self, spec: ThreadSpecification) -> Result<(), EngineError> {
        let violations = spec.validate();
        if !violations.is_empty() {
            return Err(EngineError::invalid(SpecKind::Thread, spec.id, violations));
        }
        self.threads.insert(spec.id.clone(), spec);
        Ok(())
    }

    /// Insert a part specification, rejecting invariant violations
    pub fn insert_part(&mut self, spec: PartSpecification) -> Result<(), EngineError> {
        let violations = spec.validate();
        if !violations.is_empty() {
            return Err(EngineError::invalid(SpecKind::Part, spec.id, violations));
        }
        self.parts.insert(spec.id.clone(), spec);
        Ok(())
    }

    /// Insert a material pair entry, rejecting invariant violations
    pub fn insert_material(
        &mut self,
        entry: MaterialCompatibilityEntry,
    ) -> Result<(), EngineError> {
        let violations = entry.validate();
        if !violations.is_empty() {
            let id = format!("{}/{}", entry.material_a, entry.material_b);
            return Err(EngineError::invalid(SpecKind::Material, id, violations));
        }
        self.materials.insert(entry.key(), entry);
        Ok(())
    }

    /// Insert a workaround; later entries shadow earlier (and built-in) ones
    pub fn insert_workaround(&mut self, spec: WorkaroundSpec) -> Result<(), EngineError> {
        let violations = spec.validate();
        if !violations.is_empty() {
            let id = format!("{}->{}", spec.required, spec.substitute);
            return Err(EngineError::invalid(SpecKind::Workaround, id, violations));
        }
        self.workarounds.push(spec);
        Ok(())
    }

    /// Look up a thread specification by id
    pub fn get_thread(&self, id: &str) -> Result<&ThreadSpecification, EngineError> {
        self.threads
            .get(id)
            .ok_or_else(|| EngineError::not_found(SpecKind::Thread, id))
    }

    /// Look up a part specification by id
    pub fn get_part(&self, id: &str) -> Result<&PartSpecification, EngineError> {
        self.parts
            .get(id)
            .ok_or_else(|| EngineError::not_found(SpecKind::Part, id))
    }

    /// Look up the compatibility entry for a material pair
    ///
    /// Symmetric in its arguments. When no entry exists the documented
    /// default applies (medium galvanic risk, full torque) and the second
    /// element is true so callers surface a caution, never a silent pass.
    pub fn get_material_compatibility(
        &self,
        material_a: &str,
        material_b: &str,
    ) -> (MaterialCompatibilityEntry, bool) {
        match self.materials.get(&pair_key(material_a, material_b)) {
            Some(entry) => (entry.clone(), false),
            None => (
                MaterialCompatibilityEntry::default_for(material_a, material_b),
                true,
            ),
        }
    }

    /// The documented workaround for a (required, substitute) tool kind pair
    pub fn workaround_for(
        &self,
        required: ToolKind,
        substitute: ToolKind,
    ) -> Option<&WorkaroundSpec> {
        self.workarounds
            .iter()
            .rev()
            .find(|w| w.required == required && w.substitute == substitute)
    }

    /// Iterate all thread specifications in id order
    pub fn threads(&self) -> impl Iterator<Item = &ThreadSpecification> {
        self.threads.values()
    }

    /// Iterate all part specifications in id order
    pub fn parts(&self) -> impl Iterator<Item = &PartSpecification> {
        self.parts.values()
    }

    /// Iterate all material entries in key order
    pub fn materials(&self) -> impl Iterator<Item = &MaterialCompatibilityEntry> {
        self.materials.values()
    }

    /// Iterate all workarounds in lookup precedence order
    pub fn workarounds(&self) -> impl Iterator<Item = &WorkaroundSpec> {
        self.workarounds.iter()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

/// The workaround table every repository starts with
///
/// The feel-based torque entries mirror long-standing shop practice:
/// thread until seated, then a measured fraction of a turn, star pattern
/// across multiple fasteners.
pub fn builtin_workarounds() -> Vec<WorkaroundSpec> {
    let feel_based_risks = || {
        vec![
            WorkaroundRisk {
                severity: RiskSeverity::Medium,
                risk: "uneven torque across fasteners".to_string(),
                probability: dec!(0.3),
                consequence: Some("warped flange or leaking joint".to_string()),
            },
            WorkaroundRisk {
                severity: RiskSeverity::High,
                risk: "over-torque without measurement".to_string(),
                probability: dec!(0.2),
                consequence: Some("stripped threads or snapped fastener".to_string()),
            },
        ]
    };
    let feel_based_mitigations = || {
        vec![
            "use star pattern, multiple passes".to_string(),
            "stop at first firm resistance, then quarter turn".to_string(),
        ]
    };

    vec![
        WorkaroundSpec {
            required: ToolKind::TorqueWrench,
            substitute: ToolKind::Ratchet,
            description: "feel-based torque with a ratchet".to_string(),
            risks: feel_based_risks(),
            mitigations: feel_based_mitigations(),
        },
        WorkaroundSpec {
            required: ToolKind::TorqueWrench,
            substitute: ToolKind::Socket,
            description: "feel-based torque with an unmetered driver".to_string(),
            risks: feel_based_risks(),
            mitigations: feel_based_mitigations(),
        },
        WorkaroundSpec {
            required: ToolKind::TorqueWrench,
            substitute: ToolKind::HexKey,
            description: "feel-based torque with a hex key".to_string(),
            risks: feel_based_risks(),
            mitigations: feel_based_mitigations(),
        },
        WorkaroundSpec {
            required: ToolKind::TorqueWrench,
            substitute: ToolKind::BreakerBar,
            description: "feel-based torque with a breaker bar".to_string(),
            risks: vec![
                WorkaroundRisk {
                    severity: RiskSeverity::High,
                    risk: "over-torque from the long lever arm".to_string(),
                    probability: dec!(0.4),
                    consequence: Some("snapped fastener".to_string()),
                },
            ],
            mitigations: vec!["grip close to the head, short strokes".to_string()],
        },
        WorkaroundSpec {
            required: ToolKind::HexKey,
            substitute: ToolKind::Ratchet,
            description: "drive a hex bit socket with the ratchet".to_string(),
            risks: feel_based_risks(),
            mitigations: feel_based_mitigations(),
        },
        WorkaroundSpec {
            required: ToolKind::Socket,
            substitute: ToolKind::Wrench,
            description: "open-end wrench on the hex head".to_string(),
            risks: vec![
                WorkaroundRisk {
                    severity: RiskSeverity::Medium,
                    risk: "rounding the head under load".to_string(),
                    probability: dec!(0.2),
                    consequence: Some("seized fastener".to_string()),
                },
            ],
            mitigations: vec!["seat the wrench fully before loading".to_string()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::material::GalvanicRisk;
    use crate::specs::thread::{Handedness, ThreadGender, ThreadStandard};

    fn valid_thread(id: &str) -> ThreadSpecification {
        ThreadSpecification {
            id: id.to_string(),
            standard: ThreadStandard::IsoMetric,
            gender: ThreadGender::External,
            handedness: Handedness::Right,
            nominal_diameter: dec!(5.0),
            pitch: dec!(0.8),
            major_min: dec!(4.826),
            major_max: dec!(4.976),
            pitch_min: dec!(4.456),
            pitch_max: dec!(4.556),
            minor_min: dec!(3.869),
            minor_max: dec!(4.019),
            thread_angle_deg: dec!(60),
            tolerance_class: "6g".to_string(),
            min_engagement_ratio: dec!(1.0),
            max_engagement_ratio: dec!(3.0),
            source: None,
            revised: None,
        }
    }

    #[test]
    fn test_insert_and_get_thread() {
        let mut repo = SpecRepository::new();
        repo.insert_thread(valid_thread("M5x0.8-6g")).unwrap();
        assert_eq!(repo.get_thread("M5x0.8-6g").unwrap().pitch, dec!(0.8));
    }

    #[test]
    fn test_get_missing_thread_is_not_found() {
        let repo = SpecRepository::new();
        let err = repo.get_thread("M99").unwrap_err();
        assert_eq!(err, EngineError::not_found(SpecKind::Thread, "M99"));
    }

    #[test]
    fn test_invalid_thread_rejected_at_boundary() {
        let mut repo = SpecRepository::new();
        let mut bad = valid_thread("M5-corrupt");
        bad.minor_max = dec!(4.6); // above pitch_min
        let err = repo.insert_thread(bad).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSpec { .. }));
        // The corrupt record never became visible
        assert!(repo.get_thread("M5-corrupt").is_err());
    }

    #[test]
    fn test_material_lookup_symmetric() {
        let mut repo = SpecRepository::new();
        repo.insert_material(MaterialCompatibilityEntry {
            material_a: "steel".to_string(),
            material_b: "aluminum_6061".to_string(),
            galvanic_risk: GalvanicRisk::Medium,
            thermal_expansion_delta: dec!(11.5),
            thread_locker_required: false,
            anti_seize_required: false,
            insert_required: false,
            torque_reduction_factor: dec!(0.85),
        })
        .unwrap();

        let (forward, fwd_default) = repo.get_material_compatibility("steel", "aluminum_6061");
        let (reverse, rev_default) = repo.get_material_compatibility("aluminum_6061", "steel");
        assert!(!fwd_default && !rev_default);
        assert_eq!(forward.galvanic_risk, reverse.galvanic_risk);
        assert_eq!(
            forward.torque_reduction_factor,
            reverse.torque_reduction_factor
        );
    }

    #[test]
    fn test_material_default_surfaces_flag() {
        let repo = SpecRepository::new();
        let (entry, defaulted) = repo.get_material_compatibility("brass", "titanium");
        assert!(defaulted);
        assert_eq!(entry.galvanic_risk, GalvanicRisk::Medium);
        assert_eq!(entry.torque_reduction_factor, dec!(1));
    }

    #[test]
    fn test_invalid_material_factor_rejected() {
        let mut repo = SpecRepository::new();
        let err = repo
            .insert_material(MaterialCompatibilityEntry {
                material_a: "a".to_string(),
                material_b: "b".to_string(),
                galvanic_risk: GalvanicRisk::Low,
                thermal_expansion_delta: dec!(0),
                thread_locker_required: false,
                anti_seize_required: false,
                insert_required: false,
                torque_reduction_factor: dec!(1.5),
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSpec { .. }));
    }

    #[test]
    fn test_builtin_workarounds_present() {
        let repo = SpecRepository::new();
        assert!(repo
            .workaround_for(ToolKind::HexKey, ToolKind::Ratchet)
            .is_some());
        assert!(repo
            .workaround_for(ToolKind::TorqueWrench, ToolKind::Ratchet)
            .is_some());
        assert!(repo
            .workaround_for(ToolKind::Socket, ToolKind::Pliers)
            .is_none());
    }

    #[test]
    fn test_later_workaround_shadows_builtin() {
        let mut repo = SpecRepository::new();
        repo.insert_workaround(WorkaroundSpec {
            required: ToolKind::HexKey,
            substitute: ToolKind::Ratchet,
            description: "shop-specific bit adapter procedure".to_string(),
            risks: Vec::new(),
            mitigations: Vec::new(),
        })
        .unwrap();
        let found = repo
            .workaround_for(ToolKind::HexKey, ToolKind::Ratchet)
            .unwrap();
        assert!(found.description.contains("shop-specific"));
    }

    #[test]
    fn test_iteration_order_is_stable() {
        let mut repo = SpecRepository::new();
        repo.insert_thread(valid_thread("b-thread")).unwrap();
        repo.insert_thread(valid_thread("a-thread")).unwrap();
        let ids: Vec<&str> = repo.threads().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a-thread", "b-thread"]);
    }
}
