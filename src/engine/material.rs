//! Material pair compatibility resolution
//!
//! Resolves every material pair a joint brings into contact: the two parts
//! against each other, and the fastener against each mating surface. The
//! stage never blocks; its job is to warn and to hand the torque reduction
//! factor to the strength and installation stages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::repository::SpecRepository;
use crate::engine::verdict::{classify, Classification, Finding};
use crate::specs::context::ApplicationContext;
use crate::specs::material::{pair_key, GalvanicRisk, MaterialCompatibilityEntry};
use crate::specs::part::PartSpecification;

/// One resolved material pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPair {
    pub material_a: String,
    pub material_b: String,
    pub galvanic_risk: GalvanicRisk,
    pub torque_reduction_factor: Decimal,

    /// True when no explicit entry existed and the medium-risk default applied
    pub defaulted: bool,
}

/// Result of the material compatibility stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialReport {
    pub classification: Classification,
    pub findings: Vec<Finding>,

    /// Every distinct pair the joint brings into contact
    pub pairs: Vec<ResolvedPair>,

    /// Most conservative torque reduction factor across the pairs
    pub torque_reduction_factor: Decimal,
}

/// Resolve material compatibility for a joint
///
/// `fastener` is the externally threaded part; its material contacts both
/// the internally threaded part and each surface named by the context.
pub fn check_materials(
    repo: &SpecRepository,
    fastener: &PartSpecification,
    mating: &PartSpecification,
    ctx: &ApplicationContext,
) -> MaterialReport {
    let candidates = [
        (fastener.material.as_str(), mating.material.as_str()),
        (fastener.material.as_str(), ctx.material_a.as_str()),
        (fastener.material.as_str(), ctx.material_b.as_str()),
    ];

    let mut findings = Vec::new();
    let mut pairs: Vec<ResolvedPair> = Vec::new();
    let mut seen_keys = Vec::new();
    let mut factor = Decimal::ONE;

    for (a, b) in candidates {
        let key = pair_key(a, b);
        if seen_keys.contains(&key) {
            continue;
        }
        seen_keys.push(key.clone());

        let (entry, defaulted) = if key.0 == key.1 {
            (MaterialCompatibilityEntry::same_material(a), false)
        } else {
            repo.get_material_compatibility(a, b)
        };

        if defaulted {
            findings.push(Finding::caution(format!(
                "no compatibility record for {}/{}; assuming medium galvanic risk",
                a, b
            )));
        }

        resolve_entry(&entry, ctx, &mut findings);

        factor = factor.min(entry.torque_reduction_factor);
        pairs.push(ResolvedPair {
            material_a: a.to_string(),
            material_b: b.to_string(),
            galvanic_risk: entry.galvanic_risk,
            torque_reduction_factor: entry.torque_reduction_factor,
            defaulted,
        });
    }

    let classification = classify(&findings);
    MaterialReport {
        classification,
        findings,
        pairs,
        torque_reduction_factor: factor,
    }
}

/// Findings for one resolved entry against the installation plan
fn resolve_entry(
    entry: &MaterialCompatibilityEntry,
    ctx: &ApplicationContext,
    findings: &mut Vec<Finding>,
) {
    let pair = format!("{}/{}", entry.material_a, entry.material_b);

    if entry.galvanic_risk == GalvanicRisk::High {
        findings.push(
            Finding::caution(format!("high galvanic risk between {}", pair))
                .with_mitigation("use isolating washer or compatible alloy"),
        );
    }

    if entry.thread_locker_required && !ctx.thread_locker_planned {
        findings.push(
            Finding::caution(format!(
                "{} requires thread locker and none is planned",
                pair
            ))
            .with_mitigation("apply a medium-strength thread locker"),
        );
    }

    if entry.anti_seize_required && !ctx.anti_seize_planned {
        findings.push(
            Finding::caution(format!("{} requires anti-seize and none is planned", pair))
                .with_mitigation("apply anti-seize to the threads before assembly"),
        );
    }

    if entry.insert_required {
        findings.push(
            Finding::caution(format!("{} requires a threaded insert", pair))
                .with_mitigation("install a thread insert in the softer material"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn part(id: &str, material: &str) -> PartSpecification {
        PartSpecification {
            id: id.to_string(),
            category: "fastener".to_string(),
            subcategory: None,
            thread: None,
            length: dec!(16),
            length_tol_plus: Decimal::ZERO,
            length_tol_minus: Decimal::ZERO,
            grip_length: None,
            material: material.to_string(),
            material_grade: "8.8".to_string(),
            tensile_strength_mpa: dec!(800),
            yield_strength_mpa: None,
            proof_load_kn: dec!(8.14),
            torque_nm: Default::default(),
            required_tool: None,
            head: None,
            history: None,
            source: None,
            revised: None,
        }
    }

    fn context(material: &str) -> ApplicationContext {
        ApplicationContext {
            material_a: material.to_string(),
            material_b: material.to_string(),
            stack_thickness_mm: dec!(10),
            required_load_kn: dec!(1),
            tools: Vec::new(),
            swing_clearance_deg: None,
            access_clearance_mm: None,
            thread_locker_planned: false,
            anti_seize_planned: false,
        }
    }

    fn repo_with(entry: MaterialCompatibilityEntry) -> SpecRepository {
        let mut repo = SpecRepository::new();
        repo.insert_material(entry).unwrap();
        repo
    }

    fn steel_aluminum(risk: GalvanicRisk) -> MaterialCompatibilityEntry {
        MaterialCompatibilityEntry {
            material_a: "steel".to_string(),
            material_b: "aluminum_6061".to_string(),
            galvanic_risk: risk,
            thermal_expansion_delta: dec!(11.5),
            thread_locker_required: false,
            anti_seize_required: false,
            insert_required: false,
            torque_reduction_factor: dec!(0.85),
        }
    }

    #[test]
    fn test_same_material_everywhere_is_optimal() {
        let repo = SpecRepository::new();
        let report = check_materials(
            &repo,
            &part("screw", "stainless_a2"),
            &part("plate", "stainless_a2"),
            &context("stainless_a2"),
        );
        assert_eq!(report.classification, Classification::Optimal);
        assert!(report.findings.is_empty());
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.torque_reduction_factor, Decimal::ONE);
    }

    #[test]
    fn test_missing_entry_defaults_with_caution() {
        let repo = SpecRepository::new();
        let report = check_materials(
            &repo,
            &part("screw", "titanium"),
            &part("plate", "steel"),
            &context("steel"),
        );
        assert_eq!(report.classification, Classification::Caution);
        assert!(report.findings[0]
            .reason
            .contains("no compatibility record for titanium/steel"));
        assert!(report.pairs[0].defaulted);
        assert_eq!(report.pairs[0].galvanic_risk, GalvanicRisk::Medium);
        assert_eq!(report.torque_reduction_factor, Decimal::ONE);
    }

    #[test]
    fn test_lookup_is_symmetric() {
        let repo = repo_with(steel_aluminum(GalvanicRisk::Medium));
        let forward = check_materials(
            &repo,
            &part("screw", "steel"),
            &part("plate", "aluminum_6061"),
            &context("aluminum_6061"),
        );
        let reverse = check_materials(
            &repo,
            &part("screw", "aluminum_6061"),
            &part("plate", "steel"),
            &context("steel"),
        );
        assert_eq!(forward.classification, reverse.classification);
        assert_eq!(
            forward.torque_reduction_factor,
            reverse.torque_reduction_factor
        );
    }

    #[test]
    fn test_high_risk_cautions_with_mitigation() {
        let repo = repo_with(steel_aluminum(GalvanicRisk::High));
        let report = check_materials(
            &repo,
            &part("screw", "steel"),
            &part("plate", "aluminum_6061"),
            &context("aluminum_6061"),
        );
        assert_eq!(report.classification, Classification::Caution);
        let finding = report
            .findings
            .iter()
            .find(|f| f.reason.contains("high galvanic risk"))
            .unwrap();
        assert_eq!(
            finding.mitigation.as_deref(),
            Some("use isolating washer or compatible alloy")
        );
    }

    #[test]
    fn test_thread_locker_requirement_met_by_plan() {
        let mut entry = steel_aluminum(GalvanicRisk::Medium);
        entry.thread_locker_required = true;
        let repo = repo_with(entry);

        let unplanned = check_materials(
            &repo,
            &part("screw", "steel"),
            &part("plate", "aluminum_6061"),
            &context("aluminum_6061"),
        );
        assert_eq!(unplanned.classification, Classification::Caution);

        let mut ctx = context("aluminum_6061");
        ctx.thread_locker_planned = true;
        let planned = check_materials(
            &repo,
            &part("screw", "steel"),
            &part("plate", "aluminum_6061"),
            &ctx,
        );
        assert_eq!(planned.classification, Classification::Optimal);
    }

    #[test]
    fn test_factor_takes_most_conservative_pair() {
        let repo = repo_with(steel_aluminum(GalvanicRisk::Low));
        // Fastener contacts an aluminum plate (0.85) and a steel surface (1.0)
        let mut ctx = context("steel");
        ctx.material_b = "aluminum_6061".to_string();
        let report = check_materials(
            &repo,
            &part("screw", "steel"),
            &part("plate", "steel"),
            &ctx,
        );
        assert_eq!(report.torque_reduction_factor, dec!(0.85));
        assert_eq!(report.pairs.len(), 2);
    }
}
