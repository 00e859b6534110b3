//! Installation feasibility analysis
//!
//! Matches a part's required tooling and torque against the tools actually
//! on hand. An exact, torque-capable, accessible match is optimal; a
//! documented workaround is a caution with a quantified risk score; anything
//! else is blocked, naming the missing tool and any structurally close
//! alternatives. `validate_project` composes the same check over a whole
//! requirement list.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::repository::SpecRepository;
use crate::engine::verdict::{classify, Classification, Finding};
use crate::specs::tool::{
    size_delta, size_eq, RiskSeverity, ToolInventoryItem, ToolKind, ToolRequirement,
    WorkaroundRisk,
};

/// Inventory sizes this close to the required size are listed as
/// informational alternatives when the exact tool is missing
const CLOSE_SIZE_WINDOW: Decimal = dec!(1.0);

/// A workaround actually applied to an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkaroundApplied {
    /// Inventory id of the substitute tool
    pub substitute_tool: String,

    /// How the substitution is performed
    pub description: String,

    /// Probability-weighted risk score
    pub risk_score: Decimal,

    /// Risks taken on
    pub risks: Vec<WorkaroundRisk>,

    /// Steps that reduce the risks
    pub mitigations: Vec<String>,
}

/// Result of the installation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationReport {
    pub classification: Classification,
    pub findings: Vec<Finding>,

    /// Inventory id of the tool selected for the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_tool: Option<String>,

    /// Torque target after the material reduction factor (N*m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_torque_nm: Option<Decimal>,

    /// Documented workaround applied, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workaround: Option<WorkaroundApplied>,

    /// Description of the missing tool when blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_tool: Option<String>,

    /// Nearby tools listed purely as information, never as a pass
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub close_alternatives: Vec<String>,
}

/// Access constraints at the installation location
///
/// Unknown on either side of a comparison counts as unconstrained; only a
/// stated need against a stated availability can fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessConstraints {
    /// Swing arc available at the fastener (degrees)
    pub swing_available_deg: Option<Decimal>,

    /// Linear clearance available around the head (mm)
    pub access_clearance_mm: Option<Decimal>,

    /// Clearance the part's head needs (mm)
    pub head_clearance_needed_mm: Option<Decimal>,
}

/// Check whether a tool requirement can be met by an inventory
///
/// `torque_nm` is the effective torque target, already reduced by the
/// material factor. Access failures block on their own, regardless of
/// torque capability.
pub fn check_installation(
    repo: &SpecRepository,
    requirement: Option<&ToolRequirement>,
    torque_nm: Option<Decimal>,
    inventory: &[ToolInventoryItem],
    access: &AccessConstraints,
) -> InstallationReport {
    let swing_available_deg = access.swing_available_deg;

    if let (Some(needed), Some(available)) =
        (access.head_clearance_needed_mm, access.access_clearance_mm)
    {
        if needed > available {
            return InstallationReport {
                classification: Classification::Blocked,
                findings: vec![Finding::blocked(format!(
                    "insufficient access clearance around the head (needs {} mm, {} available)",
                    needed.normalize(),
                    available.normalize()
                ))],
                selected_tool: None,
                effective_torque_nm: torque_nm,
                workaround: None,
                missing_tool: None,
                close_alternatives: Vec::new(),
            };
        }
    }

    let Some(req) = requirement else {
        return InstallationReport {
            classification: Classification::Optimal,
            findings: vec![Finding::info("no installation tooling specified")],
            selected_tool: None,
            effective_torque_nm: torque_nm,
            workaround: None,
            missing_tool: None,
            close_alternatives: Vec::new(),
        };
    };

    let mut findings = Vec::new();

    let exact: Vec<&ToolInventoryItem> = inventory
        .iter()
        .filter(|tool| matches_requirement(tool, req))
        .collect();
    let usable: Vec<&ToolInventoryItem> = exact
        .iter()
        .copied()
        .filter(|tool| tool.fits_swing(swing_available_deg))
        .collect();

    // The right tool exists but cannot swing: access alone blocks,
    // regardless of torque capability
    if !exact.is_empty() && usable.is_empty() {
        for tool in &exact {
            findings.push(Finding::blocked(format!(
                "insufficient swing clearance for {} (needs {} degrees, {} available)",
                tool.describe(),
                tool.min_swing_deg.unwrap_or_default().normalize(),
                swing_available_deg.unwrap_or_default().normalize()
            )));
        }
        return InstallationReport {
            classification: Classification::Blocked,
            findings,
            selected_tool: None,
            effective_torque_nm: torque_nm,
            workaround: None,
            missing_tool: None,
            close_alternatives: Vec::new(),
        };
    }

    if let Some(tool) = usable.first() {
        // Torque can come from the matched tool itself or from a torque
        // wrench in the inventory driving it
        let torque_source = torque_nm.and_then(|target| {
            find_torque_source(tool, &usable, inventory, swing_available_deg, target)
        });
        match (torque_nm, torque_source) {
            (None, _) => {
                return optimal_report(tool, None, findings);
            }
            (Some(target), Some(source)) => {
                if source.id != tool.id {
                    findings.push(Finding::info(format!(
                        "torque delivered through {} rated {} N*m",
                        source.describe(),
                        source.max_torque_nm.unwrap_or_default().normalize()
                    )));
                }
                return optimal_report(tool, Some(target), findings);
            }
            (Some(target), None) => {
                // Right tool, no way to measure the torque: documented
                // feel-based workaround or nothing
                if let Some(spec) = repo.workaround_for(ToolKind::TorqueWrench, tool.kind) {
                    let applied = apply_workaround(spec, tool, &mut findings);
                    return InstallationReport {
                        classification: classify(&findings),
                        findings,
                        selected_tool: Some(tool.id.clone()),
                        effective_torque_nm: Some(target),
                        workaround: Some(applied),
                        missing_tool: None,
                        close_alternatives: Vec::new(),
                    };
                }
                findings.push(Finding::blocked(format!(
                    "no available tool can deliver {} N*m with measurement",
                    target.normalize()
                )));
                return InstallationReport {
                    classification: Classification::Blocked,
                    findings,
                    selected_tool: None,
                    effective_torque_nm: Some(target),
                    workaround: None,
                    missing_tool: Some("torque wrench".to_string()),
                    close_alternatives: Vec::new(),
                };
            }
        }
    }

    // No exact match: look for a documented substitution
    for tool in inventory {
        if !tool.fits_swing(swing_available_deg) {
            continue;
        }
        if let Some(spec) = repo.workaround_for(req.kind, tool.kind) {
            let applied = apply_workaround(spec, tool, &mut findings);
            return InstallationReport {
                classification: classify(&findings),
                findings,
                selected_tool: Some(tool.id.clone()),
                effective_torque_nm: torque_nm,
                workaround: Some(applied),
                missing_tool: None,
                close_alternatives: Vec::new(),
            };
        }
    }

    // Nothing safe: name the missing tool and any near misses
    let missing = req.describe();
    let close_alternatives = close_matches(req, inventory);
    findings.push(Finding::blocked(format!(
        "missing {} — no safe workaround",
        missing
    )));
    for alt in &close_alternatives {
        findings.push(Finding::info(format!("informational alternative: {}", alt)));
    }
    InstallationReport {
        classification: Classification::Blocked,
        findings,
        selected_tool: None,
        effective_torque_nm: torque_nm,
        workaround: None,
        missing_tool: Some(missing),
        close_alternatives,
    }
}

fn optimal_report(
    tool: &ToolInventoryItem,
    torque: Option<Decimal>,
    findings: Vec<Finding>,
) -> InstallationReport {
    InstallationReport {
        classification: classify(&findings),
        findings,
        selected_tool: Some(tool.id.clone()),
        effective_torque_nm: torque,
        workaround: None,
        missing_tool: None,
        close_alternatives: Vec::new(),
    }
}

/// Whether an inventory tool satisfies a requirement's kind, size, and drive
fn matches_requirement(tool: &ToolInventoryItem, req: &ToolRequirement) -> bool {
    if tool.kind != req.kind {
        return false;
    }
    if let Some(req_size) = &req.size {
        match &tool.size {
            Some(tool_size) if size_eq(req_size, tool_size) => {}
            _ => return false,
        }
    }
    if let (Some(req_drive), Some(tool_drive)) = (&req.drive, &tool.drive) {
        if !req_drive.trim().eq_ignore_ascii_case(tool_drive.trim()) {
            return false;
        }
    }
    true
}

/// A tool able to deliver and measure the torque target: the matched tool
/// itself when rated, otherwise a usable torque wrench driving it
fn find_torque_source<'a>(
    matched: &'a ToolInventoryItem,
    usable_matches: &[&'a ToolInventoryItem],
    inventory: &'a [ToolInventoryItem],
    swing_available_deg: Option<Decimal>,
    target: Decimal,
) -> Option<&'a ToolInventoryItem> {
    let rated = |tool: &ToolInventoryItem| tool.max_torque_nm.is_some_and(|max| max >= target);

    if rated(matched) {
        return Some(matched);
    }
    if let Some(tool) = usable_matches.iter().copied().find(|t| rated(t)) {
        return Some(tool);
    }
    inventory
        .iter()
        .find(|tool| {
            tool.kind == ToolKind::TorqueWrench
                && tool.fits_swing(swing_available_deg)
                && rated(tool)
        })
}

/// Record a workaround's findings and build the applied record
fn apply_workaround(
    spec: &crate::specs::tool::WorkaroundSpec,
    tool: &ToolInventoryItem,
    findings: &mut Vec<Finding>,
) -> WorkaroundApplied {
    findings.push(Finding::caution(format!(
        "{} (using {})",
        spec.description,
        tool.describe()
    )));
    for risk in &spec.risks {
        let mut finding = Finding::caution(format!("{} risk: {}", risk.severity, risk.risk));
        if let Some(mitigation) = spec.mitigations.first() {
            finding = finding.with_mitigation(mitigation.clone());
        }
        findings.push(finding);
    }
    WorkaroundApplied {
        substitute_tool: tool.id.clone(),
        description: spec.description.clone(),
        risk_score: spec.risk_score(),
        risks: spec.risks.clone(),
        mitigations: spec.mitigations.clone(),
    }
}

/// Same-kind inventory tools within one size unit of the requirement
fn close_matches(req: &ToolRequirement, inventory: &[ToolInventoryItem]) -> Vec<String> {
    let Some(req_size) = &req.size else {
        return Vec::new();
    };
    inventory
        .iter()
        .filter(|tool| tool.kind == req.kind)
        .filter_map(|tool| {
            let tool_size = tool.size.as_ref()?;
            let delta = size_delta(req_size, tool_size)?;
            (delta > Decimal::ZERO && delta <= CLOSE_SIZE_WINDOW).then(|| {
                format!("{} available (close to {})", tool.describe(), req_size)
            })
        })
        .collect()
}

/// One operation in a project feasibility request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequirement {
    /// Operation name (e.g. "torque head bolts")
    pub operation: String,

    /// Tooling the operation calls for
    pub tool: ToolRequirement,

    /// Torque target, when the operation is torque-critical (N*m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torque_nm: Option<Decimal>,

    /// Swing arc available at this operation (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swing_clearance_deg: Option<Decimal>,
}

/// Installation result for one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub operation: String,
    pub report: InstallationReport,
}

/// Aggregate feasibility over a whole requirement list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFeasibility {
    pub operations: Vec<OperationOutcome>,

    /// Worst classification across the operations
    pub aggregate: Classification,

    /// Deduplicated missing tools, sorted for determinism
    pub missing_tools: Vec<String>,

    /// High and critical workaround risks plus blocked reasons
    pub critical_warnings: Vec<String>,
}

/// Validate every operation of a project against one tool inventory
pub fn validate_project(
    repo: &SpecRepository,
    inventory: &[ToolInventoryItem],
    requirements: &[OperationRequirement],
) -> ProjectFeasibility {
    let mut operations = Vec::with_capacity(requirements.len());
    let mut missing_tools = Vec::new();
    let mut critical_warnings = Vec::new();
    let mut aggregate = Classification::Optimal;

    for requirement in requirements {
        let access = AccessConstraints {
            swing_available_deg: requirement.swing_clearance_deg,
            ..AccessConstraints::default()
        };
        let report = check_installation(
            repo,
            Some(&requirement.tool),
            requirement.torque_nm,
            inventory,
            &access,
        );

        aggregate = aggregate.worst(report.classification);
        if let Some(missing) = &report.missing_tool {
            if !missing_tools.contains(missing) {
                missing_tools.push(missing.clone());
            }
        }
        if let Some(workaround) = &report.workaround {
            for risk in &workaround.risks {
                if risk.severity >= RiskSeverity::High {
                    critical_warnings.push(format!("{}: {}", requirement.operation, risk.risk));
                }
            }
        }
        for finding in &report.findings {
            if finding.classification == Classification::Blocked {
                critical_warnings.push(format!("{}: {}", requirement.operation, finding.reason));
            }
        }

        operations.push(OperationOutcome {
            operation: requirement.operation.clone(),
            report,
        });
    }

    missing_tools.sort();
    ProjectFeasibility {
        operations,
        aggregate,
        missing_tools,
        critical_warnings,
    }
}
