//! Styled report rendering for the default output format

use console::style;

use crate::cli::helpers::{fmt_decimal, fmt_opt_decimal};
use crate::engine::installation::InstallationReport;
use crate::engine::verdict::{Classification, CompatibilityResult, Finding};

/// A classification badge colored by severity
pub fn classification_badge(classification: Classification) -> String {
    match classification {
        Classification::Optimal => style("OPTIMAL").green().to_string(),
        Classification::Caution => style("CAUTION").yellow().to_string(),
        Classification::Blocked => style("BLOCKED").red().to_string(),
    }
}

/// Print a stage's findings, indented under its header
pub fn print_findings(findings: &[Finding]) {
    for finding in findings {
        let marker = match finding.classification {
            Classification::Optimal => style("i").dim(),
            Classification::Caution => style("!").yellow(),
            Classification::Blocked => style("x").red(),
        };
        println!("    {} {}", marker, finding.reason);
        if let Some(mitigation) = &finding.mitigation {
            println!("      {} {}", style("->").dim(), style(mitigation).dim());
        }
    }
}

/// Print a full compatibility result as a staged report
pub fn print_result(result: &CompatibilityResult) {
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{} {} {} {}",
        style(&result.part_a).cyan(),
        style("<->").dim(),
        style(&result.part_b).cyan(),
        classification_badge(result.aggregate)
    );
    if let (Some(external), Some(internal)) = (&result.external_part, &result.internal_part) {
        println!(
            "  {} external: {} | internal: {}",
            style("roles").dim(),
            external,
            internal
        );
    }
    println!("{}", style("─".repeat(60)).dim());

    println!(
        "  {} {}",
        style("thread fit").bold(),
        classification_badge(result.thread_fit.classification)
    );
    if let Some(clearance) = result.thread_fit.major_clearance_min {
        println!(
            "    major clearance {} mm, pitch clearance {} mm, crest clearance {} mm",
            fmt_decimal(clearance),
            fmt_opt_decimal(result.thread_fit.pitch_clearance_min),
            fmt_opt_decimal(result.thread_fit.crest_clearance_max)
        );
    }
    print_findings(&result.thread_fit.findings);

    println!(
        "  {} {}",
        style("engagement").bold(),
        classification_badge(result.engagement.classification)
    );
    println!(
        "    length {} mm, ratio {}, protrusion {} mm",
        fmt_decimal(result.engagement.engagement_length_mm),
        fmt_opt_decimal(result.engagement.engagement_ratio),
        fmt_decimal(result.engagement.protrusion_mm)
    );
    print_findings(&result.engagement.findings);

    println!(
        "  {} {}",
        style("material").bold(),
        classification_badge(result.material.classification)
    );
    println!(
        "    torque reduction factor {}",
        fmt_decimal(result.material.torque_reduction_factor)
    );
    print_findings(&result.material.findings);

    println!(
        "  {} {}",
        style("strength").bold(),
        classification_badge(result.strength.classification)
    );
    println!(
        "    limiting strength {} kN, safety factor {}, weaker part proof load {} kN",
        fmt_opt_decimal(result.strength.limiting_strength_kn),
        fmt_opt_decimal(result.strength.safety_factor),
        fmt_decimal(result.strength.weaker_part_proof_load_kn)
    );
    print_findings(&result.strength.findings);

    print_installation(&result.installation);

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("aggregate").bold(),
        classification_badge(result.aggregate)
    );
}

/// Print an installation report (shared with `project`)
pub fn print_installation(report: &InstallationReport) {
    println!(
        "  {} {}",
        style("installation").bold(),
        classification_badge(report.classification)
    );
    if let Some(tool) = &report.selected_tool {
        println!(
            "    tool {} | effective torque {} N*m",
            tool,
            fmt_opt_decimal(report.effective_torque_nm)
        );
    }
    if let Some(workaround) = &report.workaround {
        println!(
            "    workaround: {} (risk score {})",
            workaround.description,
            fmt_decimal(workaround.risk_score)
        );
    }
    print_findings(&report.findings);
}
