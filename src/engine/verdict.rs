//! Verdict types shared by every evaluation stage
//!
//! Each stage classifies the joint as optimal, caution, or blocked and
//! explains itself through findings. The aggregate over a full evaluation
//! is the worst stage result: blocked > caution > optimal.

use serde::{Deserialize, Serialize};

use crate::engine::installation::InstallationReport;
use crate::engine::material::MaterialReport;
use crate::engine::strength::StrengthReport;
use crate::engine::thread_fit::{EngagementReport, ThreadFitReport};

/// Stage and aggregate classification, ordered by severity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    #[default]
    Optimal,
    Caution,
    Blocked,
}

impl Classification {
    /// The more severe of two classifications
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Optimal => write!(f, "optimal"),
            Classification::Caution => write!(f, "caution"),
            Classification::Blocked => write!(f, "blocked"),
        }
    }
}

/// The five evaluation stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ThreadFit,
    Engagement,
    Material,
    Strength,
    Installation,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::ThreadFit => write!(f, "thread fit"),
            Stage::Engagement => write!(f, "engagement"),
            Stage::Material => write!(f, "material"),
            Stage::Strength => write!(f, "strength"),
            Stage::Installation => write!(f, "installation"),
        }
    }
}

/// One observation made by a stage
///
/// Optimal findings are informational; caution and blocked findings always
/// carry a reason and, where one exists, a mitigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Severity of the observation
    pub classification: Classification,

    /// Human-readable reason; never empty
    pub reason: String,

    /// What to do about it, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

impl Finding {
    /// Informational note; does not affect the stage classification
    pub fn info(reason: impl Into<String>) -> Self {
        Self {
            classification: Classification::Optimal,
            reason: reason.into(),
            mitigation: None,
        }
    }

    pub fn caution(reason: impl Into<String>) -> Self {
        Self {
            classification: Classification::Caution,
            reason: reason.into(),
            mitigation: None,
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            classification: Classification::Blocked,
            reason: reason.into(),
            mitigation: None,
        }
    }

    pub fn with_mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.mitigation = Some(mitigation.into());
        self
    }
}

/// Worst classification across a set of findings; optimal when empty
pub fn classify(findings: &[Finding]) -> Classification {
    findings
        .iter()
        .map(|f| f.classification)
        .max()
        .unwrap_or(Classification::Optimal)
}

/// Full result of one compatibility evaluation
///
/// All five stage reports are always present, whatever the aggregate: a
/// reader fixing a blocker still needs to see every caution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    /// First queried part
    pub part_a: String,

    /// Second queried part
    pub part_b: String,

    /// Part resolved as the externally-threaded side, when roles are clear
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_part: Option<String>,

    /// Part resolved as the internally-threaded side, when roles are clear
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_part: Option<String>,

    /// Stage 1: thread geometry fit
    pub thread_fit: ThreadFitReport,

    /// Stage 2: engagement length and protrusion
    pub engagement: EngagementReport,

    /// Stage 3: material pair compatibility
    pub material: MaterialReport,

    /// Stage 4: strength margin against the required load
    pub strength: StrengthReport,

    /// Stage 5: installation feasibility
    pub installation: InstallationReport,

    /// Worst stage classification
    pub aggregate: Classification,

    /// Flattened caution/blocked reasons from all stages, in stage order
    pub warnings: Vec<String>,
}

impl CompatibilityResult {
    /// Whether the joint cannot be built as specified
    pub fn is_blocked(&self) -> bool {
        self.aggregate == Classification::Blocked
    }

    /// Stage classifications in execution order
    pub fn stage_classifications(&self) -> [(Stage, Classification); 5] {
        [
            (Stage::ThreadFit, self.thread_fit.classification),
            (Stage::Engagement, self.engagement.classification),
            (Stage::Material, self.material.classification),
            (Stage::Strength, self.strength.classification),
            (Stage::Installation, self.installation.classification),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(Classification::Blocked > Classification::Caution);
        assert!(Classification::Caution > Classification::Optimal);
        assert_eq!(
            Classification::Optimal.worst(Classification::Blocked),
            Classification::Blocked
        );
        assert_eq!(
            Classification::Caution.worst(Classification::Optimal),
            Classification::Caution
        );
    }

    #[test]
    fn test_classify_empty_is_optimal() {
        assert_eq!(classify(&[]), Classification::Optimal);
    }

    #[test]
    fn test_classify_takes_worst() {
        let findings = vec![
            Finding::info("part ends 2 mm below the surface"),
            Finding::caution("marginal engagement, verify with assembly"),
        ];
        assert_eq!(classify(&findings), Classification::Caution);

        let findings = vec![
            Finding::caution("reduced safety margin"),
            Finding::blocked("insufficient thread engagement"),
        ];
        assert_eq!(classify(&findings), Classification::Blocked);
    }

    #[test]
    fn test_info_finding_does_not_escalate() {
        let findings = vec![Finding::info("protrusion 1.5 mm")];
        assert_eq!(classify(&findings), Classification::Optimal);
    }

    #[test]
    fn test_finding_mitigation() {
        let finding = Finding::caution("high galvanic risk")
            .with_mitigation("use isolating washer or compatible alloy");
        assert_eq!(
            finding.mitigation.as_deref(),
            Some("use isolating washer or compatible alloy")
        );
    }

    #[test]
    fn test_classification_serialization() {
        assert_eq!(
            serde_json::to_string(&Classification::Blocked).unwrap(),
            "\"blocked\""
        );
    }
}
