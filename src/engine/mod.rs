//! The compatibility engine: staged calculators, orchestration, and ranking

pub mod error;
pub mod installation;
pub mod material;
pub mod orchestrator;
pub mod strength;
pub mod substitution;
pub mod thread_fit;
pub mod verdict;

pub use error::{EngineError, SpecKind};
pub use installation::{
    check_installation, validate_project, AccessConstraints, InstallationReport,
    OperationOutcome, OperationRequirement, ProjectFeasibility, WorkaroundApplied,
};
pub use material::{check_materials, MaterialReport, ResolvedPair};
pub use orchestrator::{
    evaluate_batch, evaluate_cached, evaluate_compatibility, BatchItem, BatchOutcome, BatchPair,
    CancellationToken,
};
pub use strength::{check_strength, FailureMode, StrengthReport};
pub use substitution::{find_substitutes, SubstitutionCandidate, SubstitutionWeights};
pub use thread_fit::{
    check_engagement, check_thread_fit, ClassFit, EngagementReport, FitCategory, ThreadFitReport,
};
pub use verdict::{classify, Classification, CompatibilityResult, Finding, Stage};
