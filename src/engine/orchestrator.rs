//! Compatibility evaluation orchestration
//!
//! One evaluation runs the five stages in fixed order: thread fit,
//! engagement, material, strength, installation. Every stage always runs
//! and every finding is retained; the aggregate is simply the worst stage.
//! Evaluations are pure, so batches fan out across threads with no shared
//! state beyond a cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::cache::EvaluationCache;
use crate::core::repository::SpecRepository;
use crate::engine::error::EngineError;
use crate::engine::installation::{check_installation, AccessConstraints};
use crate::engine::material::check_materials;
use crate::engine::strength::check_strength;
use crate::engine::thread_fit::{check_engagement, check_thread_fit, ThreadFitReport};
use crate::engine::verdict::{Classification, CompatibilityResult, Stage};
use crate::specs::context::ApplicationContext;
use crate::specs::part::PartSpecification;
use crate::specs::thread::{ThreadGender, ThreadSpecification};

/// Evaluate the compatibility of two parts in an application context
///
/// Hard errors are only an unknown part id or an unknown thread reference;
/// everything the calculators find is reported through the staged result.
pub fn evaluate_compatibility(
    repo: &SpecRepository,
    part_a_id: &str,
    part_b_id: &str,
    ctx: &ApplicationContext,
) -> Result<CompatibilityResult, EngineError> {
    let part_a = repo.get_part(part_a_id)?;
    let part_b = repo.get_part(part_b_id)?;

    let thread_a = match &part_a.thread {
        Some(id) => Some(repo.get_thread(id)?),
        None => None,
    };
    let thread_b = match &part_b.thread {
        Some(id) => Some(repo.get_thread(id)?),
        None => None,
    };

    let roles = resolve_roles(part_a, thread_a, part_b, thread_b);

    // The fastener side drives engagement, strength and tooling; when the
    // roles cannot be resolved, part A stands in so the remaining stages
    // still report something useful
    let (external_part, external_thread, internal_part, internal_thread) = match &roles {
        Roles::Resolved {
            external_part,
            external_thread,
            internal_part,
            internal_thread,
        } => (
            *external_part,
            Some(*external_thread),
            *internal_part,
            Some(*internal_thread),
        ),
        Roles::Unresolved { .. } => (part_a, thread_a, part_b, thread_b),
    };

    let thread_fit = match &roles {
        Roles::Resolved {
            external_thread,
            internal_thread,
            ..
        } => check_thread_fit(external_thread, internal_thread),
        Roles::Unresolved { reason } => ThreadFitReport::unavailable(reason.clone()),
    };

    let engagement = check_engagement(external_thread, external_part, ctx.stack_thickness_mm);

    let material = check_materials(repo, external_part, internal_part, ctx);

    let strength = check_strength(
        external_thread,
        internal_thread,
        external_part,
        internal_part,
        engagement.engagement_length_mm,
        ctx.required_load_kn,
    );

    let effective_torque = external_part
        .torque_nm
        .planning_torque()
        .map(|torque| torque * material.torque_reduction_factor);
    let access = AccessConstraints {
        swing_available_deg: ctx.swing_clearance_deg,
        access_clearance_mm: ctx.access_clearance_mm,
        head_clearance_needed_mm: external_part
            .head
            .as_ref()
            .and_then(|head| head.clearance_needed),
    };
    let installation = check_installation(
        repo,
        external_part.required_tool.as_ref(),
        effective_torque,
        &ctx.tools,
        &access,
    );

    let aggregate = [
        thread_fit.classification,
        engagement.classification,
        material.classification,
        strength.classification,
        installation.classification,
    ]
    .into_iter()
    .fold(Classification::Optimal, Classification::worst);

    // Flatten caution and blocked reasons in stage order; cautions survive
    // even when a later stage blocks
    let mut warnings = Vec::new();
    for (stage, findings) in [
        (Stage::ThreadFit, &thread_fit.findings),
        (Stage::Engagement, &engagement.findings),
        (Stage::Material, &material.findings),
        (Stage::Strength, &strength.findings),
        (Stage::Installation, &installation.findings),
    ] {
        for finding in findings {
            if finding.classification > Classification::Optimal {
                warnings.push(format!("{}: {}", stage, finding.reason));
            }
        }
    }

    let (external_id, internal_id) = match &roles {
        Roles::Resolved {
            external_part,
            internal_part,
            ..
        } => (
            Some(external_part.id.clone()),
            Some(internal_part.id.clone()),
        ),
        Roles::Unresolved { .. } => (None, None),
    };

    Ok(CompatibilityResult {
        part_a: part_a.id.clone(),
        part_b: part_b.id.clone(),
        external_part: external_id,
        internal_part: internal_id,
        thread_fit,
        engagement,
        material,
        strength,
        installation,
        aggregate,
        warnings,
    })
}

/// Evaluate through a memo cache, storing on miss
pub fn evaluate_cached(
    repo: &SpecRepository,
    cache: &EvaluationCache,
    part_a_id: &str,
    part_b_id: &str,
    ctx: &ApplicationContext,
) -> Result<CompatibilityResult, EngineError> {
    if let Some(result) = cache.lookup(part_a_id, part_b_id, ctx) {
        return Ok(result);
    }
    let result = evaluate_compatibility(repo, part_a_id, part_b_id, ctx)?;
    cache.store(part_a_id, part_b_id, ctx, result.clone());
    Ok(result)
}

enum Roles<'a> {
    Resolved {
        external_part: &'a PartSpecification,
        external_thread: &'a ThreadSpecification,
        internal_part: &'a PartSpecification,
        internal_thread: &'a ThreadSpecification,
    },
    Unresolved {
        reason: String,
    },
}

/// Decide which part is the externally threaded side
///
/// Auto-detected from thread gender, in either argument order. Pairings
/// with missing threads or matching genders stay unresolved and block the
/// thread stage with the reason.
fn resolve_roles<'a>(
    part_a: &'a PartSpecification,
    thread_a: Option<&'a ThreadSpecification>,
    part_b: &'a PartSpecification,
    thread_b: Option<&'a ThreadSpecification>,
) -> Roles<'a> {
    match (thread_a, thread_b) {
        (Some(a), Some(b)) => match (a.gender, b.gender) {
            (ThreadGender::External, ThreadGender::Internal) => Roles::Resolved {
                external_part: part_a,
                external_thread: a,
                internal_part: part_b,
                internal_thread: b,
            },
            (ThreadGender::Internal, ThreadGender::External) => Roles::Resolved {
                external_part: part_b,
                external_thread: b,
                internal_part: part_a,
                internal_thread: a,
            },
            (ThreadGender::External, ThreadGender::External) => Roles::Unresolved {
                reason: "mating requires one external and one internal thread (both are external)"
                    .to_string(),
            },
            (ThreadGender::Internal, ThreadGender::Internal) => Roles::Unresolved {
                reason: "mating requires one external and one internal thread (both are internal)"
                    .to_string(),
            },
        },
        (None, _) => Roles::Unresolved {
            reason: format!("part '{}' has no thread specification", part_a.id),
        },
        (_, None) => Roles::Unresolved {
            reason: format!("part '{}' has no thread specification", part_b.id),
        },
    }
}

/// Shared flag cancelling a whole batch between items
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One pair in a batch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPair {
    pub part_a: String,
    pub part_b: String,
}

/// Outcome of one batch item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed(Box<CompatibilityResult>),
    Failed(EngineError),
    Cancelled,
}

/// Result of one batch item, addressable independently of the others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub part_a: String,
    pub part_b: String,
    pub outcome: BatchOutcome,
}

/// Fan a batch of independent evaluations across the thread pool
///
/// Results come back in input order. The token is checked before each
/// item; items picked up after cancellation report `Cancelled` instead of
/// evaluating.
pub fn evaluate_batch(
    repo: &SpecRepository,
    pairs: &[BatchPair],
    ctx: &ApplicationContext,
    token: &CancellationToken,
) -> Vec<BatchItem> {
    pairs
        .par_iter()
        .map(|pair| {
            let outcome = if token.is_cancelled() {
                BatchOutcome::Cancelled
            } else {
                match evaluate_compatibility(repo, &pair.part_a, &pair.part_b, ctx) {
                    Ok(result) => BatchOutcome::Completed(Box::new(result)),
                    Err(err) => BatchOutcome::Failed(err),
                }
            };
            BatchItem {
                part_a: pair.part_a.clone(),
                part_b: pair.part_b.clone(),
                outcome,
            }
        })
        .collect()
}
