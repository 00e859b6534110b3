//! Substitute part ranking
//!
//! When a part fails or is unavailable, candidates are scored on how close
//! they come dimensionally and in strength, combined under configurable
//! weights, and ordered fully deterministically: overall score, then field
//! success rate, then id.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::repository::SpecRepository;
use crate::engine::error::EngineError;
use crate::specs::part::{PartSpecification, UsageHistory};
use crate::specs::thread::ThreadSpecification;

/// Weights combining the two match scores; normalized before use
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionWeights {
    pub dimensional: Decimal,
    pub strength: Decimal,
}

impl Default for SubstitutionWeights {
    fn default() -> Self {
        Self {
            dimensional: dec!(0.5),
            strength: dec!(0.5),
        }
    }
}

impl SubstitutionWeights {
    fn normalized(self) -> Self {
        let total = self.dimensional + self.strength;
        if total <= Decimal::ZERO {
            return Self::default();
        }
        Self {
            dimensional: self.dimensional / total,
            strength: self.strength / total,
        }
    }
}

/// A scored substitution candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionCandidate {
    /// Candidate part id
    pub part_id: String,

    /// Dimensional closeness in [0, 1]
    pub dimensional_match: Decimal,

    /// Strength closeness in [0, 1]
    pub strength_match: Decimal,

    /// Weighted overall score in [0, 1]
    pub overall: Decimal,

    /// The candidate installs with different tooling or needs shortening
    pub requires_modification: bool,

    /// Field history, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<UsageHistory>,
}

/// Score and rank a candidate pool against a target part
///
/// Every id must resolve; an unknown target or candidate surfaces as
/// `NotFound` rather than being silently skipped. Candidates requiring
/// modification are flagged, never dropped.
pub fn find_substitutes(
    repo: &SpecRepository,
    target_id: &str,
    pool: &[String],
    weights: &SubstitutionWeights,
) -> Result<Vec<SubstitutionCandidate>, EngineError> {
    let target = repo.get_part(target_id)?;
    let target_thread = match &target.thread {
        Some(id) => Some(repo.get_thread(id)?),
        None => None,
    };
    let weights = weights.normalized();

    let mut candidates = Vec::with_capacity(pool.len());
    for candidate_id in pool {
        if candidate_id == target_id {
            continue;
        }
        let candidate = repo.get_part(candidate_id)?;
        let candidate_thread = match &candidate.thread {
            Some(id) => Some(repo.get_thread(id)?),
            None => None,
        };

        let dimensional = dimensional_match(target, target_thread, candidate, candidate_thread);
        let strength = strength_match(target, candidate);
        let overall = weights.dimensional * dimensional + weights.strength * strength;

        candidates.push(SubstitutionCandidate {
            part_id: candidate.id.clone(),
            dimensional_match: dimensional,
            strength_match: strength,
            overall,
            requires_modification: requires_modification(target, candidate),
            history: candidate.history,
        });
    }

    // Overall descending, success rate descending (neutral 0.5 with no
    // history), id ascending: fully deterministic
    candidates.sort_by(|a, b| {
        b.overall
            .cmp(&a.overall)
            .then_with(|| effective_success_rate(b).cmp(&effective_success_rate(a)))
            .then_with(|| a.part_id.cmp(&b.part_id))
    });

    Ok(candidates)
}

fn effective_success_rate(candidate: &SubstitutionCandidate) -> Decimal {
    candidate
        .history
        .and_then(|h| h.success_rate())
        .unwrap_or(dec!(0.5))
}

/// Linear ramp from the window boundary to an exact match
///
/// Zero at and beyond the window, one at delta zero.
fn ramp(delta: Decimal, window: Decimal) -> Decimal {
    if window <= Decimal::ZERO {
        return if delta == Decimal::ZERO {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
    }
    (Decimal::ONE - delta / window).clamp(Decimal::ZERO, Decimal::ONE)
}

/// Mean of the diameter, length, and thread class sub-scores
fn dimensional_match(
    target: &PartSpecification,
    target_thread: Option<&ThreadSpecification>,
    candidate: &PartSpecification,
    candidate_thread: Option<&ThreadSpecification>,
) -> Decimal {
    let length_window = target.length_band();
    let length_score = ramp((candidate.length - target.length).abs(), length_window);

    let (Some(target_thread), Some(candidate_thread)) = (target_thread, candidate_thread) else {
        // No thread on one side: geometry reduces to length; a threaded
        // candidate for an unthreaded target (or vice versa) does not fit
        return if target_thread.is_none() && candidate_thread.is_none() {
            length_score
        } else {
            Decimal::ZERO
        };
    };

    // A different pitch is a different thread; nothing else matters
    if candidate_thread.pitch != target_thread.pitch {
        return Decimal::ZERO;
    }

    let diameter_window = target_thread.major_band();
    let diameter_score = ramp(
        (candidate_thread.nominal_diameter - target_thread.nominal_diameter).abs(),
        diameter_window,
    );

    let class_score = if candidate_thread.tolerance_class == target_thread.tolerance_class {
        Decimal::ONE
    } else {
        dec!(0.5)
    };

    (diameter_score + length_score + class_score) / dec!(3)
}

/// Candidate proof load over target proof load, clipped into [0, 1]
fn strength_match(target: &PartSpecification, candidate: &PartSpecification) -> Decimal {
    if target.proof_load_kn <= Decimal::ZERO {
        return Decimal::ONE;
    }
    (candidate.proof_load_kn / target.proof_load_kn).clamp(Decimal::ZERO, Decimal::ONE)
}

/// Whether installing the candidate needs a change the target did not:
/// different tooling, or a length past the target's upper tolerance
fn requires_modification(target: &PartSpecification, candidate: &PartSpecification) -> bool {
    let tooling_differs = match (&target.required_tool, &candidate.required_tool) {
        (Some(t), Some(c)) => {
            t.kind != c.kind
                || match (&t.size, &c.size) {
                    (Some(ts), Some(cs)) => !crate::specs::tool::size_eq(ts, cs),
                    (None, None) => false,
                    _ => true,
                }
        }
        (None, None) => false,
        _ => true,
    };
    tooling_differs || candidate.length > target.length_max()
}
