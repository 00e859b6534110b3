//! Thread fit and engagement analysis
//!
//! Two checks make up the first half of an evaluation: whether the thread
//! geometries mate at all (worst-case tolerance stack over the major, pitch
//! and minor diameters), and whether the engaged length develops enough of
//! the thread's strength.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::verdict::{classify, Classification, Finding};
use crate::specs::part::PartSpecification;
use crate::specs::thread::ThreadSpecification;

/// Nominal diameters must agree within this band to be the same size
pub const DIAMETER_EPSILON: Decimal = dec!(0.001);

/// Engagement ratios inside (min, 1.25 * min) are marginal
const MARGINAL_ENGAGEMENT_FACTOR: Decimal = dec!(1.25);

/// Protrusion beyond this multiple of the nominal diameter draws a caution
const EXCESS_PROTRUSION_DIAMETERS: Decimal = dec!(2);

/// Fit category of a tolerance class combination (ISO 965-1 preferred fits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitCategory {
    Close,
    Medium,
    Loose,
    NonStandard,
}

impl FitCategory {
    /// Allowed worst-case crest clearance as a multiple of the pitch
    ///
    /// Tighter fits tolerate less crest play before the flanks stop
    /// carrying load as intended. Standard ISO pairs land around 0.65 P at
    /// worst case, inside every allowance here.
    pub fn crest_allowance_per_pitch(self) -> Decimal {
        match self {
            FitCategory::Close => dec!(0.70),
            FitCategory::Medium => dec!(0.80),
            FitCategory::Loose => dec!(0.95),
            FitCategory::NonStandard => dec!(0.70),
        }
    }
}

impl std::fmt::Display for FitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitCategory::Close => write!(f, "close"),
            FitCategory::Medium => write!(f, "medium"),
            FitCategory::Loose => write!(f, "loose"),
            FitCategory::NonStandard => write!(f, "non-standard"),
        }
    }
}

/// One matched entry from the preferred fit table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassFit {
    pub external_class: String,
    pub internal_class: String,
    pub category: FitCategory,
}

/// ISO 965-1 preferred external/internal class combinations
const PREFERRED_FITS: &[(&str, &str, FitCategory)] = &[
    ("6g", "6H", FitCategory::Medium),
    ("6g", "6G", FitCategory::Medium),
    ("4g6g", "6H", FitCategory::Close),
    ("4g6g", "5H", FitCategory::Close),
    ("8g", "7H", FitCategory::Loose),
];

/// All preferred-fit entries a class pair matches
///
/// Compound external classes ("4g6g" carries a 4g pitch class and a 6g
/// crest class) match both their exact entry and any entry for an embedded
/// class, so one pair can legitimately match conflicting categories.
pub fn matching_class_fits(external_class: &str, internal_class: &str) -> Vec<ClassFit> {
    let ext = external_class.trim();
    let int = internal_class.trim();
    PREFERRED_FITS
        .iter()
        .filter(|(e, i, _)| *i == int && (*e == ext || (ext.len() > e.len() && ext.contains(e))))
        .map(|(e, i, category)| ClassFit {
            external_class: (*e).to_string(),
            internal_class: (*i).to_string(),
            category: *category,
        })
        .collect()
}

/// Result of the thread geometry fit check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadFitReport {
    pub classification: Classification,
    pub findings: Vec<Finding>,

    /// Worst-case major diameter clearance (internal major_min - external major_max)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_clearance_min: Option<Decimal>,

    /// Worst-case pitch diameter clearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_clearance_min: Option<Decimal>,

    /// Best-case pitch diameter clearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_clearance_max: Option<Decimal>,

    /// Worst-case crest clearance (internal minor_max - external minor_min)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crest_clearance_max: Option<Decimal>,

    /// Matched preferred-fit entries for the class pair
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_fits: Vec<ClassFit>,
}

impl ThreadFitReport {
    /// A report for a pairing that cannot be analyzed (missing thread,
    /// wrong genders); carries a single blocked finding
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let findings = vec![Finding::blocked(reason)];
        Self {
            classification: Classification::Blocked,
            findings,
            major_clearance_min: None,
            pitch_clearance_min: None,
            pitch_clearance_max: None,
            crest_clearance_max: None,
            class_fits: Vec::new(),
        }
    }
}

/// Check whether an external and an internal thread mate
pub fn check_thread_fit(
    external: &ThreadSpecification,
    internal: &ThreadSpecification,
) -> ThreadFitReport {
    let mut findings = Vec::new();

    if external.handedness != internal.handedness {
        findings.push(Finding::blocked(format!(
            "handedness mismatch: {} external vs {} internal thread",
            external.handedness, internal.handedness
        )));
    }

    let diameter_delta = (external.nominal_diameter - internal.nominal_diameter).abs();
    if diameter_delta > DIAMETER_EPSILON {
        findings.push(Finding::blocked(format!(
            "diameter mismatch: {} vs {}",
            external.nominal_diameter, internal.nominal_diameter
        )));
    }

    if external.pitch != internal.pitch {
        findings.push(Finding::blocked(format!(
            "pitch mismatch: {} vs {}",
            external.pitch, internal.pitch
        )));
    }

    // Basic incompatibility makes the tolerance stack meaningless
    if !findings.is_empty() {
        let classification = classify(&findings);
        return ThreadFitReport {
            classification,
            findings,
            major_clearance_min: None,
            pitch_clearance_min: None,
            pitch_clearance_max: None,
            crest_clearance_max: None,
            class_fits: Vec::new(),
        };
    }

    let class_fits = matching_class_fits(&external.tolerance_class, &internal.tolerance_class);
    let categories: Vec<FitCategory> = {
        let mut seen = Vec::new();
        for fit in &class_fits {
            if !seen.contains(&fit.category) {
                seen.push(fit.category);
            }
        }
        seen
    };
    let category = match categories.as_slice() {
        [] => {
            findings.push(Finding::info(format!(
                "no preferred fit documented for {}/{}",
                external.tolerance_class, internal.tolerance_class
            )));
            FitCategory::NonStandard
        }
        [single] => *single,
        conflicting => {
            let listed: Vec<String> = class_fits
                .iter()
                .map(|f| format!("{} ({}/{})", f.category, f.external_class, f.internal_class))
                .collect();
            findings.push(Finding::caution(format!(
                "ambiguous tolerance class fit for {}/{}: {}",
                external.tolerance_class,
                internal.tolerance_class,
                listed.join(" vs ")
            )));
            // Analyze against the most demanding matched category
            *conflicting
                .iter()
                .min_by_key(|c| c.crest_allowance_per_pitch())
                .unwrap_or(&FitCategory::NonStandard)
        }
    };

    let major_clearance_min = internal.major_min - external.major_max;
    if major_clearance_min < Decimal::ZERO {
        findings.push(Finding::blocked(format!(
            "major diameter interference ({} mm): threads will not assemble",
            major_clearance_min.abs().normalize()
        )));
    }

    let pitch_clearance_min = internal.pitch_min - external.pitch_max;
    let pitch_clearance_max = internal.pitch_max - external.pitch_min;
    if pitch_clearance_min < Decimal::ZERO {
        findings.push(Finding::blocked(format!(
            "pitch diameter interference ({} mm): threads will not assemble",
            pitch_clearance_min.abs().normalize()
        )));
    }

    let crest_clearance_max = internal.minor_max - external.minor_min;
    let crest_allowance = category.crest_allowance_per_pitch() * external.pitch;
    if crest_clearance_max > crest_allowance {
        findings.push(Finding::blocked(format!(
            "worst-case crest clearance {} mm exceeds the {} fit allowance of {} mm",
            crest_clearance_max.normalize(),
            category,
            crest_allowance.normalize()
        )));
    }

    let classification = classify(&findings);
    ThreadFitReport {
        classification,
        findings,
        major_clearance_min: Some(major_clearance_min),
        pitch_clearance_min: Some(pitch_clearance_min),
        pitch_clearance_max: Some(pitch_clearance_max),
        crest_clearance_max: Some(crest_clearance_max),
        class_fits,
    }
}

/// Result of the engagement length check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementReport {
    pub classification: Classification,
    pub findings: Vec<Finding>,

    /// Axial length of thread actually engaged (mm)
    pub engagement_length_mm: Decimal,

    /// Engagement length over nominal diameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_ratio: Option<Decimal>,

    /// The thread's minimum acceptable ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_engagement_ratio: Option<Decimal>,

    /// Part length minus stack thickness (mm); negative means buried
    pub protrusion_mm: Decimal,
}

/// Check engagement length and protrusion for the externally threaded part
pub fn check_engagement(
    thread: Option<&ThreadSpecification>,
    part: &PartSpecification,
    stack_thickness_mm: Decimal,
) -> EngagementReport {
    let threaded_length = part.length - part.grip_length.unwrap_or(Decimal::ZERO);
    let engagement_length = threaded_length.min(stack_thickness_mm);
    let protrusion = part.length - stack_thickness_mm;

    let mut findings = Vec::new();

    let Some(thread) = thread else {
        findings.push(Finding::blocked(format!(
            "part '{}' has no thread specification; engagement cannot be assessed",
            part.id
        )));
        return EngagementReport {
            classification: Classification::Blocked,
            findings,
            engagement_length_mm: engagement_length,
            engagement_ratio: None,
            min_engagement_ratio: None,
            protrusion_mm: protrusion,
        };
    };

    let ratio = engagement_length / thread.nominal_diameter;
    let min_ratio = thread.min_engagement_ratio;
    let marginal_ceiling = min_ratio * MARGINAL_ENGAGEMENT_FACTOR;

    // The minimum itself is acceptable; only the open interval between the
    // minimum and 1.25x the minimum is treated as marginal
    if ratio < min_ratio {
        findings.push(Finding::blocked(format!(
            "insufficient thread engagement: ratio {} below minimum {}",
            ratio.round_dp(3).normalize(),
            min_ratio.normalize()
        )));
    } else if ratio > min_ratio && ratio < marginal_ceiling {
        findings.push(
            Finding::caution("marginal engagement, verify with assembly").with_mitigation(
                format!(
                    "increase engagement to at least {} diameters",
                    marginal_ceiling.round_dp(3).normalize()
                ),
            ),
        );
    }

    if ratio > thread.max_engagement_ratio {
        findings.push(Finding::info(format!(
            "engagement ratio {} exceeds the useful maximum {}; extra length adds no strength",
            ratio.round_dp(3).normalize(),
            thread.max_engagement_ratio.normalize()
        )));
    }

    if protrusion < Decimal::ZERO {
        findings.push(Finding::info(format!(
            "part ends {} mm below the surface",
            protrusion.abs().normalize()
        )));
    } else if protrusion > EXCESS_PROTRUSION_DIAMETERS * thread.nominal_diameter {
        findings.push(Finding::caution(format!(
            "excess length, consider shorter part or spacer (protrusion {} mm)",
            protrusion.normalize()
        )));
    }

    let classification = classify(&findings);
    EngagementReport {
        classification,
        findings,
        engagement_length_mm: engagement_length,
        engagement_ratio: Some(ratio),
        min_engagement_ratio: Some(min_ratio),
        protrusion_mm: protrusion,
    }
}
