//! Thread specification records
//!
//! A thread specification captures the full toleranced geometry of one
//! thread (external or internal): nominal size, pitch, the min/max bounds
//! of the major/pitch/minor diameters, and the engagement ratios the thread
//! needs to develop full strength.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Thread standard family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStandard {
    /// ISO metric coarse (ISO 261/965)
    IsoMetric,
    /// ISO metric fine pitch
    IsoMetricFine,
    /// Unified coarse (ANSI B1.1)
    Unc,
    /// Unified fine
    Unf,
    /// Anything else (pipe, proprietary, ...)
    Other(String),
}

impl Default for ThreadStandard {
    fn default() -> Self {
        ThreadStandard::IsoMetric
    }
}

impl std::fmt::Display for ThreadStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadStandard::IsoMetric => write!(f, "iso_metric"),
            ThreadStandard::IsoMetricFine => write!(f, "iso_metric_fine"),
            ThreadStandard::Unc => write!(f, "unc"),
            ThreadStandard::Unf => write!(f, "unf"),
            ThreadStandard::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Whether the thread is cut on the outside of a shaft or the inside of a hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadGender {
    /// Screw, bolt, stud
    External,
    /// Nut, tapped hole, insert
    Internal,
}

impl std::fmt::Display for ThreadGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadGender::External => write!(f, "external"),
            ThreadGender::Internal => write!(f, "internal"),
        }
    }
}

/// Thread handedness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handedness::Right => write!(f, "right"),
            Handedness::Left => write!(f, "left"),
        }
    }
}

fn default_thread_angle() -> Decimal {
    dec!(60)
}

fn default_min_engagement_ratio() -> Decimal {
    dec!(1.0)
}

fn default_max_engagement_ratio() -> Decimal {
    dec!(3.0)
}

/// Complete toleranced thread specification
///
/// All diameters and the pitch are millimetres. Engagement ratios are
/// multiples of the nominal diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSpecification {
    /// Opaque unique identifier (e.g. "M5x0.8-6g")
    pub id: String,

    /// Standard family
    #[serde(default)]
    pub standard: ThreadStandard,

    /// External (shaft) or internal (hole) thread
    pub gender: ThreadGender,

    /// Handedness (right unless stated)
    #[serde(default)]
    pub handedness: Handedness,

    /// Nominal diameter
    pub nominal_diameter: Decimal,

    /// Thread pitch
    pub pitch: Decimal,

    /// Major diameter bounds
    pub major_min: Decimal,
    pub major_max: Decimal,

    /// Pitch diameter bounds
    pub pitch_min: Decimal,
    pub pitch_max: Decimal,

    /// Minor diameter bounds
    pub minor_min: Decimal,
    pub minor_max: Decimal,

    /// Flank angle in degrees (60 for ISO/UN forms)
    #[serde(default = "default_thread_angle")]
    pub thread_angle_deg: Decimal,

    /// Tolerance class (e.g. "6g", "4g6g", "6H")
    pub tolerance_class: String,

    /// Minimum engagement ratio for a reliable joint
    #[serde(default = "default_min_engagement_ratio")]
    pub min_engagement_ratio: Decimal,

    /// Engagement ratio beyond which extra length adds no strength
    #[serde(default = "default_max_engagement_ratio")]
    pub max_engagement_ratio: Decimal,

    /// Originating standard or drawing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Revision date of the source record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised: Option<DateTime<Utc>>,
}

impl ThreadSpecification {
    /// Mean pitch diameter, used for shear-area estimates
    pub fn pitch_diameter_mean(&self) -> Decimal {
        (self.pitch_min + self.pitch_max) / dec!(2)
    }

    /// Width of the major diameter tolerance band
    pub fn major_band(&self) -> Decimal {
        self.major_max - self.major_min
    }

    /// Check the record invariants, returning every violation found
    ///
    /// The bounds may interleave between diameter tiers (real threads do),
    /// but the minor band must stay below the pitch band and the pitch band
    /// below the major band.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.nominal_diameter <= Decimal::ZERO {
            violations.push("nominal_diameter must be positive".to_string());
        }
        if self.pitch <= Decimal::ZERO {
            violations.push("pitch must be positive".to_string());
        }
        for (name, min, max) in [
            ("major", self.major_min, self.major_max),
            ("pitch", self.pitch_min, self.pitch_max),
            ("minor", self.minor_min, self.minor_max),
        ] {
            if min <= Decimal::ZERO {
                violations.push(format!("{}_min must be positive", name));
            }
            if min > max {
                violations.push(format!("{}_min exceeds {}_max", name, name));
            }
        }
        if self.minor_max > self.pitch_min {
            violations.push(format!(
                "minor_max ({}) exceeds pitch_min ({})",
                self.minor_max, self.pitch_min
            ));
        }
        if self.pitch_max > self.major_min {
            violations.push(format!(
                "pitch_max ({}) exceeds major_min ({})",
                self.pitch_max, self.major_min
            ));
        }
        if self.min_engagement_ratio <= Decimal::ZERO {
            violations.push("min_engagement_ratio must be positive".to_string());
        }
        if self.min_engagement_ratio > self.max_engagement_ratio {
            violations.push("min_engagement_ratio exceeds max_engagement_ratio".to_string());
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m5_external_6g() -> ThreadSpecification {
        ThreadSpecification {
            id: "M5x0.8-6g".to_string(),
            standard: ThreadStandard::IsoMetric,
            gender: ThreadGender::External,
            handedness: Handedness::Right,
            nominal_diameter: dec!(5.0),
            pitch: dec!(0.8),
            major_min: dec!(4.826),
            major_max: dec!(4.976),
            pitch_min: dec!(4.361),
            pitch_max: dec!(4.456),
            minor_min: dec!(3.869),
            minor_max: dec!(4.019),
            thread_angle_deg: dec!(60),
            tolerance_class: "6g".to_string(),
            min_engagement_ratio: dec!(1.0),
            max_engagement_ratio: dec!(3.0),
            source: Some("ISO 965-2".to_string()),
            revised: None,
        }
    }

    #[test]
    fn test_valid_thread_passes() {
        assert!(m5_external_6g().validate().is_empty());
    }

    #[test]
    fn test_interleaved_bounds_are_allowed() {
        // minor_max < pitch_min < pitch_max < major_min holds here, but the
        // tiers are not required to be fully ordered min-to-max across tiers
        let spec = m5_external_6g();
        assert!(spec.minor_max < spec.pitch_min);
        assert!(spec.validate().is_empty());
    }

    #[test]
    fn test_minor_max_above_pitch_min_rejected() {
        let mut spec = m5_external_6g();
        spec.minor_max = dec!(4.5); // above pitch_min 4.361
        let violations = spec.validate();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("minor_max"));
    }

    #[test]
    fn test_pitch_max_above_major_min_rejected() {
        let mut spec = m5_external_6g();
        spec.pitch_max = dec!(4.9); // above major_min 4.826
        let violations = spec.validate();
        assert!(violations.iter().any(|v| v.contains("pitch_max")));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut spec = m5_external_6g();
        spec.major_min = dec!(5.1);
        let violations = spec.validate();
        assert!(violations.iter().any(|v| v.contains("major_min exceeds")));
    }

    #[test]
    fn test_engagement_ratio_ordering() {
        let mut spec = m5_external_6g();
        spec.min_engagement_ratio = dec!(4.0);
        let violations = spec.validate();
        assert!(violations
            .iter()
            .any(|v| v.contains("min_engagement_ratio exceeds")));
    }

    #[test]
    fn test_pitch_diameter_mean() {
        let spec = m5_external_6g();
        // (4.361 + 4.456) / 2 = 4.4085
        assert_eq!(spec.pitch_diameter_mean(), dec!(4.4085));
    }

    #[test]
    fn test_yaml_roundtrip_with_quoted_decimals() {
        let yaml = r#"
id: M5x0.8-6H
standard: iso_metric
gender: internal
nominal_diameter: "5.0"
pitch: "0.8"
major_min: "5.000"
major_max: "5.150"
pitch_min: "4.480"
pitch_max: "4.605"
minor_min: "4.134"
minor_max: "4.334"
tolerance_class: 6H
"#;
        let spec: ThreadSpecification = serde_yml::from_str(yaml).unwrap();
        assert_eq!(spec.gender, ThreadGender::Internal);
        assert_eq!(spec.handedness, Handedness::Right);
        assert_eq!(spec.thread_angle_deg, dec!(60));
        assert_eq!(spec.min_engagement_ratio, dec!(1.0));
        assert_eq!(spec.pitch, dec!(0.8));
        assert!(spec.validate().is_empty());

        let out = serde_yml::to_string(&spec).unwrap();
        let parsed: ThreadSpecification = serde_yml::from_str(&out).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_left_hand_thread_serialization() {
        let mut spec = m5_external_6g();
        spec.handedness = Handedness::Left;
        let yaml = serde_yml::to_string(&spec).unwrap();
        assert!(yaml.contains("left"));
    }
}
