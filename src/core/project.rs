//! Catalog discovery and structure
//!
//! A catalog root is marked by a `boltwise.yaml` file, with the spec
//! records under `catalog/`. `init` scaffolds the directories and a small
//! starter set of records so `check` works out of the box.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Subdirectories holding spec records, relative to the catalog root
pub const CATALOG_DIRS: &[&str] = &[
    "catalog/threads",
    "catalog/parts",
    "catalog/materials",
    "catalog/workarounds",
];

/// Marker file naming a catalog root
pub const MARKER_FILE: &str = "boltwise.yaml";

/// A catalog on disk
#[derive(Debug)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    /// Find the catalog root by walking up from the current directory
    pub fn discover() -> Result<Self, CatalogError> {
        let current =
            std::env::current_dir().map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the catalog root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, CatalogError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| CatalogError::IoError(e.to_string()))?;

        loop {
            if current.join(MARKER_FILE).is_file() {
                return Ok(Self { root: current });
            }
            if !current.pop() {
                return Err(CatalogError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Open a catalog at an explicit root
    pub fn at(root: &Path) -> Result<Self, CatalogError> {
        if !root.join(MARKER_FILE).is_file() {
            return Err(CatalogError::NotFound {
                searched_from: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Create a new catalog structure with starter records
    pub fn init(path: &Path) -> Result<Self, CatalogError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(MARKER_FILE).exists() {
            return Err(CatalogError::AlreadyExists(root.clone()));
        }

        for dir in CATALOG_DIRS {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| CatalogError::IoError(e.to_string()))?;
        }
        std::fs::write(root.join(MARKER_FILE), DEFAULT_CONFIG)
            .map_err(|e| CatalogError::IoError(e.to_string()))?;

        for (relative, content) in STARTER_RECORDS {
            std::fs::write(root.join(relative), content)
                .map_err(|e| CatalogError::IoError(e.to_string()))?;
        }

        Ok(Self { root })
    }

    /// Catalog root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn threads_dir(&self) -> PathBuf {
        self.root.join("catalog/threads")
    }

    pub fn parts_dir(&self) -> PathBuf {
        self.root.join("catalog/parts")
    }

    pub fn materials_dir(&self) -> PathBuf {
        self.root.join("catalog/materials")
    }

    pub fn workarounds_dir(&self) -> PathBuf {
        self.root.join("catalog/workarounds")
    }
}

/// Errors during catalog discovery and creation
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not a boltwise catalog (searched from {searched_from:?}). Run 'boltwise init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("a boltwise catalog already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

const DEFAULT_CONFIG: &str = r#"# Boltwise catalog
# Spec records live under catalog/ as one YAML file per record.
# Quote numeric fields ("0.8", not 0.8) to keep them exact decimals.
"#;

/// Starter records written by `init`: an M3 and an M5 thread pair, the
/// parts that use them, two material entries, and one workaround
const STARTER_RECORDS: &[(&str, &str)] = &[
    (
        "catalog/threads/M3x0.5-6g.yaml",
        r#"id: M3x0.5-6g
standard: iso_metric
gender: external
nominal_diameter: "3.0"
pitch: "0.5"
major_min: "2.874"
major_max: "2.980"
pitch_min: "2.580"
pitch_max: "2.655"
minor_min: "2.272"
minor_max: "2.367"
tolerance_class: 6g
min_engagement_ratio: "1.5"
max_engagement_ratio: "5.0"
source: ISO 965-2
"#,
    ),
    (
        "catalog/threads/M3x0.5-6H.yaml",
        r#"id: M3x0.5-6H
standard: iso_metric
gender: internal
nominal_diameter: "3.0"
pitch: "0.5"
major_min: "3.000"
major_max: "3.150"
pitch_min: "2.675"
pitch_max: "2.775"
minor_min: "2.459"
minor_max: "2.599"
tolerance_class: 6H
min_engagement_ratio: "1.5"
max_engagement_ratio: "5.0"
source: ISO 965-2
"#,
    ),
    (
        "catalog/threads/M5x0.8-6g.yaml",
        r#"id: M5x0.8-6g
standard: iso_metric
gender: external
nominal_diameter: "5.0"
pitch: "0.8"
major_min: "4.826"
major_max: "4.976"
pitch_min: "4.361"
pitch_max: "4.456"
minor_min: "3.869"
minor_max: "4.019"
tolerance_class: 6g
min_engagement_ratio: "1.0"
max_engagement_ratio: "3.0"
source: ISO 965-2
"#,
    ),
    (
        "catalog/threads/M5x0.8-6H.yaml",
        r#"id: M5x0.8-6H
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
min_engagement_ratio: "1.0"
max_engagement_ratio: "3.0"
source: ISO 965-2
"#,
    ),
    (
        "catalog/parts/DIN912-M3x12-A2-70.yaml",
        r#"id: DIN912-M3x12-A2-70
category: fastener
subcategory: socket_head_cap_screw
thread: M3x0.5-6g
length: "12"
length_tol_minus: "0.4"
material: stainless_a2
material_grade: A2-70
tensile_strength_mpa: "700"
proof_load_kn: "2.9"
torque_nm:
  recommended: "1.2"
  min: "0.9"
  max: "1.5"
required_tool:
  kind: hex_key
  size: "2.5"
head:
  head_diameter: "5.5"
  head_height: "3"
  drive_size: "2.5"
  clearance_needed: "6"
source: DIN 912
"#,
    ),
    (
        "catalog/parts/PLATE-M3-6H.yaml",
        r#"id: PLATE-M3-6H
category: plate
subcategory: tapped_hole
thread: M3x0.5-6H
length: "10"
material: stainless_a2
material_grade: A2
tensile_strength_mpa: "520"
proof_load_kn: "5.0"
"#,
    ),
    (
        "catalog/parts/DIN912-M5x16-8.8.yaml",
        r#"id: DIN912-M5x16-8.8
category: fastener
subcategory: socket_head_cap_screw
thread: M5x0.8-6g
length: "16"
length_tol_minus: "0.5"
material: steel
material_grade: "8.8"
tensile_strength_mpa: "800"
yield_strength_mpa: "640"
proof_load_kn: "8.14"
torque_nm:
  recommended: "5.5"
  min: "4.0"
  max: "7.0"
required_tool:
  kind: hex_key
  size: "4"
head:
  head_diameter: "8.5"
  head_height: "5"
  drive_size: "4"
  clearance_needed: "9.5"
source: DIN 912
"#,
    ),
    (
        "catalog/parts/DIN912-M5x12-8.8.yaml",
        r#"id: DIN912-M5x12-8.8
category: fastener
subcategory: socket_head_cap_screw
thread: M5x0.8-6g
length: "12"
length_tol_minus: "0.5"
material: steel
material_grade: "8.8"
tensile_strength_mpa: "800"
yield_strength_mpa: "640"
proof_load_kn: "8.14"
torque_nm:
  recommended: "5.5"
  min: "4.0"
  max: "7.0"
required_tool:
  kind: hex_key
  size: "4"
source: DIN 912
"#,
    ),
    (
        "catalog/parts/PLATE-M5-6H-AL.yaml",
        r#"id: PLATE-M5-6H-AL
category: plate
subcategory: tapped_hole
thread: M5x0.8-6H
length: "12"
material: aluminum_6061
material_grade: 6061-T6
tensile_strength_mpa: "310"
proof_load_kn: "6.0"
"#,
    ),
    (
        "catalog/materials/steel-aluminum_6061.yaml",
        r#"material_a: steel
material_b: aluminum_6061
galvanic_risk: medium
thermal_expansion_delta: "11.5"
thread_locker_required: true
torque_reduction_factor: "0.85"
"#,
    ),
    (
        "catalog/materials/stainless_a2-aluminum_6061.yaml",
        r#"material_a: stainless_a2
material_b: aluminum_6061
galvanic_risk: high
thermal_expansion_delta: "6.1"
anti_seize_required: true
torque_reduction_factor: "0.9"
"#,
    ),
    (
        "catalog/workarounds/socket-via-wrench.yaml",
        r#"required: socket
substitute: wrench
description: open-end wrench on the hex head
risks:
  - severity: medium
    risk: rounding the head under load
    probability: "0.2"
    consequence: seized fastener
mitigations:
  - seat the wrench fully before loading
"#,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();

        assert!(catalog.root().join(MARKER_FILE).is_file());
        assert!(catalog.threads_dir().is_dir());
        assert!(catalog.parts_dir().is_dir());
        assert!(catalog.materials_dir().is_dir());
        assert!(catalog.workarounds_dir().is_dir());
        assert!(catalog
            .parts_dir()
            .join("DIN912-M3x12-A2-70.yaml")
            .is_file());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Catalog::init(tmp.path()).unwrap();
        let err = Catalog::init(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyExists(_)));
    }

    #[test]
    fn test_discover_walks_up() {
        let tmp = tempdir().unwrap();
        Catalog::init(tmp.path()).unwrap();

        let nested = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&nested).unwrap();

        let catalog = Catalog::discover_from(&nested).unwrap();
        assert_eq!(
            catalog.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_discover_fails_without_marker() {
        let tmp = tempdir().unwrap();
        let err = Catalog::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[test]
    fn test_starter_records_parse_and_validate() {
        use crate::specs::material::MaterialCompatibilityEntry;
        use crate::specs::part::PartSpecification;
        use crate::specs::thread::ThreadSpecification;
        use crate::specs::tool::WorkaroundSpec;

        for (path, content) in STARTER_RECORDS {
            if path.contains("/threads/") {
                let spec: ThreadSpecification = serde_yml::from_str(content).unwrap();
                assert!(spec.validate().is_empty(), "{} invalid", path);
            } else if path.contains("/parts/") {
                let spec: PartSpecification = serde_yml::from_str(content).unwrap();
                assert!(spec.validate().is_empty(), "{} invalid", path);
            } else if path.contains("/materials/") {
                let entry: MaterialCompatibilityEntry = serde_yml::from_str(content).unwrap();
                assert!(entry.validate().is_empty(), "{} invalid", path);
            } else {
                let spec: WorkaroundSpec = serde_yml::from_str(content).unwrap();
                assert!(spec.validate().is_empty(), "{} invalid", path);
            }
        }
    }
}
