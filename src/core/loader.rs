//! Catalog loading
//!
//! Reads every spec record under a catalog root into a `SpecRepository`.
//! Loading is strict: a file that fails to parse or a record that violates
//! its invariants aborts the load with a diagnostic naming the file.
//! Corrupt data never reaches the calculators.

use std::fs;
use std::path::Path;

use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::de::DeserializeOwned;

use crate::core::project::Catalog;
use crate::core::repository::SpecRepository;
use crate::engine::error::EngineError;
use crate::specs::material::MaterialCompatibilityEntry;
use crate::specs::part::PartSpecification;
use crate::specs::thread::ThreadSpecification;
use crate::specs::tool::WorkaroundSpec;
use crate::yaml::diagnostics::YamlSyntaxError;

/// Record counts from one catalog load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub threads: usize,
    pub parts: usize,
    pub materials: usize,
    pub workarounds: usize,
}

/// Load a whole catalog into a repository
pub fn load_catalog(catalog: &Catalog) -> Result<(SpecRepository, LoadReport)> {
    let mut repo = SpecRepository::new();
    let mut report = LoadReport::default();

    report.threads = load_records(&catalog.threads_dir(), |spec: ThreadSpecification| {
        repo.insert_thread(spec)
    })?;
    report.parts = load_records(&catalog.parts_dir(), |spec: PartSpecification| {
        repo.insert_part(spec)
    })?;
    report.materials = load_records(
        &catalog.materials_dir(),
        |entry: MaterialCompatibilityEntry| repo.insert_material(entry),
    )?;
    report.workarounds = load_records(&catalog.workarounds_dir(), |spec: WorkaroundSpec| {
        repo.insert_workaround(spec)
    })?;

    Ok((repo, report))
}

/// Load every `.yaml` file in a directory through an insert function
///
/// Files are visited in path order so repeated loads behave identically.
fn load_records<T, F>(dir: &Path, mut insert: F) -> Result<usize>
where
    T: DeserializeOwned + 'static,
    F: FnMut(T) -> std::result::Result<(), EngineError>,
{
    if !dir.exists() {
        return Ok(0);
    }

    let mut paths: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| path.extension().is_some_and(|e| e == "yaml" || e == "yml"))
        .collect();
    paths.sort();

    let mut count = 0;
    for path in paths {
        let content = fs::read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let filename = path.display().to_string();

        let record: T = serde_yml::from_str(&content)
            .map_err(|err| YamlSyntaxError::from_serde_error(&err, &content, &filename))?;

        insert(record).map_err(|err| miette!("{}: {}", filename, err))?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_starter_catalog() {
        let tmp = tempdir().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();

        let (repo, report) = load_catalog(&catalog).unwrap();
        assert_eq!(report.threads, 4);
        assert_eq!(report.parts, 5);
        assert_eq!(report.materials, 2);
        assert_eq!(report.workarounds, 1);

        assert!(repo.get_thread("M3x0.5-6g").is_ok());
        assert!(repo.get_part("DIN912-M5x16-8.8").is_ok());
        let (_, defaulted) = repo.get_material_compatibility("steel", "aluminum_6061");
        assert!(!defaulted);
    }

    #[test]
    fn test_syntax_error_aborts_load() {
        let tmp = tempdir().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();
        fs::write(catalog.threads_dir().join("broken.yaml"), "id: [unclosed").unwrap();

        assert!(load_catalog(&catalog).is_err());
    }

    #[test]
    fn test_invalid_record_aborts_load() {
        let tmp = tempdir().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();
        // minor_max above pitch_min violates the record invariant
        fs::write(
            catalog.threads_dir().join("corrupt.yaml"),
            r#"id: M5-corrupt
gender: external
nominal_diameter: "5.0"
pitch: "0.8"
major_min: "4.826"
major_max: "4.976"
pitch_min: "4.456"
pitch_max: "4.556"
minor_min: "3.869"
minor_max: "4.6"
tolerance_class: 6g
"#,
        )
        .unwrap();

        let err = load_catalog(&catalog).unwrap_err();
        assert!(err.to_string().contains("corrupt.yaml"));
    }

    #[test]
    fn test_missing_dirs_load_empty() {
        let tmp = tempdir().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();
        fs::remove_dir_all(catalog.workarounds_dir()).unwrap();

        let (_, report) = load_catalog(&catalog).unwrap();
        assert_eq!(report.workarounds, 0);
    }
}
