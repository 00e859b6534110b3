//! Command implementations

pub mod batch;
pub mod check;
pub mod completions;
pub mod init;
pub mod material;
pub mod part;
pub mod project;
pub mod subs;
pub mod thread;

use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use crate::cli::GlobalOpts;
use crate::core::loader::{load_catalog, LoadReport};
use crate::core::project::Catalog;
use crate::core::repository::SpecRepository;
use crate::specs::context::ApplicationContext;
use crate::specs::tool::ToolInventoryItem;
use crate::yaml::diagnostics::YamlSyntaxError;

/// Resolve the catalog from --catalog or by discovery and load it
pub fn open_repository(global: &GlobalOpts) -> Result<(SpecRepository, LoadReport)> {
    let catalog = match &global.catalog {
        Some(root) => Catalog::at(root).map_err(|e| miette::miette!("{}", e))?,
        None => Catalog::discover().map_err(|e| miette::miette!("{}", e))?,
    };
    load_catalog(&catalog)
}

/// Load a YAML value from a file with source-located diagnostics
pub fn load_yaml_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let value = serde_yml::from_str(&content)
        .map_err(|err| YamlSyntaxError::from_serde_error(&err, &content, &path.display().to_string()))?;
    Ok(value)
}

/// Application context flags shared by `check` and `batch`
#[derive(clap::Args, Debug)]
pub struct ContextArgs {
    /// Material of the first mating surface (default: the parts' own materials)
    #[arg(long)]
    pub material_a: Option<String>,

    /// Material of the second mating surface
    #[arg(long)]
    pub material_b: Option<String>,

    /// Clamped stack thickness in mm
    #[arg(long)]
    pub stack: Decimal,

    /// Required holding load in kN
    #[arg(long, default_value = "0")]
    pub load: Decimal,

    /// YAML file listing the available tools
    #[arg(long)]
    pub tools: Option<std::path::PathBuf>,

    /// Swing arc available at the fastener in degrees
    #[arg(long)]
    pub swing: Option<Decimal>,

    /// Linear clearance available around the head in mm
    #[arg(long)]
    pub access: Option<Decimal>,

    /// Thread locker will be applied during installation
    #[arg(long)]
    pub thread_locker: bool,

    /// Anti-seize will be applied during installation
    #[arg(long)]
    pub anti_seize: bool,
}

impl ContextArgs {
    /// Build the context, falling back to the given surface materials
    pub fn build(&self, default_a: &str, default_b: &str) -> Result<ApplicationContext> {
        let tools: Vec<ToolInventoryItem> = match &self.tools {
            Some(path) => load_yaml_file(path)?,
            None => Vec::new(),
        };
        Ok(ApplicationContext {
            material_a: self
                .material_a
                .clone()
                .unwrap_or_else(|| default_a.to_string()),
            material_b: self
                .material_b
                .clone()
                .unwrap_or_else(|| default_b.to_string()),
            stack_thickness_mm: self.stack,
            required_load_kn: self.load,
            tools,
            swing_clearance_deg: self.swing,
            access_clearance_mm: self.access,
            thread_locker_planned: self.thread_locker,
            anti_seize_planned: self.anti_seize,
        })
    }
}
