//! Specification records - the immutable reference data the engine reads
//!
//! Records are created by an external ingestion pipeline (standards
//! importers, supplier catalogs, field measurement) and validated at the
//! repository boundary; the engine never mutates them.

pub mod context;
pub mod material;
pub mod part;
pub mod thread;
pub mod tool;

pub use context::ApplicationContext;
pub use material::{pair_key, GalvanicRisk, MaterialCompatibilityEntry};
pub use part::{HeadGeometry, PartSpecification, TorqueSpec, UsageHistory};
pub use thread::{Handedness, ThreadGender, ThreadSpecification, ThreadStandard};
pub use tool::{
    size_delta, size_eq, RiskSeverity, ToolInventoryItem, ToolKind, ToolRequirement,
    WorkaroundRisk, WorkaroundSpec,
};
