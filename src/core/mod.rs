//! Core module - repository, catalog storage, and memoization

pub mod cache;
pub mod loader;
pub mod project;
pub mod repository;

pub use cache::{context_hash, EvaluationCache};
pub use loader::{load_catalog, LoadReport};
pub use project::{Catalog, CatalogError};
pub use repository::SpecRepository;
