//! Boltwise: compatibility and substitution engine for threaded fasteners
//!
//! Given two mating part specifications and an application context, the
//! engine computes a staged verdict (thread fit, engagement, material,
//! strength, installation), ranks substitute parts, and validates whole
//! projects against a tool inventory. Records live in a plain-text YAML
//! catalog.

pub mod cli;
pub mod core;
pub mod engine;
pub mod specs;
pub mod yaml;
