//! YAML loading support

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;
