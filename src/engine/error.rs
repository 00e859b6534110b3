//! Engine error taxonomy
//!
//! Only two conditions are hard errors: a referenced id that does not exist
//! and a record that violates its invariants. Everything a calculator can
//! say about a joint is a staged result, not an error.

use thiserror::Error;

/// The kind of record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    Thread,
    Part,
    Material,
    Workaround,
}

impl std::fmt::Display for SpecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecKind::Thread => write!(f, "thread specification"),
            SpecKind::Part => write!(f, "part specification"),
            SpecKind::Material => write!(f, "material compatibility entry"),
            SpecKind::Workaround => write!(f, "workaround"),
        }
    }
}

/// Hard failures surfaced to the caller
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum EngineError {
    /// A referenced id is absent from the repository
    #[error("{kind} '{id}' not found")]
    NotFound { kind: SpecKind, id: String },

    /// A record violates a stated invariant and was rejected at the boundary
    #[error("invalid {kind} '{id}': {}", .violations.join("; "))]
    InvalidSpec {
        kind: SpecKind,
        id: String,
        violations: Vec<String>,
    },
}

impl EngineError {
    pub fn not_found(kind: SpecKind, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid(kind: SpecKind, id: impl Into<String>, violations: Vec<String>) -> Self {
        EngineError::InvalidSpec {
            kind,
            id: id.into(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = EngineError::not_found(SpecKind::Part, "DIN912-M5x16-8.8");
        assert_eq!(
            err.to_string(),
            "part specification 'DIN912-M5x16-8.8' not found"
        );
    }

    #[test]
    fn test_invalid_spec_message_joins_violations() {
        let err = EngineError::invalid(
            SpecKind::Thread,
            "M5-bad",
            vec!["minor_max (4.5) exceeds pitch_min (4.456)".to_string(), "pitch must be positive".to_string()],
        );
        let msg = err.to_string();
        assert!(msg.starts_with("invalid thread specification 'M5-bad':"));
        assert!(msg.contains("; "));
    }
}
