//! Error taxonomy for the estimation pipeline
//!
//! Load-time failures (`ArtifactMissing`, `ArtifactCorrupt`) are permanent
//! for the process lifetime; per-request failures (`InvalidInput`,
//! `ModelNotLoaded`) are isolated to the request and never touch shared
//! state.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Model artifact absent at load time.
    #[error("model artifact not found at {}", path.display())]
    ArtifactMissing { path: PathBuf },

    /// Model artifact present but unusable: deserialization failure,
    /// feature schema mismatch, or checksum mismatch.
    #[error("model artifact is corrupt: {reason}")]
    ArtifactCorrupt { reason: String },

    /// A required prediction field is missing or not coercible to a number.
    #[error("invalid input for field `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Prediction attempted while no model is loaded.
    #[error("no model loaded")]
    ModelNotLoaded,

    /// The trained artifact could not be written. Fatal to a training run.
    #[error("failed to persist model artifact to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fit could not be computed (degenerate design matrix).
    #[error("training failed: {0}")]
    Training(String),
}

impl EstimatorError {
    /// Stable machine-readable category for the failure envelope.
    pub fn category(&self) -> &'static str {
        match self {
            EstimatorError::ArtifactMissing { .. } => "artifact_missing",
            EstimatorError::ArtifactCorrupt { .. } => "artifact_corrupt",
            EstimatorError::InvalidInput { .. } => "invalid_input",
            EstimatorError::ModelNotLoaded => "model_not_loaded",
            EstimatorError::Persistence { .. } => "persistence_failure",
            EstimatorError::Training(_) => "training_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = EstimatorError::InvalidInput {
            field: "age".to_string(),
            reason: "missing".to_string(),
        };
        assert!(err.to_string().contains("age"));
        assert_eq!(err.category(), "invalid_input");
    }

    #[test]
    fn test_categories_are_stable() {
        assert_eq!(EstimatorError::ModelNotLoaded.category(), "model_not_loaded");
        let err = EstimatorError::ArtifactCorrupt {
            reason: "checksum mismatch".to_string(),
        };
        assert_eq!(err.category(), "artifact_corrupt");
    }
}
