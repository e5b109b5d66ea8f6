//! Model artifact persistence
//!
//! The trained model is handed from the trainer to the serving process as
//! a single JSON file. The artifact embeds the feature schema (names, in
//! order) and a SHA-256 checksum over the numeric payload; the loader
//! validates both so a mismatched or truncated artifact fails fast as
//! corrupt instead of silently mispredicting.

use crate::error::EstimatorError;
use crate::models::{FEATURE_NAMES, NUM_FEATURES, TARGET_NAME};
use crate::trainer::{LinearModel, TrainingOutcome};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Fixed artifact path, relative to the working directory of both the
/// trainer and the server.
pub const DEFAULT_ARTIFACT_PATH: &str = "feed_model.json";

/// Version string stamped into artifacts written by this crate.
pub const MODEL_VERSION: &str = "v1";

/// Serialized form of a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_version: String,
    pub trained_at: i64,
    /// Feature names in the exact order the model was fitted on.
    pub feature_names: Vec<String>,
    pub target: String,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Held-out R² from the training run, informational.
    pub r_squared: f64,
    /// SHA-256 over feature names and the numeric payload.
    pub checksum: String,
}

impl ModelArtifact {
    /// Build an artifact from a training outcome, stamping the schema and
    /// checksum.
    pub fn from_outcome(outcome: &TrainingOutcome) -> Self {
        let feature_names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        let coefficients = outcome.model.coefficients.to_vec();
        let checksum = payload_checksum(&feature_names, &coefficients, outcome.model.intercept);
        Self {
            model_version: MODEL_VERSION.to_string(),
            trained_at: chrono::Utc::now().timestamp(),
            feature_names,
            target: TARGET_NAME.to_string(),
            coefficients,
            intercept: outcome.model.intercept,
            r_squared: outcome.r_squared,
            checksum,
        }
    }

    /// Write the artifact, overwriting any prior one. Goes through a temp
    /// file and rename so a crashed write never leaves a partial artifact.
    pub fn save(&self, path: &Path) -> Result<(), EstimatorError> {
        let persistence = |source| EstimatorError::Persistence {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(persistence)?;
        file.write_all(&json).map_err(persistence)?;
        file.sync_all().map_err(persistence)?;
        fs::rename(&temp_path, path).map_err(persistence)?;

        info!(path = %path.display(), size = json.len(), "Model artifact written");
        Ok(())
    }

    /// Load and validate an artifact.
    ///
    /// Missing file maps to `ArtifactMissing`; a parse failure, a feature
    /// schema that disagrees with this build, or a checksum mismatch all
    /// map to `ArtifactCorrupt`.
    pub fn load(path: &Path) -> Result<Self, EstimatorError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EstimatorError::ArtifactMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(EstimatorError::ArtifactCorrupt {
                    reason: format!("unreadable: {}", e),
                })
            }
        };

        let artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|e| EstimatorError::ArtifactCorrupt {
                reason: format!("deserialization failed: {}", e),
            })?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the embedded schema and checksum against this build's
    /// feature contract.
    fn validate(&self) -> Result<(), EstimatorError> {
        if self.coefficients.len() != NUM_FEATURES {
            return Err(EstimatorError::ArtifactCorrupt {
                reason: format!(
                    "expected {} coefficients, found {}",
                    NUM_FEATURES,
                    self.coefficients.len()
                ),
            });
        }
        if self.feature_names != FEATURE_NAMES {
            return Err(EstimatorError::ArtifactCorrupt {
                reason: format!(
                    "feature order mismatch: artifact has {:?}, this build expects {:?}",
                    self.feature_names, FEATURE_NAMES
                ),
            });
        }
        if self.target != TARGET_NAME {
            return Err(EstimatorError::ArtifactCorrupt {
                reason: format!("unexpected target `{}`", self.target),
            });
        }
        let expected = payload_checksum(&self.feature_names, &self.coefficients, self.intercept);
        if self.checksum != expected {
            return Err(EstimatorError::ArtifactCorrupt {
                reason: format!(
                    "checksum mismatch: artifact says {}, payload hashes to {}",
                    self.checksum, expected
                ),
            });
        }
        Ok(())
    }

    /// Extract the runnable model.
    pub fn into_model(self) -> LinearModel {
        let mut coefficients = [0.0f64; NUM_FEATURES];
        coefficients.copy_from_slice(&self.coefficients);
        LinearModel {
            coefficients,
            intercept: self.intercept,
        }
    }
}

/// SHA-256 over the feature names (UTF-8, in order) and the coefficients
/// and intercept as little-endian IEEE-754 bytes. Independent of JSON
/// number formatting.
fn payload_checksum(feature_names: &[String], coefficients: &[f64], intercept: f64) -> String {
    let mut hasher = Sha256::new();
    for name in feature_names {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
    }
    for coefficient in coefficients {
        hasher.update(coefficient.to_le_bytes());
    }
    hasher.update(intercept.to_le_bytes());
    hex::encode(hasher.finalize())
}
