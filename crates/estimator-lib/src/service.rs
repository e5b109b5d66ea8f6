//! Feed demand inference service
//!
//! `FeedEstimator` owns the loaded model for the lifetime of the process.
//! Loading happens exactly once at construction; a failed load latches the
//! service in an Unavailable state that only a restart clears. After a
//! successful load the model is immutable, so concurrent predictions read
//! it without locking.

use crate::artifact::ModelArtifact;
use crate::error::EstimatorError;
use crate::models::{FeedPrediction, FlockObservation};
use crate::trainer::LinearModel;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{error, info};

/// Request field names, in the order they map onto the model's features.
pub const REQUEST_FIELDS: [&str; 4] = [
    "population",
    "age",
    "feed_given_yesterday",
    "feed_leftover_yesterday",
];

/// The inference service object. Construct once at startup and share by
/// reference; prediction never mutates it.
pub struct FeedEstimator {
    model: Option<LinearModel>,
    model_version: String,
    unavailable_reason: Option<String>,
}

impl FeedEstimator {
    /// Load the model artifact from `path`.
    ///
    /// Never fails construction: a missing or corrupt artifact yields an
    /// Unavailable estimator that reports `ModelNotLoaded` on every
    /// prediction. There is no retry and no hot-reload.
    pub fn load(path: &Path) -> Self {
        match ModelArtifact::load(path) {
            Ok(artifact) => {
                info!(
                    path = %path.display(),
                    model_version = %artifact.model_version,
                    r_squared = artifact.r_squared,
                    "Model artifact loaded"
                );
                let model_version = artifact.model_version.clone();
                Self {
                    model: Some(artifact.into_model()),
                    model_version,
                    unavailable_reason: None,
                }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Model load failed, serving unavailable");
                Self {
                    model: None,
                    model_version: String::new(),
                    unavailable_reason: Some(e.to_string()),
                }
            }
        }
    }

    /// Wrap an in-memory model, bypassing the artifact. Used by the
    /// training-side evaluation and by tests.
    pub fn from_model(model: LinearModel, model_version: impl Into<String>) -> Self {
        Self {
            model: Some(model),
            model_version: model_version.into(),
            unavailable_reason: None,
        }
    }

    /// An estimator with no model, as after a failed load.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            model: None,
            model_version: String::new(),
            unavailable_reason: Some(reason.into()),
        }
    }

    /// Whether a model is loaded. Surfaced on the status endpoint.
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_version(&self) -> Option<&str> {
        self.model.as_ref().map(|_| self.model_version.as_str())
    }

    /// Why the service is Unavailable, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable_reason.as_deref()
    }

    /// Predict total feed needed today for one raw request record.
    ///
    /// Validates and coerces the untyped record into a typed observation,
    /// assembles the feature vector in the training-time order, and runs
    /// the model on the single row.
    pub fn predict(&self, raw: &Map<String, Value>) -> Result<FeedPrediction, EstimatorError> {
        let model = self.model.as_ref().ok_or(EstimatorError::ModelNotLoaded)?;
        let observation = validate_request(raw)?;
        let predicted_kg = model.predict(&observation.feature_vector());

        Ok(FeedPrediction {
            feed_needed_today_kg: round_kg(predicted_kg),
            model_version: self.model_version.clone(),
            generated_at: chrono::Utc::now().timestamp(),
        })
    }
}

/// Map the untyped request record onto a typed observation, coercing each
/// required field to a number.
fn validate_request(raw: &Map<String, Value>) -> Result<FlockObservation, EstimatorError> {
    let population = coerce_field(raw, REQUEST_FIELDS[0])?;
    let age_days = coerce_field(raw, REQUEST_FIELDS[1])?;
    let feed_given_yesterday_kg = coerce_field(raw, REQUEST_FIELDS[2])?;
    let feed_leftover_yesterday_kg = coerce_field(raw, REQUEST_FIELDS[3])?;

    Ok(FlockObservation {
        population,
        age_days,
        feed_given_yesterday_kg,
        feed_leftover_yesterday_kg,
    })
}

/// Coerce one field to `f64`. JSON numbers and numeric strings pass;
/// anything else is an invalid-input error naming the field.
fn coerce_field(raw: &Map<String, Value>, field: &str) -> Result<f64, EstimatorError> {
    let value = raw.get(field).ok_or_else(|| EstimatorError::InvalidInput {
        field: field.to_string(),
        reason: "required field is missing".to_string(),
    })?;

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| EstimatorError::InvalidInput {
            field: field.to_string(),
            reason: format!("`{}` is not a number", value),
        })
}

/// Round to two decimal places for display.
fn round_kg(kg: f64) -> f64 {
    (kg * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ModelArtifact, DEFAULT_ARTIFACT_PATH};
    use crate::dataset::{generate, DEFAULT_SAMPLE_COUNT, DEFAULT_SEED};
    use crate::trainer::train;
    use serde_json::json;
    use tempfile::TempDir;

    fn request(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn ready_estimator() -> FeedEstimator {
        let outcome = train(&generate(500, DEFAULT_SEED), DEFAULT_SEED).unwrap();
        FeedEstimator::from_model(outcome.model, "v1")
    }

    #[test]
    fn test_predict_before_load_is_model_not_loaded() {
        let estimator = FeedEstimator::unavailable("artifact missing");
        let raw = request(json!({
            "population": 5000, "age": 21,
            "feed_given_yesterday": 550, "feed_leftover_yesterday": 20
        }));
        let err = estimator.predict(&raw).unwrap_err();
        assert!(matches!(err, EstimatorError::ModelNotLoaded));
        assert!(!estimator.is_ready());
    }

    #[test]
    fn test_missing_field_is_invalid_input() {
        let estimator = ready_estimator();
        let raw = request(json!({
            "population": 5000,
            "feed_given_yesterday": 550, "feed_leftover_yesterday": 20
        }));
        match estimator.predict(&raw).unwrap_err() {
            EstimatorError::InvalidInput { field, .. } => assert_eq!(field, "age"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_is_invalid_input() {
        let estimator = ready_estimator();
        let raw = request(json!({
            "population": 5000, "age": 21,
            "feed_given_yesterday": "abc", "feed_leftover_yesterday": 20
        }));
        match estimator.predict(&raw).unwrap_err() {
            EstimatorError::InvalidInput { field, .. } => {
                assert_eq!(field, "feed_given_yesterday")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let estimator = ready_estimator();
        let raw = request(json!({
            "population": "5000", "age": "21",
            "feed_given_yesterday": "550.0", "feed_leftover_yesterday": "20"
        }));
        let prediction = estimator.predict(&raw).unwrap();
        assert!(prediction.feed_needed_today_kg > 0.0);
    }

    #[test]
    fn test_booleans_and_nulls_do_not_coerce() {
        let estimator = ready_estimator();
        for bad in [json!(true), json!(null), json!([1, 2])] {
            let mut raw = request(json!({
                "population": 5000, "age": 21,
                "feed_given_yesterday": 550, "feed_leftover_yesterday": 20
            }));
            raw.insert("age".to_string(), bad);
            match estimator.predict(&raw).unwrap_err() {
                EstimatorError::InvalidInput { field, .. } => assert_eq!(field, "age"),
                other => panic!("expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let estimator = ready_estimator();
        let raw = request(json!({
            "population": 5000, "age": 21,
            "feed_given_yesterday": 550, "feed_leftover_yesterday": 20,
            "barn": "A-3"
        }));
        assert!(estimator.predict(&raw).is_ok());
    }

    #[test]
    fn test_prediction_is_rounded() {
        let estimator = ready_estimator();
        let raw = request(json!({
            "population": 5000, "age": 21,
            "feed_given_yesterday": 550, "feed_leftover_yesterday": 20
        }));
        let kg = estimator.predict(&raw).unwrap().feed_needed_today_kg;
        assert_eq!(kg, (kg * 100.0).round() / 100.0);
    }

    #[test]
    fn test_end_to_end_week_three_flock() {
        // Full pipeline at the default training configuration: a 5000-bird
        // flock at 21 days with yesterday's figures lands in a sanity band
        // around yesterday's ration.
        let outcome = train(
            &generate(DEFAULT_SAMPLE_COUNT, DEFAULT_SEED),
            DEFAULT_SEED,
        )
        .unwrap();
        let estimator = FeedEstimator::from_model(outcome.model, "v1");
        let raw = request(json!({
            "population": 5000, "age": 21,
            "feed_given_yesterday": 550, "feed_leftover_yesterday": 20
        }));
        let kg = estimator.predict(&raw).unwrap().feed_needed_today_kg;
        assert!((500.0..=650.0).contains(&kg), "prediction {}", kg);
    }

    #[test]
    fn test_load_round_trip_matches_in_memory_model() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_ARTIFACT_PATH);

        let outcome = train(&generate(500, DEFAULT_SEED), DEFAULT_SEED).unwrap();
        ModelArtifact::from_outcome(&outcome).save(&path).unwrap();

        let from_disk = FeedEstimator::load(&path);
        assert!(from_disk.is_ready());
        assert_eq!(from_disk.model_version(), Some("v1"));

        let in_memory = FeedEstimator::from_model(outcome.model, "v1");
        let raw = request(json!({
            "population": 3000, "age": 100,
            "feed_given_yesterday": 300, "feed_leftover_yesterday": 5
        }));
        let a = from_disk.predict(&raw).unwrap().feed_needed_today_kg;
        let b = in_memory.predict(&raw).unwrap().feed_needed_today_kg;
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_load_missing_artifact_latches_unavailable() {
        let dir = TempDir::new().unwrap();
        let estimator = FeedEstimator::load(&dir.path().join("absent.json"));
        assert!(!estimator.is_ready());
        assert!(estimator.model_version().is_none());
        assert!(estimator
            .unavailable_reason()
            .unwrap()
            .contains("not found"));
    }
}
