//! Core data models for feed demand estimation

use serde::{Deserialize, Serialize};

/// Number of features the model consumes.
pub const NUM_FEATURES: usize = 4;

/// Canonical feature order shared by the trainer and the inference
/// service. The persisted artifact records these names and the loader
/// rejects any artifact that disagrees.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "population",
    "age_days",
    "feed_given_yesterday_kg",
    "feed_leftover_yesterday_kg",
];

/// Unit of the regression target.
pub const TARGET_NAME: &str = "feed_needed_today_kg";

/// One day's observed state of a flock.
///
/// Population and age are whole-valued in generated data but stored as
/// `f64` since every field enters the model as a numeric feature.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlockObservation {
    pub population: f64,
    pub age_days: f64,
    pub feed_given_yesterday_kg: f64,
    pub feed_leftover_yesterday_kg: f64,
}

impl FlockObservation {
    /// Feature vector in the canonical order of [`FEATURE_NAMES`].
    pub fn feature_vector(&self) -> [f64; NUM_FEATURES] {
        [
            self.population,
            self.age_days,
            self.feed_given_yesterday_kg,
            self.feed_leftover_yesterday_kg,
        ]
    }
}

/// An observation paired with its known feed requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSample {
    pub observation: FlockObservation,
    pub feed_needed_today_kg: f64,
}

/// Ordered synthetic training data. Insertion order is draw order; no
/// deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingDataset {
    pub samples: Vec<LabeledSample>,
}

impl TrainingDataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Prediction success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPrediction {
    /// Predicted total feed requirement in kilograms, rounded to two
    /// decimal places for display.
    pub feed_needed_today_kg: f64,
    pub model_version: String,
    pub generated_at: i64,
}
