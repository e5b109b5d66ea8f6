//! Core library for poultry feed demand estimation
//!
//! This crate provides:
//! - The standard feed-intake-by-age curve
//! - Synthetic training data generation
//! - Linear model training and evaluation
//! - Model artifact persistence with schema validation
//! - The inference service and its error taxonomy
//! - Health reporting and observability

pub mod artifact;
pub mod curve;
pub mod dataset;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod service;
pub mod trainer;

pub use artifact::{ModelArtifact, DEFAULT_ARTIFACT_PATH, MODEL_VERSION};
pub use dataset::{generate, DEFAULT_SAMPLE_COUNT, DEFAULT_SEED};
pub use error::EstimatorError;
pub use health::{HealthResponse, ReadinessResponse, ServiceStatus};
pub use models::*;
pub use observability::{EstimatorMetrics, StructuredLogger};
pub use service::{FeedEstimator, REQUEST_FIELDS};
pub use trainer::{train, LinearModel, TrainingOutcome};
