//! Health and readiness reporting for the inference server
//!
//! The service state machine has no transitions after startup (Ready and
//! Unavailable are both terminal), so health is derived directly from the
//! immutable estimator instead of being tracked in a mutable registry.

use crate::service::FeedEstimator;
use serde::{Deserialize, Serialize};

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Model loaded, predictions available.
    Healthy,
    /// Model failed to load; predictions fail until restart.
    Unhealthy,
}

/// Health response for the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    pub fn for_estimator(estimator: &FeedEstimator) -> Self {
        if estimator.is_ready() {
            Self {
                status: ServiceStatus::Healthy,
                model_loaded: true,
                model_version: estimator.model_version().map(str::to_string),
                message: None,
            }
        } else {
            Self {
                status: ServiceStatus::Unhealthy,
                model_loaded: false,
                model_version: None,
                message: estimator.unavailable_reason().map(str::to_string),
            }
        }
    }
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReadinessResponse {
    pub fn for_estimator(estimator: &FeedEstimator) -> Self {
        if estimator.is_ready() {
            Self {
                ready: true,
                reason: None,
            }
        } else {
            Self {
                ready: false,
                reason: Some(
                    estimator
                        .unavailable_reason()
                        .unwrap_or("model not loaded")
                        .to_string(),
                ),
            }
        }
    }
}
