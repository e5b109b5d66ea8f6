//! Observability infrastructure for the feed estimation service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, request counters, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_gauge, GaugeVec,
    Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for prediction latency (in seconds).
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EstimatorMetricsInner> = OnceLock::new();

struct EstimatorMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    invalid_input_total: IntCounter,
    model_not_loaded_total: IntCounter,
    model_loaded: IntGauge,
    model_info: GaugeVec,
}

impl EstimatorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "feed_estimator_prediction_latency_seconds",
                "Time spent computing a single feed prediction",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "feed_estimator_predictions_total",
                "Total number of successful predictions served"
            )
            .expect("Failed to register predictions_total"),

            invalid_input_total: register_int_counter!(
                "feed_estimator_invalid_input_total",
                "Total number of prediction requests rejected for invalid input"
            )
            .expect("Failed to register invalid_input_total"),

            model_not_loaded_total: register_int_counter!(
                "feed_estimator_model_not_loaded_total",
                "Total number of prediction requests refused while no model was loaded"
            )
            .expect("Failed to register model_not_loaded_total"),

            model_loaded: register_int_gauge!(
                "feed_estimator_model_loaded",
                "Whether a model artifact is currently loaded (1) or not (0)"
            )
            .expect("Failed to register model_loaded"),

            model_info: register_gauge_vec!(
                "feed_estimator_model_info",
                "Information about the currently loaded model",
                &["version"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Metrics handle for the estimation service.
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct EstimatorMetrics {
    _private: (),
}

impl Default for EstimatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatorMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EstimatorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EstimatorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner()
            .prediction_latency_seconds
            .observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_invalid_input(&self) {
        self.inner().invalid_input_total.inc();
    }

    pub fn inc_model_not_loaded(&self) {
        self.inner().model_not_loaded_total.inc();
    }

    /// Record the outcome of the startup artifact load.
    pub fn set_model_loaded(&self, loaded: bool, version: &str) {
        self.inner().model_loaded.set(i64::from(loaded));
        self.inner().model_info.reset();
        if loaded {
            self.inner().model_info.with_label_values(&[version]).set(1.0);
        }
    }
}

/// Structured logger for service events
///
/// Consistent JSON-formatted logging for predictions and lifecycle events.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log a served prediction
    pub fn log_prediction(
        &self,
        population: f64,
        age_days: f64,
        predicted_kg: f64,
        model_version: &str,
    ) {
        info!(
            event = "prediction_served",
            service = %self.service_name,
            population = population,
            age_days = age_days,
            predicted_kg = predicted_kg,
            model_version = %model_version,
            "Served feed prediction"
        );
    }

    /// Log a rejected prediction request
    pub fn log_rejected_request(&self, category: &str, message: &str) {
        info!(
            event = "prediction_rejected",
            service = %self.service_name,
            category = %category,
            message = %message,
            "Rejected prediction request"
        );
    }

    /// Log the startup artifact load outcome
    pub fn log_model_load(&self, path: &str, loaded: bool, detail: &str) {
        if loaded {
            info!(
                event = "model_loaded",
                service = %self.service_name,
                path = %path,
                model_version = %detail,
                "Model artifact loaded"
            );
        } else {
            warn!(
                event = "model_load_failed",
                service = %self.service_name,
                path = %path,
                reason = %detail,
                "Model load failed, service will stay unavailable until restart"
            );
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            service_version = %version,
            "Feed estimation service started"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Feed estimation service shutting down"
        );
    }
}
