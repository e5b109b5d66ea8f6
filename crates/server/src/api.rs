//! HTTP API for feed predictions, health checks, and Prometheus metrics
//!
//! Thin boundary: routing, JSON (de)serialization, and status-code
//! mapping. All domain logic lives in `estimator_lib`.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use estimator_lib::{
    EstimatorError, EstimatorMetrics, FeedEstimator, HealthResponse, ReadinessResponse,
    ServiceStatus, StructuredLogger,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<FeedEstimator>,
    pub metrics: EstimatorMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        estimator: Arc<FeedEstimator>,
        metrics: EstimatorMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            estimator,
            metrics,
            logger,
        }
    }
}

/// Failure envelope: machine-readable category plus human-readable message
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: &'static str,
    message: String,
}

impl ErrorEnvelope {
    fn from_error(e: &EstimatorError) -> (StatusCode, Self) {
        let status = match e {
            EstimatorError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            EstimatorError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Self {
                error: e.category(),
                message: e.to_string(),
            },
        )
    }
}

/// Prediction endpoint - single record in, success or failure envelope out
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let start = Instant::now();
    let result = state.estimator.predict(&raw);
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());

    match result {
        Ok(prediction) => {
            state.metrics.inc_predictions();
            state.logger.log_prediction(
                raw.get("population").and_then(Value::as_f64).unwrap_or(0.0),
                raw.get("age").and_then(Value::as_f64).unwrap_or(0.0),
                prediction.feed_needed_today_kg,
                &prediction.model_version,
            );
            (StatusCode::OK, Json(prediction)).into_response()
        }
        Err(e) => {
            match e {
                EstimatorError::InvalidInput { .. } => state.metrics.inc_invalid_input(),
                EstimatorError::ModelNotLoaded => state.metrics.inc_model_not_loaded(),
                _ => {}
            }
            let (status, envelope) = ErrorEnvelope::from_error(&e);
            state.logger.log_rejected_request(envelope.error, &envelope.message);
            (status, Json(envelope)).into_response()
        }
    }
}

/// Health check response - 200 when the model is loaded, 503 otherwise
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthResponse::for_estimator(&state.estimator);

    let status_code = match health.status {
        ServiceStatus::Healthy => StatusCode::OK,
        ServiceStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - ready exactly when the model is loaded
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = ReadinessResponse::for_estimator(&state.estimator);

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
