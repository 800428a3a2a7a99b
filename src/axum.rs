//! Axum health-check route for the PayPal service

use crate::service::PayPalPaymentService;
use crate::transport::NvpTransport;
use crate::types::ServiceStatus;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Body returned by `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub service: String,
    pub status: ServiceStatus,
    pub failure_count: u32,
}

/// Router serving `GET /health` for polling by load balancers and monitors
///
/// Answers `200 OK` while the gateway is up and `503 Service Unavailable`
/// once the failure threshold has been reached.
pub fn health_router<T>(service: Arc<PayPalPaymentService<T>>) -> Router
where
    T: NvpTransport + 'static,
{
    Router::new()
        .route("/health", get(health_handler::<T>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn health_handler<T>(State(service): State<Arc<PayPalPaymentService<T>>>) -> Response
where
    T: NvpTransport + 'static,
{
    let status = service.service_status();
    let code = match status {
        ServiceStatus::Up => StatusCode::OK,
        ServiceStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    let report = HealthReport {
        service: service.service_name().to_string(),
        status,
        failure_count: service.failure_count(),
    };

    (code, Json(report)).into_response()
}
