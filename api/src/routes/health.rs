use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use cc_core::repositories::{AccountRepository, VerificationRecordStore};
use cc_shared::types::{HealthResponse, HealthStatus, ServiceHealth};

use crate::app::AppState;

/// Handler for GET /health
///
/// Probes the verification record store. Returns 200 when healthy and 503
/// otherwise, with the per-service breakdown in both cases.
pub async fn health_check<S, A>(state: web::Data<AppState<S, A>>) -> HttpResponse
where
    S: VerificationRecordStore + 'static,
    A: AccountRepository + 'static,
{
    let store = match state.run(state.records.health_check()).await {
        Ok(()) => ServiceHealth {
            status: HealthStatus::Healthy,
            message: None,
        },
        Err(e) => ServiceHealth {
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
        },
    };

    let mut services = HashMap::new();
    services.insert("verification_store".to_string(), store);

    let health = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));
    if health.status == HealthStatus::Unhealthy {
        HttpResponse::ServiceUnavailable().json(health)
    } else {
        HttpResponse::Ok().json(health)
    }
}
