use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, models::dto::response::HealthResponse};

/// Pings the backing store; 200 with platform metadata when reachable, 503
/// otherwise.
#[get("/api/health")]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.db.health_check().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::healthy()),
        Err(err) => {
            log::error!("Health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(HealthResponse::unhealthy(err.to_string()))
        }
    }
}
