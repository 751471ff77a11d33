//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
}

#[cfg(feature = "postgres")]
async fn storage_status(state: &AppState) -> &'static str {
    match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => "postgres",
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                "unavailable"
            }
        },
        None => "memory",
    }
}

#[cfg(not(feature = "postgres"))]
async fn storage_status(_state: &AppState) -> &'static str {
    "memory"
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let storage = storage_status(&state).await;
    let response = HealthResponse {
        status: if storage == "unavailable" { "degraded" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        storage,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if storage == "unavailable" {
        HttpResponse::ServiceUnavailable().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}
