// src/routes/health.rs

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{db, AppState};

#[derive(Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResp>) {
    let (code, status, database) = match db::ping(&state.pool).await {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
        }
    };

    (
        code,
        Json(HealthResp {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
            environment: state.environment.as_str(),
        }),
    )
}
