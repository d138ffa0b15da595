// src/main.rs

use std::path::Path;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{Pool, Postgres};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

mod classify;
mod config;
mod db;
mod error;
mod models;
mod normalize;
mod routes;
mod telemetry;

use classify::GeoClassifier;
use config::{AppConfig, AppEnvironment};

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub geo: GeoClassifier,
    pub environment: AppEnvironment,
}

fn build_router(state: AppState, static_dir: &Path) -> Router {
    // Dashboard and bot web view are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // health
        .route("/health", get(routes::health::health))
        // dashboard aggregates
        .route("/api/kpis", get(routes::kpis::get_kpis))
        .route("/api/grupos", get(routes::grupos::list_grupos))
        .route("/api/mapa", get(routes::mapa::get_mapa))
        .route("/api/sucursales-ranking", get(routes::ranking::sucursales_ranking))
        .route("/api/sucursal-detail", get(routes::sucursal_detail::sucursal_detail))
        .route("/api/historico", get(routes::historico::get_historico))
        // states & territory
        .route("/api/estados", get(routes::estados::list_estados))
        .route("/api/territorial", get(routes::territorial::get_territorial))
        .route("/api/normalize-estados", post(routes::estados::normalize_estados))
        .route(
            "/api/normalize-estados/preview",
            get(routes::estados::preview_normalize),
        )
        // front end
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    telemetry::init(&config.telemetry).context("initializing logging")?;

    let pool = db::connect(&config.database)
        .await
        .context("connecting to PostgreSQL")?;
    let state = AppState {
        pool,
        geo: GeoClassifier::default(),
        environment: config.environment,
    };
    let app = build_router(state, &config.server.static_dir);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, environment = config.environment.as_str(), "API listening");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@127.0.0.1:1/unused")
            .expect("lazy pool");
        let state = AppState {
            pool,
            geo: GeoClassifier::default(),
            environment: AppEnvironment::Test,
        };
        build_router(state, Path::new("does-not-exist"))
    }

    #[tokio::test]
    async fn sucursal_detail_requires_a_name() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/sucursal-detail?grupo=TEPEYAC")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_paths_fall_through_to_static_files() {
        let response = test_router()
            .oneshot(Request::builder().uri("/nope.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn historico_is_read_only() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/historico")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn normalize_is_post_only() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/normalize-estados")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
