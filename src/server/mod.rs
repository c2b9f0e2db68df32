use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{Extension, Router, http::HeaderValue};
use once_cell::sync::Lazy;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;

pub mod api;
pub mod dtos;
pub mod error;
pub mod services;
pub mod utils;

use api::epg_controller::EpgController;
use api::health_controller::HealthController;
use api::playlist_controller::PlaylistController;
use api::xtream_controller::XtreamController;
use services::app_services::AppServices;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}

pub struct ApplicationServer;

impl ApplicationServer {
    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        // touch the start marker so uptime counts from boot, not first request
        Lazy::force(&START_TIME);

        let address = format!("0.0.0.0:{}", config.port);
        let services = AppServices::new(config.clone());
        let cors = Self::build_cors_layer(&config)?;

        let app = Router::new()
            .merge(HealthController::app())
            .merge(PlaylistController::app())
            .merge(EpgController::app())
            .merge(XtreamController::app())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(Extension(services));

        info!("routes initialized, listening on {}", address);

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .context("Failed to bind to address")?;

        axum::serve(listener, app)
            .await
            .context("Failed to serve application")?;

        Ok(())
    }

    fn build_cors_layer(config: &AppConfig) -> anyhow::Result<CorsLayer> {
        let origin = config.resolved_client_url();
        info!("cors origin: {}", origin);

        let layer = if origin == "*" {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origin = origin
                .parse::<HeaderValue>()
                .context("invalid cors origin")?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Ok(layer)
    }
}
