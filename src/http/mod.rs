// HTTP entrypoint: request parsing and response formatting around the registration workflow.

pub mod handlers;
pub mod presenters;

use crate::config::AppConfig;
use crate::core::registration::DeliveryRegistration;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<DeliveryRegistration>,
    pub default_status: String,
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(registration: DeliveryRegistration, config: &AppConfig) -> Self {
        Self {
            registration: Arc::new(registration),
            default_status: config.registration.default_status.clone(),
            request_timeout: config.request_timeout(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/entregador", post(handlers::create_delivery))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, bind_address: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
