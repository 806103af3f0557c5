use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::authenticator::Authenticator;
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::provider::keycloak::KeycloakProvider;
use crate::server::api;

pub type Gateway = Authenticator<KeycloakProvider>;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(metrics: &Metrics, gateway: Arc<Gateway>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            gateway,
        }
    }
}

/// Protected API, optional metrics endpoint and request logging.
pub fn router(settings_config: &SettingsConfig, state: AppState) -> Router {
    Router::new()
        .merge(api::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .layer(middleware::from_fn(api::log_requests))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn start(settings_config: &SettingsConfig, gateway: Arc<Gateway>) -> Result<()> {
    let metrics = get_metrics().await;
    let app = router(settings_config, AppState::new(metrics, gateway));

    let bind_addr = settings_config.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("App listening at http://{}", listener.local_addr()?);

    serve(listener, app, shutdown_signal()).await
}

pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let metrics = get_metrics().await;
    metrics.up.set(1);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server failed");
    metrics.up.set(0);
    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => tracing::error!("failed to listen for shutdown signal: {}", e),
    }
}
