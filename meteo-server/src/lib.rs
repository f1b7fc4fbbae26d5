use std::future::IntoFuture;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::app::create_app;
use crate::configs::Settings;
use crate::services::{Connector, DashboardService, MqttConnector};

pub mod app;
pub mod configs;
pub mod errors;
pub mod handles;
pub mod services;

pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<()> {
    let connector: Arc<dyn Connector> = Arc::new(MqttConnector::new(settings.gateway.clone()));
    let (service, dashboard) = DashboardService::new(&settings.dashboard, connector);
    let task = service.spawn();

    if settings.gateway.auto_connect {
        match dashboard.connect().await {
            Ok(status) => tracing::info!("Connected to {}", status.broker),
            Err(e) => tracing::warn!("Starting disconnected: {}", e),
        }
    }

    let app = create_app(settings, dashboard.clone());

    let ip_addr = settings
        .server
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("Invalid server host {}", settings.server.host))?;

    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!("listening on {:?}", address);

    // Open event streams never finish, so the server is dropped rather than drained.
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result.context("Server error")?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    if let Err(e) = dashboard.shutdown().await {
        tracing::warn!("Dashboard already stopped: {}", e);
    }

    task.await.context("Dashboard task panicked")?;

    Ok(())
}
