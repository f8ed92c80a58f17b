use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::{HostsConfig, PageConfig};
use crate::http::server::{AppState, StatsSnapshot};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ActiveConfig {
    pub hosts: HostsConfig,
    pub page: PageConfig,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}

/// Active host grammar and page settings. Secrets are never echoed.
pub async fn get_config(State(state): State<AppState>) -> Json<ActiveConfig> {
    let inner = state.inner.load();
    Json(ActiveConfig {
        hosts: inner.config.hosts.clone(),
        page: inner.config.page.clone(),
    })
}
