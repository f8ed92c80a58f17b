//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the region handler
//! - Wire up middleware (tracing, request ID, timeout, limits, headers)
//! - Bind server to listener, plus the admin listener when enabled
//! - Swap in reloaded configuration without restarting
//! - Dispatch every request through the region decision

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    response::Response,
    routing::any,
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::EdgeConfig;
use crate::http::page::{self, RegionPage};
use crate::http::request::{absolute_url, normalize_referer, request_id, UuidRequestId};
use crate::http::response;
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::observability::metrics::{self, Outcome};
use crate::routing::{HostLayout, RedirectDecision};

/// Config snapshot seen by one request.
#[derive(Debug)]
pub struct EdgeState {
    pub config: EdgeConfig,
    pub layout: HostLayout,
}

impl EdgeState {
    fn new(config: EdgeConfig) -> Self {
        Self {
            layout: config.layout(),
            config,
        }
    }
}

/// Request counters reported by the admin API. Survive config reloads.
#[derive(Debug, Default)]
pub struct EdgeStats {
    requests: AtomicUsize,
    redirects: AtomicUsize,
    renders: AtomicUsize,
    rejected: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub requests: usize,
    pub redirects: usize,
    pub renders: usize,
    pub rejected: usize,
}

impl EdgeStats {
    fn record(&self, outcome: Outcome) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Outcome::Redirect => &self.redirects,
            Outcome::Render => &self.renders,
            Outcome::Rejected => &self.rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            redirects: self.redirects.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<EdgeState>>,
    pub stats: Arc<EdgeStats>,
}

impl AppState {
    pub fn new(config: EdgeConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(EdgeState::new(config))),
            stats: Arc::new(EdgeStats::default()),
        }
    }

    /// Swap in a reloaded configuration.
    ///
    /// Host layout and page settings apply to the next request. Listener,
    /// timeout and security settings are fixed at startup.
    pub fn apply(&self, config: EdgeConfig) {
        let current = self.inner.load();
        if current.config.listener.bind_address != config.listener.bind_address
            || current.config.timeouts.request_secs != config.timeouts.request_secs
        {
            tracing::warn!("Listener and timeout changes take effect after restart");
        }

        tracing::info!(
            suffix_labels = config.hosts.suffix_labels,
            regions = ?config.page.regions,
            "Configuration reloaded"
        );
        self.inner.store(Arc::new(EdgeState::new(config)));
    }

    fn record(&self, outcome: Outcome, start: Instant) {
        self.stats.record(outcome);
        metrics::record_request(outcome, start);
    }
}

/// HTTP server for the region edge.
pub struct EdgeServer {
    router: Router,
    state: AppState,
}

impl EdgeServer {
    /// Create a new server with the given configuration.
    pub fn new(config: EdgeConfig) -> Self {
        let router_config = config.clone();
        let state = AppState::new(config);
        let router = Self::build_router(&router_config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(region_handler))
            .route("/", any(region_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ));
        }

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The edge router, for serving on a custom transport or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs received on `config_updates` are swapped in as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<EdgeConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Edge server starting");

        let reload_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                reload_state.apply(config);
            }
        });

        let admin_config = self.state.inner.load().config.admin.clone();
        if admin_config.enabled {
            let admin_listener = TcpListener::bind(&admin_config.bind_address).await?;
            let admin_router = admin::setup_admin_router(self.state.clone());
            let admin_shutdown = shutdown.resubscribe();
            tracing::info!(address = %admin_listener.local_addr()?, "Admin API listening");

            tokio::spawn(async move {
                if let Err(e) = axum::serve(admin_listener, admin_router)
                    .with_graceful_shutdown(wait_for_shutdown(admin_shutdown))
                    .await
                {
                    tracing::error!(error = %e, "Admin API stopped with error");
                }
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("Edge server stopped");
        Ok(())
    }
}

/// Region handler.
/// Redirects into the referrer's region or renders the region page.
async fn region_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let snapshot = state.inner.load_full();
    let request_id = request_id(&request);

    let Some(request_url) = absolute_url(&request, &snapshot.config.hosts) else {
        tracing::warn!(request_id = %request_id, "Request without usable host");
        state.record(Outcome::Rejected, start);
        return response::bad_request("Missing or invalid Host header");
    };

    let referer = normalize_referer(request.headers().get(header::REFERER));
    let evaluation = snapshot.layout.evaluate(&request_url, referer);

    match &evaluation.decision {
        RedirectDecision::RedirectTo(target) => {
            tracing::info!(
                request_id = %request_id,
                from = %request_url,
                to = %target,
                "Redirecting into referrer region"
            );
            state.record(Outcome::Redirect, start);
            response::temporary_redirect(target)
        }
        RedirectDecision::NoRedirect => {
            tracing::debug!(
                request_id = %request_id,
                url = %request_url,
                platform = ?evaluation.request.platform(),
                region = ?evaluation.request.region(),
                "Rendering region page"
            );
            state.record(Outcome::Render, start);
            let view = RegionPage::build(
                &snapshot.layout,
                &snapshot.config.page,
                &request_url,
                referer,
                &evaluation,
            );
            page::render_page(&view)
        }
    }
}
