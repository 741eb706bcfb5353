//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: gatekeeper in front of the upstream forwarder
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve with connect info so the gatekeeper sees peer addresses
//! - Shut down gracefully on signal

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatekeeperConfig;
use crate::error::ServerError;
use crate::gatekeeper::{protect, Gatekeeper};
use crate::http::request::UuidRequestId;
use crate::http::upstream::{forward_handler, Upstream};

/// HTTP server running the gatekeeper in front of the upstream.
pub struct HttpServer {
    router: Router,
    config: GatekeeperConfig,
    gatekeeper: Arc<Gatekeeper>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatekeeperConfig) -> Result<Self, ServerError> {
        let gatekeeper = Arc::new(Gatekeeper::new(&config));
        Self::with_gatekeeper(config, gatekeeper)
    }

    /// Create a server around an existing gatekeeper.
    pub fn with_gatekeeper(
        config: GatekeeperConfig,
        gatekeeper: Arc<Gatekeeper>,
    ) -> Result<Self, ServerError> {
        let upstream = Arc::new(Upstream::new(&config.upstream.address)?);
        let router = Self::build_router(&config, gatekeeper.clone(), upstream);

        Ok(Self {
            router,
            config,
            gatekeeper,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &GatekeeperConfig,
        gatekeeper: Arc<Gatekeeper>,
        upstream: Arc<Upstream>,
    ) -> Router {
        let app = Router::new().fallback(forward_handler).with_state(upstream);

        protect(app, gatekeeper).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.listener.request_timeout_secs,
                ))),
        )
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            production = self.config.is_production(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(
            ledger_entries = self.gatekeeper.limiter().len(),
            "HTTP server stopped"
        );
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatekeeperConfig {
        &self.config
    }

    pub fn gatekeeper(&self) -> &Arc<Gatekeeper> {
        &self.gatekeeper
    }
}
