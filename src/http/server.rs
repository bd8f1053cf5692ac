//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the origin fallback
//! - Wire up middleware (request ID, tracing, timeout, edge functions)
//! - Serve on a listener until shutdown is signalled

use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::http::edge::edge_functions;
use crate::http::origin::{origin_handler, Origin};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::ShutdownListener;

/// Edge host: runs the edge functions in front of one origin.
pub struct EdgeServer {
    router: Router,
    config: EdgeConfig,
}

impl EdgeServer {
    /// Create a new server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, EdgeError> {
        let origin = Origin::new(&config.origin, &config.timeouts)?;
        let router = Self::build_router(&config, origin);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run top to bottom on the way in: the request ID exists before
    /// the trace span opens, and the timeout covers both edge functions and
    /// the origin fetch.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, origin: Origin) -> Router {
        Router::new()
            .fallback(origin_handler)
            .with_state(origin)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(middleware::from_fn(edge_functions)),
            )
    }

    /// The fully layered router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.origin.address,
            "Edge server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.wait().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Edge server stopped");
        Ok(())
    }
}
