//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay and health handlers
//! - Wire up middleware (tracing, request ID, body limit, concurrency cap)
//! - Serve plain HTTP or TLS until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::health::healthz;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::shutdown::wait as wait_for_shutdown;
use crate::net::tls::load_tls_config;
use crate::relay::target::sub_path;
use crate::relay::Relay;

/// Time in-flight TLS connections get to finish after shutdown.
const TLS_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build backend client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub mount_prefix: Arc<str>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let relay = Arc::new(Relay::from_config(&config)?);

        tracing::info!(
            origin = %relay.origin(),
            mount_prefix = %config.relay.mount_prefix,
            on_body_error = config.relay.on_body_error.as_str(),
            "Relay configured"
        );

        let state = AppState {
            relay,
            mount_prefix: Arc::from(config.relay.mount_prefix.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let relay_route = format!("{}/{{*path}}", config.relay.mount_prefix);

        Router::new()
            .route(
                &relay_route,
                get(relay_handler)
                    .post(relay_handler)
                    .put(relay_handler)
                    .delete(relay_handler)
                    .patch(relay_handler),
            )
            .route("/healthz", get(healthz))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.relay.max_body_size))
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_concurrent_requests,
            ))
            .layer(propagate_request_id_layer())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()),
                    )
                }),
            )
            .layer(set_request_id_layer())
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;

        match &self.config.listener.tls {
            Some(tls) => {
                let rustls = load_tls_config(tls).await?;
                tracing::info!(address = %addr, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let signal = handle.clone();
                tokio::spawn(async move {
                    wait_for_shutdown(shutdown).await;
                    signal.graceful_shutdown(Some(TLS_GRACE_PERIOD));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(wait_for_shutdown(shutdown))
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay everything under the mount prefix to the backend.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let Some(path) = sub_path(request.uri().path(), &state.mount_prefix) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let path = path.to_string();
    state.relay.forward(request, &path).await
}
