//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::clock_in_routes::clock_in_routes;
use super::health_routes::health_routes;
use super::item_routes::item_routes;
use super::state::AppState;
use crate::config::ServiceConfig;
use crate::store::DocumentStore;

/// HTTP server for the inventory and clock-in API
pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server whose handlers share `store`
    pub fn new(config: ServiceConfig, store: Arc<dyn DocumentStore>) -> Self {
        let state = Arc::new(AppState::new(store));
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr.as_str()).await?;

        tracing::info!(%addr, "inventory API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("inventory API stopped");
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &ServiceConfig, state: Arc<AppState>) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(health_routes(state.clone()))
        .merge(item_routes(state.clone()))
        .merge(clock_in_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
