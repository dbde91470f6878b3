//! # HTTP Server
//!
//! Main HTTP server combining the item routes with the root-level
//! banner and health endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::store::DocumentStore;

use super::config::HttpServerConfig;
use super::item_routes::{item_routes, ItemState};

/// HTTP server for the item CRUD API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self::with_config(store, HttpServerConfig::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(store: Arc<DocumentStore>, config: HttpServerConfig) -> Self {
        let router = Self::build_router(store, &config);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(store: Arc<DocumentStore>, config: &HttpServerConfig) -> Router {
        let item_state = Arc::new(ItemState::new(store));

        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            // If no origins configured, use permissive for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
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
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            // Item routes under /api
            .nest("/api", item_routes(item_state))
            .layer(cors)
            // Per-request logging
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and run until ctrl-c.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        info!(%addr, "starting itemstore HTTP server");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "JSON Database CRUD API" }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
