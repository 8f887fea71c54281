//! Auxiliary HTTP server: a liveness endpoint for uptime monitors and a static mount

use std::net::SocketAddr;
use std::path::Path;

use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use crate::application::errors::BotError;
use crate::infrastructure::config::HttpConfig;

/// Build the router
pub fn router(static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/uptime", get(uptime_handler))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
}

/// Always 200 with an empty body
async fn uptime_handler() -> StatusCode {
    StatusCode::OK
}

pub struct HttpServer {
    listener: TcpListener,
    router: Router,
}

impl HttpServer {
    /// Bind the listener described by `config`
    pub async fn bind(config: &HttpConfig) -> Result<Self, BotError> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| BotError::Http(format!("Invalid address {}:{}: {}", config.host, config.port, e)))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| BotError::Http(format!("Failed to bind {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            router: router(&config.static_dir),
        })
    }

    /// Serve until the listener fails
    pub async fn serve(self) -> Result<(), BotError> {
        if let Ok(addr) = self.listener.local_addr() {
            info!("Server listening on port {}", addr.port());
        }

        axum::serve(self.listener, self.router)
            .await
            .map_err(|e| BotError::Http(format!("Server error: {}", e)))
    }
}
