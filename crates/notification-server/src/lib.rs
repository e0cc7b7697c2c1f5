//! Notification Server
//!
//! Webhook receiver for Fawry payment callbacks. Notifications are verified
//! against the merchant's security key before they are broadcast to
//! subscribers; unauthenticated ones are rejected and never forwarded.
//!
//! # Example
//!
//! ```ignore
//! use notification_server::{NotificationServer, ServerConfig};
//!
//! let server = NotificationServer::new(ServerConfig::from_env()?);
//! let mut events = server.subscribe();
//! tokio::spawn(server.run());
//! while let Ok(event) = events.recv().await { /* mark order paid */ }
//! ```

pub mod error;
pub mod events;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use events::{NotificationSource, PaymentEvent};
pub use routes::create_router;
pub use state::AppState;

use anyhow::Context;
use axum::http::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the payment event channel.
    pub channel_capacity: usize,
    /// Merchant security key used to verify notifications.
    pub security_key: String,
}

impl ServerConfig {
    pub fn new(security_key: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            channel_capacity: 256,
            security_key: security_key.into(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let security_key = std::env::var("FAWRY_SECURITY_KEY")
            .context("FAWRY_SECURITY_KEY environment variable not set")?;

        Ok(Self {
            host: std::env::var("NOTIFY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // PORT first (platform-assigned), then NOTIFY_PORT
            port: std::env::var("PORT")
                .or_else(|_| std::env::var("NOTIFY_PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            channel_capacity: std::env::var("NOTIFY_CHANNEL_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(256),
            security_key,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("channel_capacity", &self.channel_capacity)
            .field("security_key", &"[REDACTED]")
            .finish()
    }
}

/// The webhook server.
pub struct NotificationServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl NotificationServer {
    pub fn new(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(&config.security_key, config.channel_capacity));
        Self { config, state }
    }

    /// Receive authenticated payment events. Subscribe before calling `run`.
    pub fn subscribe(&self) -> broadcast::Receiver<PaymentEvent> {
        self.state.subscribe()
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Run the server.
    pub async fn run(self) -> anyhow::Result<()> {
        let router = create_router(self.state.clone()).layer(
            TraceLayer::new_for_http()
                .on_request(|request: &Request<_>, _span: &tracing::Span| {
                    tracing::info!(
                        method = %request.method(),
                        uri = %request.uri().path(),
                        "Incoming request"
                    );
                })
                .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = latency.as_millis(),
                            "Request failed"
                        );
                    },
                ),
        );

        let addr = self.config.socket_addr()?;
        info!(address = %addr, "Starting notification server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
