//! Gateway HTTP server (single port).

use crate::config::{self, Config};
use crate::messages::{ClientMessage, MessageRelay, RelayError};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state for the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub relay: Arc<MessageRelay>,
}

/// Routes for the gateway. Exposed so callers can serve it on their own listener.
pub fn router(relay: Arc<MessageRelay>) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/api/messages", get(get_messages).post(post_messages))
        .with_state(GatewayState { relay })
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Requires the messages api url and key (config or env). Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    let settings = config::resolve_relay_settings(&config)?;
    let relay = MessageRelay::new(settings).context("creating message relay")?;
    log::info!("relaying messages to {}", relay.endpoint());

    let bind = config.gateway.bind.trim();
    if !config::is_loopback_bind(bind) {
        log::warn!(
            "gateway bound to non-loopback address {}; it has no auth of its own",
            bind
        );
    }

    let app = router(Arc::new(relay));

    let bind_addr = format!("{}:{}", bind, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };
        log::error!("relay call failed: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "endpoint": state.relay.endpoint().as_str(),
    }))
}

/// GET /api/messages: fetch and translate remote records.
async fn get_messages(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<ClientMessage>>, RelayError> {
    let messages = state.relay.fetch_messages().await?;
    Ok(Json(messages))
}

/// POST /api/messages: body is a JSON array of messages (or `null`, treated as empty).
async fn post_messages(
    State(state): State<GatewayState>,
    Json(body): Json<Option<Vec<ClientMessage>>>,
) -> Result<Json<Vec<ClientMessage>>, RelayError> {
    let messages = body.unwrap_or_default();
    let stored = state.relay.submit_messages(&messages).await?;
    Ok(Json(stored))
}
