// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Login, zone listing, and
//! health are public; transcript, rating, and roster endpoints require a
//! valid session token; the WebSocket authenticates during its handshake.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self as axum_middleware, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use parley_core::{IdentityVerifier, ParleyError, StorageAdapter};
use parley_router::RouterHandle;

use crate::auth::TokenSigner;
use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Handle for submitting commands to the router actor.
    pub router: RouterHandle,
    /// Durable session/message store.
    pub storage: Arc<dyn StorageAdapter>,
    /// Token issuance and verification.
    pub signer: Arc<TokenSigner>,
    /// Zones offered to clients.
    pub zones: Vec<String>,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Gateway server configuration.
///
/// Mirrors `ServerConfig` from `parley-config` to avoid a dependency on
/// the config crate from the gateway crate.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router over the given state.
pub fn build_router(state: GatewayState) -> Router {
    // Public routes: login issues the tokens everything else requires.
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/zones", get(handlers::get_zones))
        .route("/api/login/operator", post(handlers::login_operator))
        .route("/api/login/client", post(handlers::login_client))
        .with_state(state.clone());

    // Routes requiring a valid session token.
    let api_routes = Router::new()
        .route("/api/history/{session_id}", get(handlers::get_history))
        .route("/api/sessions/rate", post(handlers::rate_session))
        .route("/api/operators/online", get(handlers::operators_online))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    // WebSocket route (auth happens during the handshake, not middleware).
    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP/WebSocket server. Runs until the process exits.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), ParleyError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ParleyError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ParleyError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

/// Middleware validating the `Authorization: Bearer <token>` header against
/// the token signer. Fail-closed: no token, no access.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if state.signer.verify(token).is_ok() => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
