// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Login endpoints issue the session tokens; transcript, rating, zone, and
//! roster endpoints back the client and operator UIs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use parley_core::{Identity, MessageView, ParleyError};

use crate::auth;
use crate::server::GatewayState;

/// Request body for POST /api/login/operator.
#[derive(Debug, Deserialize)]
pub struct OperatorLoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for POST /api/login/client.
#[derive(Debug, Deserialize)]
pub struct ClientLoginRequest {
    pub username: String,
}

/// Response body for both login endpoints.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Request body for POST /api/sessions/rate.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub session_id: i64,
    pub rating: i64,
}

/// One entry of GET /api/operators/online.
#[derive(Debug, Serialize)]
pub struct OnlineOperator {
    pub login: String,
    pub name: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// POST /api/login/operator
///
/// Verifies the password against the operator account and issues a signed
/// operator token.
pub async fn login_operator(
    State(state): State<GatewayState>,
    Json(body): Json<OperatorLoginRequest>,
) -> Response {
    let operator = match state.storage.find_operator(&body.username).await {
        Ok(Some(op)) => op,
        Ok(None) => return error_response(StatusCode::UNAUTHORIZED, "invalid credentials"),
        Err(e) => {
            warn!(error = %e, "operator lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "server error");
        }
    };

    if !auth::verify_password(&operator.password_hash, &body.password) {
        return error_response(StatusCode::UNAUTHORIZED, "invalid credentials");
    }

    let display = operator.name().to_string();
    let identity = Identity::operator(operator.username, display);
    match state.signer.issue(&identity) {
        Ok(token) => (StatusCode::OK, Json(LoginResponse { token })).into_response(),
        Err(e) => {
            warn!(error = %e, "token issuance failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "server error")
        }
    }
}

/// POST /api/login/client
///
/// Clients are anonymous: any non-empty display name gets a client token.
pub async fn login_client(
    State(state): State<GatewayState>,
    Json(body): Json<ClientLoginRequest>,
) -> Response {
    let name = body.username.trim();
    if name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "a display name is required");
    }

    match state.signer.issue(&Identity::client(name)) {
        Ok(token) => (StatusCode::OK, Json(LoginResponse { token })).into_response(),
        Err(e) => {
            warn!(error = %e, "token issuance failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "server error")
        }
    }
}

/// GET /api/zones
pub async fn get_zones(State(state): State<GatewayState>) -> Json<Vec<String>> {
    Json(state.zones.clone())
}

/// GET /api/history/{session_id}
///
/// Full transcript in chronological order, for the reconnecting client UI.
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(session_id): Path<i64>,
) -> Response {
    match state.storage.list_messages(session_id).await {
        Ok(messages) => {
            let views: Vec<MessageView> = messages
                .into_iter()
                .map(|m| MessageView {
                    sender: m.sender_name,
                    content: m.content,
                    is_operator: m.is_operator,
                    read_at: m.read_at,
                    created_at: m.created_at,
                })
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(e) => {
            warn!(error = %e, session_id, "history load failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "history unavailable")
        }
    }
}

/// POST /api/sessions/rate
///
/// Records the client's explicit score, overwriting any abandonment
/// placeholder.
pub async fn rate_session(
    State(state): State<GatewayState>,
    Json(body): Json<RateRequest>,
) -> Response {
    if !(1..=5).contains(&body.rating) {
        return error_response(StatusCode::BAD_REQUEST, "rating must be between 1 and 5");
    }
    match state.storage.record_rating(body.session_id, body.rating).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(ParleyError::NotFound(_)) => error_response(StatusCode::NOT_FOUND, "session not found"),
        Err(e) => {
            warn!(error = %e, session_id = body.session_id, "rating not recorded");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "rating not recorded")
        }
    }
}

/// GET /api/operators/online
///
/// The transfer UI's target picker: operator accounts currently connected.
pub async fn operators_online(State(state): State<GatewayState>) -> Response {
    let online = state.router.online_operators().await;
    let accounts = match state.storage.list_operators().await {
        Ok(accounts) => accounts,
        Err(e) => {
            warn!(error = %e, "operator roster load failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "roster unavailable");
        }
    };

    let roster: Vec<OnlineOperator> = accounts
        .into_iter()
        .filter(|op| online.contains(&op.username))
        .map(|op| OnlineOperator {
            name: op.name().to_string(),
            login: op.username,
        })
        .collect();
    (StatusCode::OK, Json(roster)).into_response()
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_login_request_deserializes() {
        let json = r#"{"username": "bob", "password": "hunter2"}"#;
        let req: OperatorLoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.username, "bob");
        assert_eq!(req.password, "hunter2");
    }

    #[test]
    fn rate_request_deserializes() {
        let json = r#"{"session_id": 12, "rating": 4}"#;
        let req: RateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.session_id, 12);
        assert_eq!(req.rating, 4);
    }

    #[test]
    fn login_response_serializes() {
        let resp = LoginResponse {
            token: "abc.def".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"token\":\"abc.def\""));
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }
}
