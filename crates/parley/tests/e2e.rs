// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: the full routing scenario and the HTTP surface.
//!
//! Each test creates an isolated harness with temp SQLite; HTTP tests drive
//! the axum router directly with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use http::{header, Request, StatusCode};
use tower::ServiceExt;

use parley_core::{ClientEvent, Identity, IdentityVerifier, Role, ServerEvent, StorageAdapter};
use parley_gateway::{build_router, hash_password, GatewayState, TokenSigner};
use parley_test_utils::{TestConnection, TestHarness};

fn gateway_state(harness: &TestHarness, signer: Arc<TokenSigner>) -> GatewayState {
    let storage: Arc<dyn StorageAdapter> = harness.storage.clone();
    GatewayState {
        router: harness.router.clone(),
        storage,
        signer,
        zones: vec!["SAV".to_string(), "Billing".to_string()],
        start_time: std::time::Instant::now(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---- The full routing scenario ----

/// Alice joins zone SAV, is picked, loses her operator, is requeued with the
/// same zone, is picked by a second operator under a new session, and the
/// session ends with an explicit rating.
#[tokio::test]
async fn full_client_journey() {
    let harness = TestHarness::new().await;
    let mut op_a = harness.connect_operator("anna", "Anna").await;
    let mut alice = harness.connect_client("Alice", "SAV").await;

    // Alice appears exactly once in the queue.
    let ServerEvent::QueueSnapshot { entries } = op_a
        .expect(|ev| matches!(ev, ServerEvent::QueueSnapshot { entries } if !entries.is_empty()))
        .await
    else {
        unreachable!()
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Alice");
    assert_eq!(entries[0].zone, "SAV");

    // First assignment.
    op_a.send(ClientEvent::PickClient {
        connection_id: entries[0].connection_id.clone(),
    })
    .await;
    let ServerEvent::SessionStarted {
        session_id: first_session,
        room,
        ..
    } = alice
        .expect(|ev| matches!(ev, ServerEvent::SessionStarted { .. }))
        .await
    else {
        unreachable!()
    };

    // Some conversation happens.
    alice
        .send(ClientEvent::SendMessage {
            room: room.clone(),
            session_id: first_session,
            content: "my parcel is lost".into(),
        })
        .await;
    alice
        .expect(|ev| matches!(ev, ServerEvent::Message { system: false, .. }))
        .await;
    alice.drain();

    // Operator crash: Alice is requeued with her zone, session left open.
    op_a.disconnect().await;
    let ServerEvent::Requeued { zone } = alice
        .expect(|ev| matches!(ev, ServerEvent::Requeued { .. }))
        .await
    else {
        unreachable!()
    };
    assert_eq!(zone, "SAV");
    let session = harness
        .storage
        .get_session(first_session)
        .await
        .unwrap()
        .unwrap();
    assert!(session.rating.is_none());

    // Second operator picks Alice up under a fresh session and gets the
    // prior conversation replayed.
    let mut op_b = harness.connect_operator("bert", "Bert").await;
    let ServerEvent::QueueSnapshot { entries } = op_b
        .expect(|ev| matches!(ev, ServerEvent::QueueSnapshot { entries } if !entries.is_empty()))
        .await
    else {
        unreachable!()
    };
    op_b.send(ClientEvent::PickClient {
        connection_id: entries[0].connection_id.clone(),
    })
    .await;
    let ServerEvent::SessionStarted {
        session_id: second_session,
        room,
        ..
    } = alice
        .expect(|ev| matches!(ev, ServerEvent::SessionStarted { .. }))
        .await
    else {
        unreachable!()
    };
    assert_ne!(second_session, first_session);

    let ServerEvent::HistoryRecap { messages, .. } = op_b
        .expect(|ev| matches!(ev, ServerEvent::HistoryRecap { .. }))
        .await
    else {
        unreachable!()
    };
    assert!(messages.iter().any(|m| m.content == "my parcel is lost"));

    let session = harness
        .storage
        .get_session(second_session)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.operator_login, "bert");

    // Wrap up: finish prompts for a rating, the client submits one.
    op_b.send(ClientEvent::Finish {
        session_id: second_session,
        room,
    })
    .await;
    alice
        .expect(|ev| matches!(ev, ServerEvent::RequestRating { .. }))
        .await;
    harness
        .storage
        .record_rating(second_session, 5)
        .await
        .unwrap();

    let closed = harness
        .storage
        .get_session(second_session)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(closed.rating, Some(5));
}

/// A client whose operator vanished reconnects: the open session is handed
/// back first, then the queue entry covers the orphaned room.
#[tokio::test]
async fn reconnect_resumes_open_session() {
    let harness = TestHarness::new().await;
    let mut operator = harness.connect_operator("anna", "Anna").await;
    let mut alice = harness.connect_client("Alice", "SAV").await;

    let ServerEvent::QueueSnapshot { entries } = operator
        .expect(|ev| matches!(ev, ServerEvent::QueueSnapshot { entries } if !entries.is_empty()))
        .await
    else {
        unreachable!()
    };
    operator
        .send(ClientEvent::PickClient {
            connection_id: entries[0].connection_id.clone(),
        })
        .await;
    let ServerEvent::SessionStarted { session_id, .. } = alice
        .expect(|ev| matches!(ev, ServerEvent::SessionStarted { .. }))
        .await
    else {
        unreachable!()
    };

    // Operator drops; the requeue path leaves the session open.
    operator.disconnect().await;
    alice
        .expect(|ev| matches!(ev, ServerEvent::Requeued { .. }))
        .await;

    // A second connection for the same display name resolves to the same
    // session id, not a new one.
    let mut alice_again: TestConnection = harness.connect_client("Alice", "SAV").await;
    let ServerEvent::ActiveSessionInfo {
        session_id: resumed,
        ..
    } = alice_again
        .expect(|ev| matches!(ev, ServerEvent::ActiveSessionInfo { .. }))
        .await
    else {
        unreachable!()
    };
    assert_eq!(resumed, session_id);
}

// ---- HTTP surface ----

#[tokio::test]
async fn health_endpoint_is_public() {
    let harness = TestHarness::new().await;
    let app = build_router(gateway_state(&harness, Arc::new(TokenSigner::new("s3cret"))));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn client_login_issues_verifiable_token() {
    let harness = TestHarness::new().await;
    let signer = Arc::new(TokenSigner::new("s3cret"));
    let app = build_router(gateway_state(&harness, signer.clone()));

    let response = app
        .oneshot(
            Request::post("/api/login/client")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username": "Alice"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let identity = signer.verify(json["token"].as_str().unwrap()).unwrap();
    assert_eq!(identity.role, Role::Client);
    assert_eq!(identity.display_name, "Alice");
}

#[tokio::test]
async fn operator_login_checks_password() {
    let harness = TestHarness::new().await;
    let signer = Arc::new(TokenSigner::new("s3cret"));
    let app = build_router(gateway_state(&harness, signer.clone()));

    harness
        .storage
        .create_operator(&parley_core::Operator {
            username: "anna".into(),
            display_name: Some("Anna".into()),
            password_hash: hash_password("hunter2").unwrap(),
        })
        .await
        .unwrap();

    let bad = app
        .clone()
        .oneshot(
            Request::post("/api/login/operator")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username": "anna", "password": "wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let good = app
        .oneshot(
            Request::post("/api/login/operator")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username": "anna", "password": "hunter2"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(good.status(), StatusCode::OK);

    let json = body_json(good).await;
    let identity = signer.verify(json["token"].as_str().unwrap()).unwrap();
    assert_eq!(identity.role, Role::Operator);
    assert_eq!(identity.login.as_deref(), Some("anna"));
    assert_eq!(identity.display_name, "Anna");
}

#[tokio::test]
async fn history_endpoint_requires_token() {
    let harness = TestHarness::new().await;
    let signer = Arc::new(TokenSigner::new("s3cret"));
    let app = build_router(gateway_state(&harness, signer.clone()));

    let session_id = harness
        .storage
        .create_session("Alice", "anna", "SAV", "room_x")
        .await
        .unwrap();
    harness
        .storage
        .append_message(session_id, "Alice", "hello", false)
        .await
        .unwrap();

    let uri = format!("/api/history/{session_id}");

    let anonymous = app
        .clone()
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = signer.issue(&Identity::client("Alice")).unwrap();
    let authed = app
        .oneshot(
            Request::get(uri.as_str())
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(authed.status(), StatusCode::OK);

    let json = body_json(authed).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["content"], "hello");
}

#[tokio::test]
async fn online_roster_reflects_connected_operators() {
    let harness = TestHarness::new().await;
    let signer = Arc::new(TokenSigner::new("s3cret"));
    let app = build_router(gateway_state(&harness, signer.clone()));

    for (login, name) in [("anna", "Anna"), ("bert", "Bert")] {
        harness
            .storage
            .create_operator(&parley_core::Operator {
                username: login.into(),
                display_name: Some(name.into()),
                password_hash: hash_password("pw").unwrap(),
            })
            .await
            .unwrap();
    }
    // Only Anna is actually connected.
    let _anna = harness.connect_operator("anna", "Anna").await;

    let token = signer.issue(&Identity::operator("anna", "Anna")).unwrap();
    let response = app
        .oneshot(
            Request::get("/api/operators/online")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let roster = json.as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["login"], "anna");
    assert_eq!(roster[0]["name"], "Anna");
}

#[tokio::test]
async fn rate_endpoint_validates_and_records() {
    let harness = TestHarness::new().await;
    let signer = Arc::new(TokenSigner::new("s3cret"));
    let app = build_router(gateway_state(&harness, signer.clone()));

    let session_id = harness
        .storage
        .create_session("Alice", "anna", "SAV", "room_x")
        .await
        .unwrap();
    let token = signer.issue(&Identity::client("Alice")).unwrap();

    let out_of_range = app
        .clone()
        .oneshot(
            Request::post("/api/sessions/rate")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(format!(
                    r#"{{"session_id": {session_id}, "rating": 9}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let accepted = app
        .oneshot(
            Request::post("/api/sessions/rate")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(format!(
                    r#"{{"session_id": {session_id}, "rating": 4}}"#
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::NO_CONTENT);

    let session = harness
        .storage
        .get_session(session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.rating, Some(4));
}
