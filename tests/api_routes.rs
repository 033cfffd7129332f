// =====================================================
// 라우터 테스트 (DB 불필요)
// =====================================================
// 인증/권한/서명 검증은 DB 접근 전에 거절되므로
// 연결하지 않는 lazy pool로 라우터 전체를 테스트할 수 있음
// =====================================================

mod common;

use adpay_api::build_app;
use adpay_api::domains::auth::models::{User, UserRole};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use common::*;
use tower::ServiceExt;

fn app() -> (Router, String, String) {
    let (state, _gateway) = lazy_state();

    let token_for = |id: u64, role: UserRole| {
        let user = User {
            id,
            email: format!("user-{}@test.local", id),
            password_hash: String::new(),
            username: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state
            .auth_state
            .jwt_service
            .generate_access_token(&user)
            .unwrap()
    };

    let user_token = token_for(1001, UserRole::User);
    let admin_token = token_for(1002, UserRole::Admin);

    (build_app(state), user_token, admin_token)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(body).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_wallet_routes_require_token() {
    let (app, _, _) = app();

    let response = app
        .oneshot(request(Method::GET, "/api/wallet/transactions", None, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_malformed_bearer_is_rejected() {
    let (app, _, _) = app();

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/wallet/transactions",
            Some("not-a-jwt"),
            Body::empty(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_regular_user() {
    let (app, user_token, _) = app();

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/admin/wallet/transactions",
            Some(&user_token),
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(
            Method::PUT,
            "/api/admin/settings/min_deposit_amount",
            Some(&user_token),
            Body::from(r#"{"value":"5"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_ipn_without_signature_is_unauthorized() {
    let (app, _, _) = app();
    let (body, _) = signed_ipn("5077125051", "finished");

    let response = app
        .oneshot(request(Method::POST, "/api/wallet/ipn", None, Body::from(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ipn_with_tampered_body_is_unauthorized() {
    let (app, _, _) = app();
    let (_, signature) = signed_ipn("5077125051", "waiting");
    // 서명은 waiting 본문 기준 → finished 본문과 맞지 않음
    let (tampered, _) = signed_ipn("5077125051", "finished");

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/wallet/ipn")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-nowpayments-sig", signature)
                .body(Body::from(tampered))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid IPN signature");
}

#[tokio::test]
async fn test_openapi_document_lists_wallet_paths() {
    let (app, _, _) = app();

    let response = app
        .oneshot(request(Method::GET, "/api-docs/openapi.json", None, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let paths = json["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/wallet/deposits"));
    assert!(paths.contains_key("/api/wallet/ipn"));
    assert!(paths.contains_key("/api/admin/wallet/transactions/{id}/approve"));
}
