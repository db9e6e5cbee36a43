use axum::http::StatusCode;
use serde_json::json;
use twiller_api::modules::users::SubscriptionTier;

use crate::common::{test_email, TestContext};

#[tokio::test]
async fn health_reports_ok_and_version() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn root_names_the_service() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/").await;
    response.assert_status_ok();
    response.assert_text("Twiller API");
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;

    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("cache-control"), "no-store");
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/register")
        .json(&json!({ "email": test_email(), "name": "x".repeat(200 * 1024) }))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn metrics_use_route_templates() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);

    ctx.server
        .patch(&format!("/userupdate/{}", email))
        .json(&json!({ "bio": "x" }))
        .await
        .assert_status_ok();

    let response = ctx.server.get("/metrics").await;
    response.assert_status_ok();
    let text = response.text();

    assert!(text.contains("twiller_http_requests_total"));
    assert!(text.contains(r#"route="/userupdate/{email}""#));
    assert!(!text.contains(&email));
}

#[tokio::test]
async fn metrics_count_policy_decisions() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);
    let token = ctx.token_for(&email);

    for _ in 0..2 {
        ctx.server
            .post("/post")
            .authorization_bearer(&token)
            .json(&json!({ "post": "hi" }))
            .await;
    }

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "bogus" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let text = ctx.server.get("/metrics").await.text();

    assert!(text.contains(r#"twiller_quota_decisions_total{outcome="allowed",tier="free"} 1"#));
    assert!(text.contains(r#"twiller_quota_decisions_total{outcome="limit_exceeded",tier="free"} 1"#));
    assert!(text.contains(r#"twiller_password_resets_total{method="invalid",outcome="invalid_method"} 1"#));
}
