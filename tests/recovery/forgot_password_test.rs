use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::atomic::Ordering;
use twiller_api::modules::users::SubscriptionTier;

use crate::common::{test_email, TestContext};

const PHONE: &str = "+14155550123";

fn seed_with_last_reset(ctx: &TestContext, email: &str, ago: Duration) {
    let mut user = ctx.seed_user(email, SubscriptionTier::Free, Some(PHONE));
    user.last_password_reset = Some(Utc::now() - ago);
    ctx.users.insert(user);
}

#[tokio::test]
async fn generate_returns_fresh_alphanumeric_password() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);

    let response = ctx
        .server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "generate" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let password = body["password"].as_str().unwrap().to_string();
    assert_eq!(password.len(), 10);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["message"], format!("New password: {}", password));

    assert_eq!(ctx.identity.password_of(&email), Some(password));
    assert!(ctx.users.get(&email).unwrap().last_password_reset.is_some());
}

#[tokio::test]
async fn email_method_mails_reset_link() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);

    let response = ctx
        .server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "email" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], format!("Reset link sent to {}", email));
    assert!(body.get("password").is_none());

    let mail = ctx.mailer.last().unwrap();
    assert_eq!(mail.to, email);
    assert!(mail.body.contains("https://identity.test/reset"));
    assert!(ctx.users.get(&email).unwrap().last_password_reset.is_some());
}

#[tokio::test]
async fn phone_number_identifies_the_user() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, Some(PHONE));

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": PHONE, "method": "generate" }))
        .await
        .assert_status_ok();

    assert!(ctx.identity.password_of(&email).is_some());
}

#[tokio::test]
async fn second_reset_within_a_day_is_refused() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "email" }))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "email" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "conflict");
    assert_eq!(ctx.mailer.sent().len(), 1);
}

#[tokio::test]
async fn reset_allowed_once_cooldown_has_passed() {
    let ctx = TestContext::new();
    let email = test_email();
    seed_with_last_reset(&ctx, &email, Duration::hours(24) + Duration::minutes(1));

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "generate" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn reset_refused_just_before_cooldown_ends() {
    let ctx = TestContext::new();
    let email = test_email();
    seed_with_last_reset(&ctx, &email, Duration::hours(23) + Duration::minutes(59));

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "generate" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    assert!(ctx.identity.password_of(&email).is_none());
}

#[tokio::test]
async fn cooldown_is_checked_before_method() {
    let ctx = TestContext::new();
    let email = test_email();
    seed_with_last_reset(&ctx, &email, Duration::hours(1));

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "carrier-pigeon" }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_method_is_rejected_without_stamping() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);

    let response = ctx
        .server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "sms" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "validation");
    assert!(ctx.users.get(&email).unwrap().last_password_reset.is_none());
}

#[tokio::test]
async fn unknown_identifier_is_not_found() {
    let ctx = TestContext::new();

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": test_email(), "method": "email" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_identifier_is_rejected() {
    let ctx = TestContext::new();

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "method": "email" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identity_failure_leaves_user_free_to_retry() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);
    ctx.identity.fail.store(true, Ordering::SeqCst);

    let response = ctx
        .server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "generate" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert!(ctx.users.get(&email).unwrap().last_password_reset.is_none());

    ctx.identity.fail.store(false, Ordering::SeqCst);

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "generate" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn undelivered_reset_email_is_not_stamped() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);
    ctx.mailer.fail.store(true, Ordering::SeqCst);

    ctx.server
        .post("/forgot-password")
        .json(&json!({ "identifier": email, "method": "email" }))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);

    assert!(ctx.users.get(&email).unwrap().last_password_reset.is_none());
}
