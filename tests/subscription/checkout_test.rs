use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;
use twiller_api::modules::users::SubscriptionTier;
use twiller_api::services::payment::payment_signature;

use crate::common::{test_email, TestContext, PAYMENT_SECRET};

#[tokio::test]
async fn create_subscription_opens_order_for_plan_price() {
    let ctx = TestContext::new();
    let email = test_email();

    let response = ctx
        .server
        .post("/create-subscription")
        .authorization_bearer(&ctx.token_for(&email))
        .json(&json!({ "plan": "gold" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["order_id"], "order_test_1");
    assert_eq!(body["amount"], 100_000);
    assert_eq!(body["currency"], "INR");
    assert_eq!(body["plan"], "gold");

    let orders = ctx.payments.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].1, "INR");
    assert!(orders[0].2.starts_with("receipt_"));
}

#[tokio::test]
async fn each_paid_plan_has_its_price() {
    let ctx = TestContext::new();
    let token = ctx.token_for(&test_email());

    for (plan, amount) in [("bronze", 10_000), ("silver", 30_000), ("gold", 100_000)] {
        let body: serde_json::Value = ctx
            .server
            .post("/create-subscription")
            .authorization_bearer(&token)
            .json(&json!({ "plan": plan }))
            .await
            .json();
        assert_eq!(body["amount"], amount, "plan {}", plan);
    }
}

#[tokio::test]
async fn free_or_unknown_plan_is_rejected() {
    let ctx = TestContext::new();
    let token = ctx.token_for(&test_email());

    for plan in [json!("free"), json!("platinum"), json!(null)] {
        ctx.server
            .post("/create-subscription")
            .authorization_bearer(&token)
            .json(&json!({ "plan": plan }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
    assert!(ctx.payments.orders().is_empty());
}

#[tokio::test]
async fn create_subscription_requires_bearer_token() {
    let ctx = TestContext::new();

    ctx.server
        .post("/create-subscription")
        .json(&json!({ "plan": "gold" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn gateway_failure_is_upstream_error() {
    let ctx = TestContext::new();
    ctx.payments.fail.store(true, Ordering::SeqCst);

    let response = ctx
        .server
        .post("/create-subscription")
        .authorization_bearer(&ctx.token_for(&test_email()))
        .json(&json!({ "plan": "silver" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "upstream_failure");
}

#[tokio::test]
async fn signed_payment_upgrades_user_and_sends_invoice() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);

    let response = ctx
        .server
        .post("/payment-success")
        .json(&json!({
            "email": email,
            "plan": "gold",
            "order_id": "order_abc",
            "payment_id": "pay_xyz",
            "signature": payment_signature(PAYMENT_SECRET, "order_abc", "pay_xyz"),
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["plan"], "gold");

    let user = ctx.users.get(&email).unwrap();
    assert_eq!(user.subscription, SubscriptionTier::Gold);
    assert_eq!(user.payment_id.as_deref(), Some("pay_xyz"));
    assert!(user.subscribed_at.is_some());

    let invoice = ctx.mailer.last().unwrap();
    assert_eq!(invoice.to, email);
    assert!(invoice.body.contains("pay_xyz"));

    let limit: serde_json::Value = ctx
        .server
        .get("/tweet-limit")
        .authorization_bearer(&ctx.token_for(&email))
        .await
        .json();
    assert_eq!(limit["limit"], "unlimited");
}

#[tokio::test]
async fn bad_signature_leaves_tier_unchanged() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);

    let response = ctx
        .server
        .post("/payment-success")
        .json(&json!({
            "email": email,
            "plan": "gold",
            "order_id": "order_abc",
            "payment_id": "pay_xyz",
            "signature": payment_signature("wrong-secret", "order_abc", "pay_xyz"),
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.users.get(&email).unwrap().subscription, SubscriptionTier::Free);
    assert!(ctx.mailer.sent().is_empty());
}

#[tokio::test]
async fn payment_for_unknown_user_is_not_found() {
    let ctx = TestContext::new();

    ctx.server
        .post("/payment-success")
        .json(&json!({
            "email": test_email(),
            "plan": "bronze",
            "order_id": "order_1",
            "payment_id": "pay_1",
            "signature": payment_signature(PAYMENT_SECRET, "order_1", "pay_1"),
        }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_failure_does_not_undo_upgrade() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);
    ctx.mailer.fail.store(true, Ordering::SeqCst);

    ctx.server
        .post("/payment-success")
        .json(&json!({
            "email": email,
            "plan": "silver",
            "order_id": "order_2",
            "payment_id": "pay_2",
            "signature": payment_signature(PAYMENT_SECRET, "order_2", "pay_2"),
        }))
        .await
        .assert_status_ok();

    assert_eq!(ctx.users.get(&email).unwrap().subscription, SubscriptionTier::Silver);
}
