use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;
use twiller_api::modules::users::SubscriptionTier;

use crate::common::{test_email, TestContext};

#[tokio::test]
async fn logged_in_user_returns_profile() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Silver, None);

    let response = ctx.server.get("/loggedinuser").add_query_param("email", &email).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], email);
    assert_eq!(body["subscription"], "silver");
}

#[tokio::test]
async fn logged_in_user_requires_email() {
    let ctx = TestContext::new();

    ctx.server.get("/loggedinuser").await.assert_status(StatusCode::BAD_REQUEST);
    ctx.server
        .get("/loggedinuser")
        .add_query_param("email", test_email())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_users_returns_everyone() {
    let ctx = TestContext::new();
    ctx.seed_user(&test_email(), SubscriptionTier::Free, None);
    ctx.seed_user(&test_email(), SubscriptionTier::Gold, None);

    let body: Vec<serde_json::Value> = ctx.server.get("/user").await.json();
    assert_eq!(body.len(), 2);
}

#[tokio::test]
async fn update_user_changes_only_given_fields() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, Some("+15550001111"));

    let response = ctx
        .server
        .patch(&format!("/userupdate/{}", email))
        .json(&json!({ "bio": "hello there", "name": "Sam" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["bio"], "hello there");
    assert_eq!(body["name"], "Sam");
    assert_eq!(body["phone"], "+15550001111");
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let ctx = TestContext::new();

    ctx.server
        .patch(&format!("/userupdate/{}", test_email()))
        .json(&json!({ "bio": "ghost" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_to_taken_username_conflicts() {
    let ctx = TestContext::new();
    let owner = test_email();
    let other = test_email();
    let mut user = ctx.seed_user(&owner, SubscriptionTier::Free, None);
    user.username = Some("taken_name".to_string());
    ctx.users.insert(user);
    ctx.seed_user(&other, SubscriptionTier::Free, None);

    ctx.server
        .patch(&format!("/userupdate/{}", other))
        .json(&json!({ "username": "taken_name" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    // Re-submitting your own username is fine.
    ctx.server
        .patch(&format!("/userupdate/{}", owner))
        .json(&json!({ "username": "taken_name" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn update_maps_duplicate_username_write_to_conflict() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.seed_user(&email, SubscriptionTier::Free, None);
    ctx.users.duplicate_on_update.store(true, Ordering::SeqCst);

    let response = ctx
        .server
        .patch(&format!("/userupdate/{}", email))
        .json(&json!({ "username": "raced_name" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "Username already taken");
    assert_eq!(ctx.users.get(&email).unwrap().username, None);
}
