use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;
use std::sync::atomic::Ordering;
use twiller_api::modules::verification::Purpose;

use crate::common::{extract_code, test_email, TestContext};

async fn send_code(ctx: &TestContext, email: &str) -> String {
    let response = ctx
        .server
        .post("/send-audio-otp")
        .json(&json!({ "email": email, "idToken": ctx.token_for(email) }))
        .await;

    response.assert_status_ok();
    extract_code(&ctx.mailer.last().expect("no email sent").body)
}

#[tokio::test]
async fn send_audio_otp_emails_a_six_digit_code() {
    let ctx = TestContext::new();
    let email = test_email();

    let response = ctx
        .server
        .post("/send-audio-otp")
        .json(&json!({ "email": email, "idToken": ctx.token_for(&email) }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["channel"], "email");
    assert_eq!(body["expires_in"], 300);

    let mail = ctx.mailer.last().unwrap();
    assert_eq!(mail.to, email);
    assert_eq!(mail.subject, "Your OTP for Audio Upload");

    let record = ctx.verifications.get(&email, Purpose::AudioUpload).unwrap();
    assert_eq!(record.code.len(), 6);
    assert_eq!(extract_code(&mail.body), record.code);
}

#[tokio::test]
async fn send_audio_otp_reads_camel_case_id_token() {
    let ctx = TestContext::new();
    let email = test_email();

    let response = ctx
        .server
        .post("/send-audio-otp")
        .json(&json!({ "email": email, "idToken": ctx.token_for(&email) }))
        .await;

    response.assert_status_ok();
    assert!(ctx.verifications.get(&email, Purpose::AudioUpload).is_some());
}

#[tokio::test]
async fn send_audio_otp_still_reads_snake_case_id_token() {
    let ctx = TestContext::new();
    let email = test_email();

    ctx.server
        .post("/send-audio-otp")
        .json(&json!({ "email": email, "id_token": ctx.token_for(&email) }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn send_audio_otp_rejects_token_for_another_email() {
    let ctx = TestContext::new();
    let email = test_email();

    let response = ctx
        .server
        .post("/send-audio-otp")
        .json(&json!({ "email": email, "idToken": ctx.token_for("someone@else.com") }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(ctx.mailer.sent().is_empty());
    assert!(ctx.verifications.get(&email, Purpose::AudioUpload).is_none());
}

#[tokio::test]
async fn send_audio_otp_rejects_garbage_token() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/send-audio-otp")
        .json(&json!({ "email": test_email(), "idToken": "not-a-token" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn send_audio_otp_requires_token() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/send-audio-otp")
        .json(&json!({ "email": test_email() }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn verify_audio_otp_accepts_code_and_consumes_it() {
    let ctx = TestContext::new();
    let email = test_email();
    let code = send_code(&ctx, &email).await;

    let response = ctx
        .server
        .post("/verify-audio-otp")
        .json(&json!({ "email": email, "otp": code }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["verified"], true);
    assert!(ctx.verifications.get(&email, Purpose::AudioUpload).is_none());

    // Second use of the same code finds nothing pending.
    let again = ctx
        .server
        .post("/verify-audio-otp")
        .json(&json!({ "email": email, "otp": code }))
        .await;
    again.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_code_is_rejected_and_record_survives() {
    let ctx = TestContext::new();
    let email = test_email();
    let code = send_code(&ctx, &email).await;
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let response = ctx
        .server
        .post("/verify-audio-otp")
        .json(&json!({ "email": email, "otp": wrong }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "invalid_code");
    assert!(ctx.verifications.get(&email, Purpose::AudioUpload).is_some());

    ctx.server
        .post("/verify-audio-otp")
        .json(&json!({ "email": email, "otp": code }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn code_older_than_five_minutes_is_expired() {
    let ctx = TestContext::new();
    let email = test_email();
    let code = send_code(&ctx, &email).await;

    ctx.verifications.backdate(&email, Purpose::AudioUpload, Duration::seconds(301));

    let response = ctx
        .server
        .post("/verify-audio-otp")
        .json(&json!({ "email": email, "otp": code }))
        .await;

    response.assert_status(StatusCode::GONE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "expired");
    assert!(ctx.verifications.get(&email, Purpose::AudioUpload).is_some());
}

#[tokio::test]
async fn code_just_inside_window_is_accepted() {
    let ctx = TestContext::new();
    let email = test_email();
    let code = send_code(&ctx, &email).await;

    ctx.verifications.backdate(&email, Purpose::AudioUpload, Duration::seconds(295));

    ctx.server
        .post("/verify-audio-otp")
        .json(&json!({ "email": email, "otp": code }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn new_request_replaces_pending_code() {
    let ctx = TestContext::new();
    let email = test_email();
    let first = send_code(&ctx, &email).await;
    let second = send_code(&ctx, &email).await;

    assert_eq!(ctx.verifications.get(&email, Purpose::AudioUpload).unwrap().code, second);

    if first != second {
        ctx.server
            .post("/verify-audio-otp")
            .json(&json!({ "email": email, "otp": first }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    ctx.server
        .post("/verify-audio-otp")
        .json(&json!({ "email": email, "otp": second }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn failed_delivery_leaves_no_code_behind() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.mailer.fail.store(true, Ordering::SeqCst);

    let response = ctx
        .server
        .post("/send-audio-otp")
        .json(&json!({ "email": email, "idToken": ctx.token_for(&email) }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "upstream_failure");
    assert!(ctx.verifications.get(&email, Purpose::AudioUpload).is_none());
}
