use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use super::schema::{
    CreateSubscriptionRequest, CreateSubscriptionResponse, PaymentSuccessRequest, PaymentSuccessResponse,
};
use super::service::{invoice_email, purchasable_plan};
use crate::error::AppError;
use crate::modules::auth::AuthUser;
use crate::services::payment::verify_payment_signature;
use crate::AppState;

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

// =============================================================================
// POST /create-subscription
// =============================================================================

pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<Json<CreateSubscriptionResponse>, AppError> {
    let now = Utc::now();

    let open = state.gate.is_open(now);
    state.metrics.record_admission(open);
    if !open {
        tracing::info!(email = %auth.email, "subscription attempt outside payment window");
        return Err(AppError::AdmissionDenied(format!(
            "Payments are allowed only {}",
            state.gate.window_description()
        )));
    }

    let plan = required(req.plan, "plan")?;
    let (tier, price) =
        purchasable_plan(&plan).ok_or_else(|| AppError::Validation(format!("Invalid plan: {}", plan)))?;

    let receipt = format!("receipt_{}", now.timestamp_millis());
    let order = state
        .payments
        .create_order(price * 100, &state.settings.currency, &receipt)
        .await
        .map_err(|e| {
            tracing::error!(plan = %tier, "order creation failed: {}", e);
            AppError::Upstream("Failed to create payment order".to_string())
        })?;

    tracing::info!(email = %auth.email, plan = %tier, order_id = %order.id, "payment order created");

    Ok(Json(CreateSubscriptionResponse {
        order_id: order.id,
        amount: order.amount,
        currency: state.settings.currency.clone(),
        plan: tier.to_string(),
    }))
}

// =============================================================================
// POST /payment-success
// =============================================================================

pub async fn payment_success(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PaymentSuccessRequest>,
) -> Result<Json<PaymentSuccessResponse>, AppError> {
    let email = required(req.email, "email")?;
    let plan = required(req.plan, "plan")?;
    let order_id = required(req.order_id, "order_id")?;
    let payment_id = required(req.payment_id, "payment_id")?;
    let signature = required(req.signature, "signature")?;

    if !verify_payment_signature(&state.settings.payment_key_secret, &order_id, &payment_id, &signature) {
        tracing::warn!(%order_id, "payment callback with bad signature");
        return Err(AppError::Unauthenticated("Invalid payment signature".to_string()));
    }

    let (tier, price) =
        purchasable_plan(&plan).ok_or_else(|| AppError::Validation(format!("Invalid plan: {}", plan)))?;

    if !state.users.set_subscription(&email, tier, Utc::now(), &payment_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(%email, plan = %tier, %payment_id, "subscription activated");

    let invoice = invoice_email(
        &state.settings.mail_from,
        &email,
        tier,
        price,
        &state.settings.currency,
        &payment_id,
    );
    if let Err(e) = state.mailer.send(&invoice).await {
        tracing::warn!(%email, "invoice email not sent: {}", e);
    }

    Ok(Json(PaymentSuccessResponse {
        success: true,
        message: "Subscription updated".to_string(),
        plan: tier.to_string(),
    }))
}
