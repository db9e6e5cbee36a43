use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use super::model::{DeliveryReceipt, OtpRequest, Purpose, VerifiedOtp};
use super::schema::{
    OtpSentResponse, OtpVerifiedResponse, SendAudioOtpRequest, SendLanguageOtpRequest,
    VerifyAudioOtpRequest, VerifyLanguageOtpRequest,
};
use super::service::OtpError;
use crate::error::AppError;
use crate::modules::auth::AuthUser;
use crate::AppState;

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

async fn issue(
    state: &AppState,
    subject: &str,
    request: OtpRequest,
) -> Result<Json<OtpSentResponse>, AppError> {
    let purpose = request.purpose();
    let ttl = state.otp.ttl();

    match state.otp.request(subject, request, Utc::now()).await {
        Ok(DeliveryReceipt { channel, destination }) => {
            state.metrics.record_otp_request(purpose.as_str(), channel.as_str(), "sent");
            Ok(Json(OtpSentResponse {
                success: true,
                message: "OTP sent",
                channel,
                destination,
                expires_in: ttl.num_seconds(),
            }))
        }
        Err(e) => {
            state.metrics.record_otp_request(purpose.as_str(), "none", e.outcome());
            Err(e.into())
        }
    }
}

async fn check(
    state: &AppState,
    subject: &str,
    purpose: Purpose,
    otp: &str,
) -> Result<VerifiedOtp, AppError> {
    let result = state.otp.verify(subject, purpose, otp, Utc::now()).await;

    let outcome = match &result {
        Ok(_) => "verified",
        Err(e) => e.outcome(),
    };
    state.metrics.record_otp_verification(purpose.as_str(), outcome);

    result.map_err(|e: OtpError| {
        tracing::warn!(purpose = %purpose, "verification rejected: {}", e);
        e.into()
    })
}

// =============================================================================
// POST /send-audio-otp
// =============================================================================

/// The caller proves ownership of `email` with an ID token instead of a session.
pub async fn send_audio_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendAudioOtpRequest>,
) -> Result<Json<OtpSentResponse>, AppError> {
    let email = required(req.email, "email")?;
    let id_token = required(req.id_token, "idToken")?;

    let identity = state.identity.verify_token(&id_token).await.map_err(|e| {
        tracing::debug!("audio OTP token rejected: {}", e);
        AppError::Unauthenticated("Unauthorized".to_string())
    })?;

    if identity.email != email {
        return Err(AppError::Unauthenticated("Token does not belong to this email".to_string()));
    }

    issue(&state, &email, OtpRequest::AudioUpload).await
}

// =============================================================================
// POST /verify-audio-otp
// =============================================================================

pub async fn verify_audio_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyAudioOtpRequest>,
) -> Result<Json<OtpVerifiedResponse>, AppError> {
    let email = required(req.email, "email")?;
    let otp = required(req.otp, "otp")?;

    check(&state, &email, Purpose::AudioUpload, &otp).await?;

    Ok(Json(OtpVerifiedResponse {
        verified: true,
        language: None,
    }))
}

// =============================================================================
// POST /send-lang-otp
// =============================================================================

pub async fn send_language_otp(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<SendLanguageOtpRequest>,
) -> Result<Json<OtpSentResponse>, AppError> {
    let language = required(req.language, "language")?;

    issue(&state, &auth.email, OtpRequest::LanguageChange { language }).await
}

// =============================================================================
// POST /verify-lang-otp
// =============================================================================

pub async fn verify_language_otp(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<VerifyLanguageOtpRequest>,
) -> Result<Json<OtpVerifiedResponse>, AppError> {
    let otp = required(req.otp, "otp")?;

    let language = match check(&state, &auth.email, Purpose::LanguageChange, &otp).await? {
        VerifiedOtp::LanguageChanged { language } => Some(language),
        VerifiedOtp::AudioUpload => None,
    };

    Ok(Json(OtpVerifiedResponse {
        verified: true,
        language,
    }))
}
