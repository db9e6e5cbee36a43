use serde::{Deserialize, Serialize};

use super::model::Channel;

// =============================================================================
// AUDIO UPLOAD
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SendAudioOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "idToken", alias = "id_token")]
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyAudioOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

// =============================================================================
// LANGUAGE CHANGE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SendLanguageOtpRequest {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyLanguageOtpRequest {
    #[serde(default)]
    pub otp: Option<String>,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct OtpSentResponse {
    pub success: bool,
    pub message: &'static str,
    pub channel: Channel,
    pub destination: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct OtpVerifiedResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
