use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email or phone number on file.
    #[serde(default)]
    pub identifier: Option<String>,
    /// `"email"` or `"generate"`.
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
