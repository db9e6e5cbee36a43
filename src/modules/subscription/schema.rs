use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub plan: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSubscriptionResponse {
    pub order_id: String,
    /// Minor currency units.
    pub amount: u64,
    pub currency: String,
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentSuccessRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentSuccessResponse {
    pub success: bool,
    pub message: String,
    pub plan: String,
}
