use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::jwt::IdTokenService;

/// A bearer credential that the identity authority vouched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub account_id: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Token rejected: {0}")]
    Rejected(String),

    #[error("No identity account for {0}")]
    AccountNotFound(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Identity API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// The external authority that owns credentials.
#[async_trait]
pub trait IdentityAuthority: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
    async fn generate_reset_link(&self, email: &str) -> Result<String, IdentityError>;
    async fn find_account_by_email(&self, email: &str) -> Result<String, IdentityError>;
    async fn update_password(&self, account_id: &str, new_password: &str) -> Result<(), IdentityError>;
}

// =============================================================================
// IDENTITY TOOLKIT CLIENT
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
    return_oob_link: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeResponse {
    oob_link: String,
}

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    email: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAccountRequest<'a> {
    local_id: &'a str,
    password: &'a str,
}

/// Talks to an Identity-Toolkit-style admin REST API; ID tokens are checked locally.
pub struct HttpIdentityAuthority {
    client: Client,
    base_url: String,
    api_key: String,
    tokens: IdTokenService,
}

impl HttpIdentityAuthority {
    pub fn new(client: Client, base_url: String, api_key: String, tokens: IdTokenService) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            tokens,
        }
    }

    async fn post<B, R>(&self, method: &str, body: &B) -> Result<R, IdentityError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/v1/accounts:{}", self.base_url, method);

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::Api(format!(
                "accounts:{} returned status: {}",
                method,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }
}

#[async_trait]
impl IdentityAuthority for HttpIdentityAuthority {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let claims = self
            .tokens
            .verify_id_token(token)
            .map_err(|e| IdentityError::Rejected(e.to_string()))?;

        Ok(VerifiedIdentity {
            account_id: claims.sub,
            email: claims.email,
        })
    }

    async fn generate_reset_link(&self, email: &str) -> Result<String, IdentityError> {
        let response: OobCodeResponse = self
            .post(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "PASSWORD_RESET",
                    email,
                    return_oob_link: true,
                },
            )
            .await?;

        Ok(response.oob_link)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<String, IdentityError> {
        let response: LookupResponse = self.post("lookup", &LookupRequest { email: [email] }).await?;

        response
            .users
            .into_iter()
            .next()
            .map(|u| u.local_id)
            .ok_or_else(|| IdentityError::AccountNotFound(email.to_string()))
    }

    async fn update_password(&self, account_id: &str, new_password: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self
            .post(
                "update",
                &UpdateAccountRequest {
                    local_id: account_id,
                    password: new_password,
                },
            )
            .await?;

        Ok(())
    }
}
