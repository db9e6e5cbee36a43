use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Failure of an outbound message transport (email or SMS).
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Transport rejected message: {0}")]
    Rejected(String),

    #[error("Transport not configured: {0}")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError>;
}

// =============================================================================
// HTTP MAIL API
// =============================================================================

#[derive(Debug, Serialize)]
struct Address {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: Address,
    to: Vec<Address>,
    subject: &'a str,
    text_content: &'a str,
}

/// Splits `Display Name <addr@host>` into its parts; a bare address has no name.
fn parse_mailbox(raw: &str) -> Address {
    let raw = raw.trim();
    match (raw.find('<'), raw.rfind('>')) {
        (Some(start), Some(end)) if start < end => {
            let name = raw[..start].trim().trim_matches('"').trim();
            Address {
                email: raw[start + 1..end].trim().to_string(),
                name: (!name.is_empty()).then(|| name.to_string()),
            }
        }
        _ => Address {
            email: raw.to_string(),
            name: None,
        },
    }
}

/// Sends plain-text mail through a JSON HTTP mail API (Brevo-compatible payload).
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(client: Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl EmailTransport for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        if self.api_key.is_empty() {
            return Err(DeliveryError::NotConfigured("MAIL_API_KEY"));
        }

        let body = SendEmailBody {
            sender: parse_mailbox(&message.from),
            to: vec![parse_mailbox(&message.to)],
            subject: &message.subject,
            text_content: &message.body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Rejected(format!(
                "mail API returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
