use async_trait::async_trait;
use reqwest::Client;

use super::mailer::DeliveryError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send(&self, message: &SmsMessage) -> Result<(), DeliveryError>;
}

/// Twilio-style Messages API: form POST with basic auth.
pub struct TwilioSms {
    client: Client,
    api_url: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioSms {
    pub fn new(client: Client, api_url: String, account_sid: String, auth_token: String, from: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            account_sid,
            auth_token,
            from,
        }
    }
}

#[async_trait]
impl SmsTransport for TwilioSms {
    async fn send(&self, message: &SmsMessage) -> Result<(), DeliveryError> {
        if self.account_sid.is_empty() || self.from.is_empty() {
            return Err(DeliveryError::NotConfigured("SMS_ACCOUNT_SID / SMS_FROM"));
        }

        let url = format!("{}/Accounts/{}/Messages.json", self.api_url, self.account_sid);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", message.to.as_str()),
                ("From", self.from.as_str()),
                ("Body", message.body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Rejected(format!(
                "SMS API returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
