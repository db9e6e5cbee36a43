use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Arc;

use super::interface::VerificationStore;
use super::model::{Channel, DeliveryReceipt, OtpRequest, Purpose, VerifiedOtp};
use crate::error::{AppError, StoreError};
use crate::modules::users::interface::UserRepository;
use crate::modules::users::model::is_supported_language;
use crate::services::mailer::{DeliveryError, EmailMessage, EmailTransport};
use crate::services::sms::{SmsMessage, SmsTransport};

/// Languages whose change confirmation goes out by email instead of SMS.
pub const EMAIL_CHANNEL_LANGUAGES: &[&str] = &["fr"];

#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    #[error("No pending verification code")]
    NotFound,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Verification code expired")]
    Expired,

    #[error("User not found")]
    UserNotFound,

    #[error("No phone number on file")]
    MissingPhone,

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to deliver verification code: {0}")]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OtpError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidCode => "invalid",
            Self::Expired => "expired",
            Self::UserNotFound => "user_not_found",
            Self::MissingPhone => "missing_phone",
            Self::UnsupportedLanguage(_) => "unsupported_language",
            Self::Delivery(_) => "delivery_failed",
            Self::Store(_) => "store_error",
        }
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::NotFound => AppError::NotFound(err.to_string()),
            OtpError::InvalidCode => AppError::InvalidCode,
            OtpError::Expired => AppError::CodeExpired,
            OtpError::UserNotFound => AppError::NotFound(err.to_string()),
            OtpError::MissingPhone | OtpError::UnsupportedLanguage(_) => AppError::Validation(err.to_string()),
            OtpError::Delivery(_) => AppError::Upstream(err.to_string()),
            OtpError::Store(e) => AppError::Store(e),
        }
    }
}

/// Uniform draw over the six-digit range.
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    let keep = digits.len().min(4);
    let hidden = digits.len() - keep;
    let tail: String = digits[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

/// Issues, delivers and checks one-time passcodes.
pub struct OtpManager {
    store: Arc<dyn VerificationStore>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn EmailTransport>,
    sms: Arc<dyn SmsTransport>,
    ttl: Duration,
    mail_from: String,
}

impl OtpManager {
    pub fn new(
        store: Arc<dyn VerificationStore>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn EmailTransport>,
        sms: Arc<dyn SmsTransport>,
        ttl: Duration,
        mail_from: String,
    ) -> Self {
        Self {
            store,
            users,
            mailer,
            sms,
            ttl,
            mail_from,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replaces any pending code for (subject, purpose) and sends the new one.
    ///
    /// If delivery fails the new record is deleted and the previous one is not
    /// restored, so no code for that pair stays live.
    pub async fn request(
        &self,
        subject: &str,
        request: OtpRequest,
        now: DateTime<Utc>,
    ) -> Result<DeliveryReceipt, OtpError> {
        if let OtpRequest::LanguageChange { language } = &request {
            if !is_supported_language(language) {
                return Err(OtpError::UnsupportedLanguage(language.clone()));
            }
        }

        let purpose = request.purpose();
        let code = generate_code();
        let record = request.clone().into_record(subject, code, now);
        self.store.upsert(&record, self.ttl).await?;

        match self.deliver(subject, &request, &record.code).await {
            Ok(receipt) => {
                tracing::info!(purpose = %purpose, channel = receipt.channel.as_str(), "verification code sent");
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(purpose = %purpose, "verification code not delivered: {}", e);
                if let Err(cleanup) = self.store.delete(subject, purpose).await {
                    tracing::error!(purpose = %purpose, "failed to discard undelivered code: {}", cleanup);
                }
                Err(e)
            }
        }
    }

    async fn deliver(&self, subject: &str, request: &OtpRequest, code: &str) -> Result<DeliveryReceipt, OtpError> {
        let minutes = self.ttl.num_minutes().max(1);

        match request {
            OtpRequest::AudioUpload => {
                self.send_email(
                    subject,
                    "Your OTP for Audio Upload",
                    format!("Your OTP is: {} (Valid for {} minutes)", code, minutes),
                )
                .await
            }
            OtpRequest::LanguageChange { language } if EMAIL_CHANNEL_LANGUAGES.contains(&language.as_str()) => {
                self.send_email(
                    subject,
                    "Your OTP for Language Change",
                    format!(
                        "Your OTP to switch your language to '{}' is: {} (Valid for {} minutes)",
                        language, code, minutes
                    ),
                )
                .await
            }
            OtpRequest::LanguageChange { language } => {
                let user = self
                    .users
                    .find_by_email(subject)
                    .await?
                    .ok_or(OtpError::UserNotFound)?;

                let phone = user
                    .phone
                    .filter(|p| !p.trim().is_empty())
                    .ok_or(OtpError::MissingPhone)?;

                self.sms
                    .send(&SmsMessage {
                        to: phone.clone(),
                        body: format!(
                            "Your Twiller OTP to switch language to '{}' is {}. Valid for {} minutes.",
                            language, code, minutes
                        ),
                    })
                    .await?;

                Ok(DeliveryReceipt {
                    channel: Channel::Sms,
                    destination: mask_phone(&phone),
                })
            }
        }
    }

    async fn send_email(&self, to: &str, subject: &str, body: String) -> Result<DeliveryReceipt, OtpError> {
        self.mailer
            .send(&EmailMessage {
                from: self.mail_from.clone(),
                to: to.to_string(),
                subject: subject.to_string(),
                body,
            })
            .await?;

        Ok(DeliveryReceipt {
            channel: Channel::Email,
            destination: mask_email(to),
        })
    }

    /// Checks a presented code. Mismatch and expiry leave the record in place;
    /// success applies the purpose's effect and consumes the record.
    pub async fn verify(
        &self,
        subject: &str,
        purpose: Purpose,
        presented: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedOtp, OtpError> {
        let record = self
            .store
            .find(subject, purpose)
            .await?
            .ok_or(OtpError::NotFound)?;

        if record.code != presented {
            return Err(OtpError::InvalidCode);
        }

        if record.is_expired(now, self.ttl) {
            return Err(OtpError::Expired);
        }

        let verified = match purpose {
            Purpose::AudioUpload => VerifiedOtp::AudioUpload,
            Purpose::LanguageChange => {
                let language = record.language.ok_or(OtpError::NotFound)?;
                self.users.set_language(subject, &language).await?;
                VerifiedOtp::LanguageChanged { language }
            }
        };

        self.store.delete(subject, purpose).await?;
        tracing::info!(purpose = %purpose, "verification code accepted");

        Ok(verified)
    }
}
