use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{AppError, StoreError};
use crate::modules::users::interface::UserRepository;
use crate::services::identity::{IdentityAuthority, IdentityError};
use crate::services::mailer::{DeliveryError, EmailMessage, EmailTransport};

pub const GENERATED_PASSWORD_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMethod {
    /// Mail a reset link issued by the identity authority.
    Email,
    /// Set a random password and hand it back to the caller once.
    Generate,
}

impl ResetMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Generate => "generate",
        }
    }
}

impl FromStr for ResetMethod {
    type Err = RecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "generate" => Ok(Self::Generate),
            other => Err(RecoveryError::InvalidMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    LinkSent { email: String },
    PasswordGenerated { password: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("User not found")]
    UserNotFound,

    #[error("You can reset only once per day")]
    CooldownActive { retry_after: Duration },

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Identity authority failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("Failed to send reset email: {0}")]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecoveryError {
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::UserNotFound => "not_found",
            Self::CooldownActive { .. } => "cooldown",
            Self::InvalidMethod(_) => "invalid_method",
            Self::Identity(_) | Self::Delivery(_) => "upstream_failure",
            Self::Store(_) => "store_error",
        }
    }
}

impl From<RecoveryError> for AppError {
    fn from(err: RecoveryError) -> Self {
        match err {
            RecoveryError::UserNotFound => AppError::NotFound(err.to_string()),
            RecoveryError::CooldownActive { .. } => AppError::Conflict(err.to_string()),
            RecoveryError::InvalidMethod(_) => AppError::Validation(err.to_string()),
            RecoveryError::Identity(_) | RecoveryError::Delivery(_) => AppError::Upstream(err.to_string()),
            RecoveryError::Store(e) => AppError::Store(e),
        }
    }
}

/// Random password over `[A-Za-z0-9]`. Not a hardened credential generator.
pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Password recovery with a per-user cooldown between successful resets.
///
/// Neither path is transactional: an identity failure after the cooldown check
/// leaves `last_password_reset` untouched, so the user may retry immediately.
pub struct RecoveryController {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityAuthority>,
    mailer: Arc<dyn EmailTransport>,
    cooldown: Duration,
    mail_from: String,
}

impl RecoveryController {
    pub fn new(
        users: Arc<dyn UserRepository>,
        identity: Arc<dyn IdentityAuthority>,
        mailer: Arc<dyn EmailTransport>,
        cooldown: Duration,
        mail_from: String,
    ) -> Self {
        Self {
            users,
            identity,
            mailer,
            cooldown,
            mail_from,
        }
    }

    pub async fn request_reset(
        &self,
        identifier: &str,
        method: &str,
        now: DateTime<Utc>,
    ) -> Result<ResetOutcome, RecoveryError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(RecoveryError::UserNotFound)?;

        if let Some(last) = user.last_password_reset {
            let elapsed = now - last;
            if elapsed < self.cooldown {
                return Err(RecoveryError::CooldownActive {
                    retry_after: self.cooldown - elapsed,
                });
            }
        }

        match method.parse::<ResetMethod>()? {
            ResetMethod::Email => {
                let link = self.identity.generate_reset_link(&user.email).await?;

                self.mailer
                    .send(&EmailMessage {
                        from: self.mail_from.clone(),
                        to: user.email.clone(),
                        subject: "Reset your Twiller password".to_string(),
                        body: format!(
                            "We received a request to reset your password.\n\nOpen this link to choose a new one:\n{}\n\nIf you did not ask for this, you can ignore this email.",
                            link
                        ),
                    })
                    .await?;

                self.users.record_password_reset(&user.email, now).await?;
                tracing::info!(email = %user.email, "password reset link sent");

                Ok(ResetOutcome::LinkSent { email: user.email })
            }
            ResetMethod::Generate => {
                let password = generate_password();
                let account_id = self.identity.find_account_by_email(&user.email).await?;
                self.identity.update_password(&account_id, &password).await?;

                // Only the timestamp is persisted; the password lives in the response.
                self.users.record_password_reset(&user.email, now).await?;
                tracing::info!(email = %user.email, "password regenerated");

                Ok(ResetOutcome::PasswordGenerated { password })
            }
        }
    }
}
