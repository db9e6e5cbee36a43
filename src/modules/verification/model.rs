use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a pending code will unlock once presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    AudioUpload,
    LanguageChange,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AudioUpload => "audio_upload",
            Self::LanguageChange => "language_change",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single live code for one (email, purpose) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub email: String,
    pub purpose: Purpose,
    pub code: String,
    pub created_at: DateTime<Utc>,
    /// Requested language for `LanguageChange`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl VerificationRecord {
    /// Valid through exactly `ttl` after creation, expired from the next instant on.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }
}

/// A code request together with its purpose-specific context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpRequest {
    AudioUpload,
    LanguageChange { language: String },
}

impl OtpRequest {
    pub fn purpose(&self) -> Purpose {
        match self {
            Self::AudioUpload => Purpose::AudioUpload,
            Self::LanguageChange { .. } => Purpose::LanguageChange,
        }
    }

    fn language(&self) -> Option<String> {
        match self {
            Self::AudioUpload => None,
            Self::LanguageChange { language } => Some(language.clone()),
        }
    }

    pub fn into_record(self, email: &str, code: String, now: DateTime<Utc>) -> VerificationRecord {
        VerificationRecord {
            email: email.to_string(),
            purpose: self.purpose(),
            code,
            created_at: now,
            language: self.language(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub channel: Channel,
    /// Partially masked address or number the code went to.
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifiedOtp {
    AudioUpload,
    LanguageChanged { language: String },
}
