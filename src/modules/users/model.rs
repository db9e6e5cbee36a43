use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Language codes a profile may switch to.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "es", "hi", "pt", "zh", "fr"];

pub const DEFAULT_LANGUAGE: &str = "en";

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Bronze,
    Silver,
    Gold,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown subscription tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for SubscriptionTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

/// Stored values are read leniently: anything unrecognised counts as the free tier.
impl From<String> for SubscriptionTier {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    #[sqlx(try_from = "String")]
    pub subscription: SubscriptionTier,
    pub preferred_language: String,
    pub last_password_reset: Option<DateTime<Utc>>,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            username: None,
            name: None,
            phone: None,
            bio: None,
            profile_photo: None,
            subscription: SubscriptionTier::Free,
            preferred_language: DEFAULT_LANGUAGE.to_string(),
            last_password_reset: None,
            subscribed_at: None,
            payment_id: None,
            created_at: now,
        }
    }
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
}
