use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{SubscriptionTier, User};

lazy_static! {
    /// E.164-ish: optional leading +, 7 to 15 digits.
    pub static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
    pub static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,32}$").unwrap();
}

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *USERNAME_RE, message = "Username must be 3-32 letters, digits or underscores"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

// =============================================================================
// PROFILE
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *USERNAME_RE, message = "Username must be 3-32 letters, digits or underscores"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub profile_photo: Option<String>,
    pub subscription: SubscriptionTier,
    pub preferred_language: String,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            username: user.username,
            name: user.name,
            phone: user.phone,
            bio: user.bio,
            profile_photo: user.profile_photo,
            subscription: user.subscription,
            preferred_language: user.preferred_language,
            subscribed_at: user.subscribed_at,
            created_at: user.created_at,
        }
    }
}
