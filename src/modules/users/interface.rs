use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{ProfileUpdate, SubscriptionTier, User};
use crate::error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Exact match against either the email or the phone number.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
    /// Returns false when no user has that email.
    async fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<bool>;
    async fn set_language(&self, email: &str, language: &str) -> Result<()>;
    /// Returns false when no user has that email.
    async fn set_subscription(
        &self,
        email: &str,
        tier: SubscriptionTier,
        subscribed_at: DateTime<Utc>,
        payment_id: &str,
    ) -> Result<bool>;
    async fn record_password_reset(&self, email: &str, at: DateTime<Utc>) -> Result<()>;
}
