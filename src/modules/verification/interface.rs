use async_trait::async_trait;
use chrono::Duration;

use super::model::{Purpose, VerificationRecord};
use crate::error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Pending codes keyed by (email, purpose). At most one record per key.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Replace-or-create. `ttl` is the store-side eviction hint, not the validity check.
    async fn upsert(&self, record: &VerificationRecord, ttl: Duration) -> Result<()>;
    async fn find(&self, email: &str, purpose: Purpose) -> Result<Option<VerificationRecord>>;
    async fn delete(&self, email: &str, purpose: Purpose) -> Result<()>;
}
