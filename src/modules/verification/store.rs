//! Verification code storage for Redis.

use async_trait::async_trait;
use chrono::Duration;
use redis::AsyncCommands;

use super::interface::{Result, VerificationStore};
use super::model::{Purpose, VerificationRecord};

/// Records outlive their validity window by this much so the timestamp check,
/// not eviction, decides expiry at the boundary.
const EVICTION_GRACE_SECS: u64 = 60;

/// Redis implementation of VerificationStore. `SET EX` evicts records passively.
#[derive(Clone)]
pub struct RedisVerificationStore {
    client: redis::Client,
}

impl RedisVerificationStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(email: &str, purpose: Purpose) -> String {
        format!("otp:{}:{}", purpose.as_str(), email)
    }

    fn expiry_secs(ttl: Duration) -> u64 {
        ttl.num_seconds().max(1) as u64 + EVICTION_GRACE_SECS
    }
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn upsert(&self, record: &VerificationRecord, ttl: Duration) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::key(&record.email, record.purpose);
        let expiry = Self::expiry_secs(ttl);

        let _: () = conn.set_ex(&key, serde_json::to_string(record)?, expiry).await?;
        Ok(())
    }

    async fn find(&self, email: &str, purpose: Purpose) -> Result<Option<VerificationRecord>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::key(email, purpose);

        let json: Option<String> = conn.get(&key).await?;

        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, email: &str, purpose: Purpose) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::key(email, purpose);

        let _: () = conn.del(&key).await?;
        Ok(())
    }
}
