use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::Post;
use crate::error::StoreError;

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> Result<()>;
    /// Posts by `email` whose creation time is at or after `since`.
    async fn count_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64>;
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Post>>;
    /// Newest first.
    async fn list_by_author(&self, email: &str) -> Result<Vec<Post>>;
    /// Case-insensitive substring match on the body, newest first, at most `limit` rows.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Post>>;
}
