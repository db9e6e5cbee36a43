use chrono::{DateTime, Utc};

use super::interface::PostRepository;
use super::model::{NewPost, Post};
use crate::error::StoreError;
use crate::modules::quota::{QuotaDecision, QuotaEngine};
use crate::modules::users::model::User;

#[derive(Debug)]
pub enum PublishOutcome {
    Published(Post),
    LimitExceeded { limit: u64, used: u64 },
}

/// Quota check followed by the insert. The two steps are not atomic.
pub async fn publish_with_quota(
    quota: &QuotaEngine,
    posts: &dyn PostRepository,
    author: &User,
    draft: NewPost,
    now: DateTime<Utc>,
) -> Result<PublishOutcome, StoreError> {
    if let QuotaDecision::LimitExceeded { limit, used } = quota.evaluate(author, 1, now).await? {
        return Ok(PublishOutcome::LimitExceeded { limit, used });
    }

    let post = draft.into_post(&author.email, now);
    posts.create(&post).await?;

    Ok(PublishOutcome::Published(post))
}
