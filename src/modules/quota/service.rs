use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::error::StoreError;
use crate::modules::posts::interface::PostRepository;
use crate::modules::users::model::{SubscriptionTier, User};

/// How many posts a tier may publish inside the rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAllowance {
    Limited(u64),
    Unlimited,
}

impl PostAllowance {
    pub fn for_tier(tier: SubscriptionTier) -> Self {
        match tier {
            SubscriptionTier::Free => Self::Limited(1),
            SubscriptionTier::Bronze => Self::Limited(3),
            SubscriptionTier::Silver => Self::Limited(5),
            SubscriptionTier::Gold => Self::Unlimited,
        }
    }
}

/// Numbers serialize as numbers; the unbounded case is the string `"unlimited"`.
impl Serialize for PostAllowance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Limited(n) => serializer.serialize_u64(*n),
            Self::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed,
    LimitExceeded { limit: u64, used: u64 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaUsage {
    pub plan: SubscriptionTier,
    pub limit: PostAllowance,
    pub used: u64,
    pub left: PostAllowance,
}

/// Tier-based posting allowance over a trailing window.
///
/// Evaluation and the insert that follows it are separate store calls with no
/// lock between them, so two concurrent posts from one user can both pass.
pub struct QuotaEngine {
    posts: Arc<dyn PostRepository>,
    window: Duration,
}

impl QuotaEngine {
    pub fn new(posts: Arc<dyn PostRepository>, window: Duration) -> Self {
        Self { posts, window }
    }

    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    pub async fn evaluate(&self, user: &User, proposed: u64, now: DateTime<Utc>) -> Result<QuotaDecision, StoreError> {
        let limit = match PostAllowance::for_tier(user.subscription) {
            PostAllowance::Unlimited => return Ok(QuotaDecision::Allowed),
            PostAllowance::Limited(limit) => limit,
        };

        let used = self.posts.count_since(&user.email, self.window_start(now)).await?;

        if used.saturating_add(proposed) <= limit {
            Ok(QuotaDecision::Allowed)
        } else {
            Ok(QuotaDecision::LimitExceeded { limit, used })
        }
    }

    pub async fn remaining(&self, user: &User, now: DateTime<Utc>) -> Result<QuotaUsage, StoreError> {
        let limit = PostAllowance::for_tier(user.subscription);
        let used = self.posts.count_since(&user.email, self.window_start(now)).await?;

        let left = match limit {
            PostAllowance::Limited(n) => PostAllowance::Limited(n.saturating_sub(used)),
            PostAllowance::Unlimited => PostAllowance::Unlimited,
        };

        Ok(QuotaUsage {
            plan: user.subscription,
            limit,
            used,
            left,
        })
    }
}
