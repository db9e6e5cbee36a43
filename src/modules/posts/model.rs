use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: String,
    /// Author email. Not referentially enforced against `users`.
    pub email: String,
    pub body: String,
    pub photo: Option<String>,
    pub audio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Content of a post before it is stored.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub body: String,
    pub photo: Option<String>,
    pub audio: Option<String>,
}

impl NewPost {
    pub fn into_post(self, author: &str, now: DateTime<Utc>) -> Post {
        Post {
            id: uuid::Uuid::new_v4().to_string(),
            email: author.to_string(),
            body: self.body,
            photo: self.photo,
            audio: self.audio,
            created_at: now,
        }
    }
}
