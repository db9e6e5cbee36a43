use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use super::interface::{PostRepository, Result};
use super::model::Post;

pub struct MySqlPostRepository {
    pool: Pool<MySql>,
}

impl MySqlPostRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

/// `%term%` with LIKE metacharacters escaped, for use with `ESCAPE '\\'`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl PostRepository for MySqlPostRepository {
    async fn create(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, email, body, photo, audio, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.email)
        .bind(&post.body)
        .bind(&post.photo)
        .bind(&post.audio)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_since(&self, email: &str, since: DateTime<Utc>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE email = ? AND created_at >= ?")
            .bind(email)
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn list_all(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, email, body, photo, audio, created_at FROM posts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_by_author(&self, email: &str) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, email, body, photo, audio, created_at FROM posts WHERE email = ? ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, email, body, photo, audio, created_at FROM posts
            WHERE LOWER(body) LIKE LOWER(?) ESCAPE '\\'
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
