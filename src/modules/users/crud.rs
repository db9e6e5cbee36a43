use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, Pool};

use super::interface::{Result, UserRepository};
use super::model::{ProfileUpdate, SubscriptionTier, User};

const USER_COLUMNS: &str = "email, username, name, phone, bio, profile_photo, subscription, \
     preferred_language, last_password_reset, subscribed_at, payment_id, created_at";

pub struct MySqlUserRepository {
    pool: Pool<MySql>,
}

impl MySqlUserRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (email, username, name, phone, bio, profile_photo, subscription,
                               preferred_language, last_password_reset, subscribed_at, payment_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.bio)
        .bind(&user.profile_photo)
        .bind(user.subscription.as_str())
        .bind(&user.preferred_language)
        .bind(user.last_password_reset)
        .bind(user.subscribed_at)
        .bind(&user.payment_id)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ? OR phone = ? LIMIT 1",
            USER_COLUMNS
        ))
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn update_profile(&self, email: &str, update: &ProfileUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE(?, name),
                username = COALESCE(?, username),
                phone = COALESCE(?, phone),
                bio = COALESCE(?, bio),
                profile_photo = COALESCE(?, profile_photo)
            WHERE email = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.username)
        .bind(&update.phone)
        .bind(&update.bio)
        .bind(&update.profile_photo)
        .bind(email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // MySQL reports 0 affected rows when the values did not change
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists > 0)
    }

    async fn set_language(&self, email: &str, language: &str) -> Result<()> {
        sqlx::query("UPDATE users SET preferred_language = ? WHERE email = ?")
            .bind(language)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_subscription(
        &self,
        email: &str,
        tier: SubscriptionTier,
        subscribed_at: DateTime<Utc>,
        payment_id: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET subscription = ?, subscribed_at = ?, payment_id = ? WHERE email = ?",
        )
        .bind(tier.as_str())
        .bind(subscribed_at)
        .bind(payment_id)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_password_reset(&self, email: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_password_reset = ? WHERE email = ?")
            .bind(at)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
