use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdClaims {
    pub sub: String,        // account id at the identity authority
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Verifies ID tokens minted by the identity authority with a shared HS256 key.
pub struct IdTokenService {
    secret: String,
    token_duration: Duration,
}

impl IdTokenService {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            token_duration: Duration::hours(1),
        }
    }

    /// Mints a token the same way the identity authority does. Used by local tooling and tests.
    pub fn create_id_token(&self, account_id: &str, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + self.token_duration;

        let claims = IdClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn verify_id_token(&self, token: &str) -> Result<IdClaims, jsonwebtoken::errors::Error> {
        decode::<IdClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}
