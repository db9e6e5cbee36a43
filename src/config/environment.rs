use chrono::Duration;
use std::env;

use crate::services::admission::AdmissionPolicy;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub bind_addr: String,
    pub id_token_secret: String,
    pub identity_api_url: String,
    pub identity_api_key: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub sms_api_url: String,
    pub sms_account_sid: String,
    pub sms_auth_token: String,
    pub sms_from: String,
    pub payment_api_url: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
    pub settings: ServiceSettings,
}

/// Policy knobs shared by the verification, quota, recovery and payment flows.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub otp_ttl: Duration,
    pub reset_cooldown: Duration,
    pub quota_window: Duration,
    pub admission: AdmissionPolicy,
    pub mail_from: String,
    pub currency: String,
    pub payment_key_secret: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::seconds(300),
            reset_cooldown: Duration::hours(24),
            quota_window: Duration::days(30),
            admission: AdmissionPolicy::default(),
            mail_from: "Twiller <no-reply@twiller.app>".to_string(),
            currency: "INR".to_string(),
            payment_key_secret: String::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let id_token_secret = env::var("ID_TOKEN_SECRET")
            .map_err(|_| "ID_TOKEN_SECRET must be set".to_string())?;

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let payment_key_secret = env::var("PAYMENT_KEY_SECRET").unwrap_or_default();

        let mut settings = ServiceSettings {
            payment_key_secret: payment_key_secret.clone(),
            ..ServiceSettings::default()
        };

        if let Ok(val) = env::var("MAIL_FROM") {
            settings.mail_from = val;
        }

        if let Ok(val) = env::var("PAYMENT_WINDOW_ENABLED") {
            let enabled: bool = val
                .parse()
                .map_err(|e| format!("Invalid PAYMENT_WINDOW_ENABLED: {}", e))?;
            if !enabled {
                settings.admission = AdmissionPolicy::AlwaysOpen;
            }
        }

        if let AdmissionPolicy::DailyWindow { open_hour, utc_offset_minutes } = &mut settings.admission {
            if let Ok(val) = env::var("PAYMENT_WINDOW_HOUR") {
                let hour: u32 = val
                    .parse()
                    .map_err(|e| format!("Invalid PAYMENT_WINDOW_HOUR: {}", e))?;
                if hour > 23 {
                    return Err(format!("Invalid PAYMENT_WINDOW_HOUR: {} is not an hour of day", hour));
                }
                *open_hour = hour;
            }

            if let Ok(val) = env::var("PAYMENT_WINDOW_UTC_OFFSET_MINUTES") {
                let offset: i32 = val
                    .parse()
                    .map_err(|e| format!("Invalid PAYMENT_WINDOW_UTC_OFFSET_MINUTES: {}", e))?;
                if offset.abs() >= 24 * 60 {
                    return Err(format!("Invalid PAYMENT_WINDOW_UTC_OFFSET_MINUTES: {} out of range", offset));
                }
                *utc_offset_minutes = offset;
            }
        }

        Ok(Self {
            database_url,
            redis_url,
            bind_addr,
            id_token_secret,
            identity_api_url: env::var("IDENTITY_API_URL")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string()),
            identity_api_key: env::var("IDENTITY_API_KEY").unwrap_or_default(),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_string()),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            sms_api_url: env::var("SMS_API_URL")
                .unwrap_or_else(|_| "https://api.twilio.com/2010-04-01".to_string()),
            sms_account_sid: env::var("SMS_ACCOUNT_SID").unwrap_or_default(),
            sms_auth_token: env::var("SMS_AUTH_TOKEN").unwrap_or_default(),
            sms_from: env::var("SMS_FROM").unwrap_or_default(),
            payment_api_url: env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
            payment_key_id: env::var("PAYMENT_KEY_ID").unwrap_or_default(),
            payment_key_secret,
            settings,
        })
    }
}
