pub mod admission;
pub mod identity;
pub mod jwt;
pub mod mailer;
pub mod metrics;
pub mod payment;
pub mod security;
pub mod sms;
