pub mod auth;
pub mod metrics;
pub mod posts;
pub mod quota;
pub mod recovery;
pub mod subscription;
pub mod users;
pub mod verification;
