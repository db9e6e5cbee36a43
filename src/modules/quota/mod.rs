pub mod controller;
pub mod routes;
pub mod service;

pub use routes::quota_routes;
pub use service::{PostAllowance, QuotaDecision, QuotaEngine, QuotaUsage};
