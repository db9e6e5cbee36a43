pub mod controller;
pub mod routes;
pub mod schema;
pub mod service;

pub use routes::recovery_routes;
pub use service::{generate_password, RecoveryController, RecoveryError, ResetMethod, ResetOutcome};
