pub mod controller;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;
pub mod store;

pub use interface::VerificationStore;
pub use model::{Channel, DeliveryReceipt, OtpRequest, Purpose, VerificationRecord, VerifiedOtp};
pub use routes::verification_routes;
pub use service::{OtpError, OtpManager};
