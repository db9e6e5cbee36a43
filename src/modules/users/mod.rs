pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;

pub use interface::UserRepository;
pub use model::{SubscriptionTier, User};
pub use routes::user_routes;
