pub mod controller;
pub mod routes;
pub mod schema;
pub mod service;

pub use routes::subscription_routes;
pub use service::{plan_price, purchasable_plan};
