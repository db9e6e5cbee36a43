pub mod database;
pub mod environment;

pub use database::{init_db, init_redis, DbPool};
pub use environment::{Config, ServiceSettings};
