pub mod extractor;

pub use extractor::AuthUser;
