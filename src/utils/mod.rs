pub mod errors;
pub mod config;
pub mod json;

pub use errors::ApiError;
pub use config::AppConfig;
