pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::registry::AppRegistry;
pub use crate::models::error::SError;
