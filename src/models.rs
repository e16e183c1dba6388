pub mod config;
pub mod error;
pub mod graphics;
pub mod paths;
pub mod profile;
pub mod switch;
