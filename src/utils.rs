pub mod file;
pub mod json;
pub mod logging;
pub mod privilege;
pub mod process;
pub mod tasks;
