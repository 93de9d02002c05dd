//! CLI command handlers. Each command is in its own file for clarity.

mod config;
mod hub;
mod validate;

pub use config::run_config;
pub use hub::run_hub;
pub use validate::run_validate;
