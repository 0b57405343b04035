pub mod app_config;
pub mod targets;

pub use app_config::AppConfig;
pub use targets::{CategoryTarget, load_targets, parse_targets};
