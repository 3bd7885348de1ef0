pub mod core_config;

pub use core_config::{ConfigError, CoreConfig};
