pub mod manager;
pub mod types;

pub use manager::{parse_options, ConfigError, ConfigManager, DEFAULT_CONFIG_FILE};
pub use types::{OptionTable, OPTIONS_GROUP};
