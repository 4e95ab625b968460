use anyhow::{Context, Result};
use bindmap_config::ConfigManager;
use std::path::Path;

/// Value of `key` in `group` of the config at `config`
pub fn lookup_option(config: &Path, group: &str, key: &str) -> Result<String> {
    let manager = ConfigManager::load_from(config)
        .with_context(|| format!("Failed to load config '{}'", config.display()))?;
    let value = manager.options().get_option(group, key)?;
    Ok(value.to_string())
}
