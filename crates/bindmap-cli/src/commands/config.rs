use anyhow::{Context, Result};
use bindmap_config::{ConfigError, ConfigManager, OPTIONS_GROUP};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a starter config file (./bindmap.toml by default)
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show the default config file path
    Path,

    /// Validate a config file and list its option groups
    Validate {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn handle_config_command(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Init { path } => init_config(&path.unwrap_or_else(ConfigManager::config_path)),
        ConfigCommand::Path => {
            println!("{}", ConfigManager::config_path().display());
            Ok(())
        }
        ConfigCommand::Validate { path } => {
            validate_config(&path.unwrap_or_else(ConfigManager::config_path))
        }
    }
}

fn init_config(path: &Path) -> Result<()> {
    match ConfigManager::init_at(path) {
        Ok(_) => {
            println!("✓ Initialized config at: {}", path.display());
            Ok(())
        }
        Err(ConfigError::ConfigExists(path)) => {
            println!("Config already exists at: {}", path.display());
            println!("To reinitialize, please delete the existing config first.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn validate_config(path: &Path) -> Result<()> {
    let manager = ConfigManager::load_from(path)
        .context("Config not found or invalid. Run 'bindmap config init' first.")?;
    let options = manager.options();

    println!("✓ Config is valid");
    for group in options.groups() {
        println!("  {}: {} entries", group, options.get_options(group).len());
    }

    if options.get_options(OPTIONS_GROUP).is_empty() {
        println!("\nWarning: no '{}' group; mapping placeholders will fail", OPTIONS_GROUP);
    }
    Ok(())
}
