//! bindmap CLI - applies mapping rules to a parsed header model.

use anyhow::Result;
use bindmap_cli::commands::{self, ConfigCommand, OutputFormat, RunOptions};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bindmap")]
#[command(about = "Rule-driven name mapping for native binding generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run every mapping over a header model
    Run {
        /// Option config file
        #[arg(long, default_value = bindmap_config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Header model (JSON)
        #[arg(long)]
        model: PathBuf,

        /// Directories of TOML mapping files (can be specified multiple times)
        #[arg(long = "mappings", value_name = "DIR")]
        mappings: Vec<PathBuf>,

        /// Skip the built-in mappings
        #[arg(long)]
        no_builtin: bool,

        /// Output format
        #[arg(short, long = "output", value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Look up one option value
    Option {
        /// Option key, e.g. AssemblyName
        key: String,

        #[arg(long, default_value = bindmap_config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Option group
        #[arg(long, default_value = bindmap_config::OPTIONS_GROUP)]
        group: String,
    },

    /// List the mappings embedded in the binary
    ListBuiltin,

    /// Manage the option config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("bindmap=debug,bindmap_cli=debug,bindmap_rule_engine=debug,bindmap_config=debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(verbose = cli.verbose, "logging initialized");

    match cli.command {
        Command::Run {
            config,
            model,
            mappings,
            no_builtin,
            format,
        } => commands::handle_run(&RunOptions {
            config,
            model,
            mappings,
            no_builtin,
            format,
        }),
        Command::Option { key, config, group } => {
            println!("{}", commands::lookup_option(&config, &group, &key)?);
            Ok(())
        }
        Command::ListBuiltin => commands::list_built_in(),
        Command::Config { command } => commands::handle_config_command(command),
    }
}
