pub mod built_in;
pub mod config;
pub mod option;
pub mod run;

pub use built_in::{built_in_summaries, list_built_in, BuiltInSummary};
pub use config::{handle_config_command, ConfigCommand};
pub use option::lookup_option;
pub use run::{handle_run, run_mapping, OutputFormat, RunOptions, RunResult};
