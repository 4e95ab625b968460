//! `bindmap run`: load config, model and mappings, then apply them in order.

use crate::formatters;
use anyhow::{Context, Result};
use bindmap_config::ConfigManager;
use bindmap_core::HeaderModel;
use bindmap_rule_engine::{Generator, MappingLoader, MappingOutput, ResolvedModel};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Options for a mapping run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: PathBuf,
    pub model: PathBuf,
    pub mappings: Vec<PathBuf>,
    pub no_builtin: bool,
    pub format: OutputFormat,
}

/// Outcome of a run, ready for formatting
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub output: MappingOutput,
    pub resolved: ResolvedModel,
    /// Elements in the model before any removal
    pub total_elements: usize,
}

/// Run every mapping and resolve the result
pub fn run_mapping(options: &RunOptions) -> Result<RunResult> {
    let config = ConfigManager::load_from(&options.config)
        .with_context(|| format!("Failed to load config '{}'", options.config.display()))?;

    let contents = fs::read_to_string(&options.model)
        .with_context(|| format!("Failed to read model '{}'", options.model.display()))?;
    let mut model = HeaderModel::from_json(&contents)
        .with_context(|| format!("Invalid header model '{}'", options.model.display()))?;

    let mut loader = MappingLoader::new();
    if options.no_builtin {
        loader = loader.without_built_in();
    }
    for dir in &options.mappings {
        loader = loader.with_directory(dir);
    }
    let mappings = loader.load_all().context("Failed to load mappings")?;

    let mut generator = Generator::new(config.into_options())?;
    for mapping in mappings {
        generator.add(mapping);
    }

    let output = generator.run(&mut model).context("Mapping run failed")?;
    info!(
        procedures = output.reports.len(),
        active = model.active_count(),
        "mapping run complete"
    );

    let resolved = ResolvedModel::build(&model, &output);
    Ok(RunResult {
        output,
        resolved,
        total_elements: model.len(),
    })
}

pub fn handle_run(options: &RunOptions) -> Result<()> {
    let result = run_mapping(options)?;
    match options.format {
        OutputFormat::Human => formatters::human::print_run(&result),
        OutputFormat::Json => formatters::json::print_json(&result)?,
    }
    Ok(())
}
