use anyhow::Result;
use bindmap_rule_engine::{load_built_in_mappings, MappingProcedure};
use colored::*;

/// Name and size of one built-in mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInSummary {
    pub name: String,
    pub description: Option<String>,
    pub context: Vec<String>,
    pub rules: usize,
    pub function_groups: usize,
}

pub fn built_in_summaries() -> Result<Vec<BuiltInSummary>> {
    Ok(load_built_in_mappings()?
        .iter()
        .map(|mapping| {
            let file = mapping.file();
            BuiltInSummary {
                name: mapping.name().to_string(),
                description: file.mapping.description.clone(),
                context: file.mapping.context.clone(),
                rules: file.rules.len(),
                function_groups: file.function_groups.len(),
            }
        })
        .collect())
}

pub fn list_built_in() -> Result<()> {
    println!("{}", "Built-in mappings:".bold());
    for summary in built_in_summaries()? {
        println!(
            "  {} {} rules, {} function groups",
            summary.name.cyan(),
            summary.rules,
            summary.function_groups
        );
        if !summary.context.is_empty() {
            println!("    context: {}", summary.context.join(", "));
        }
        if let Some(description) = &summary.description {
            println!("    {}", description.dimmed());
        }
    }
    Ok(())
}
