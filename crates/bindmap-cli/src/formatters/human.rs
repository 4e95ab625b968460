//! Human-readable formatter for mapping runs.

use crate::commands::RunResult;
use bindmap_core::ElementKind;
use colored::*;

pub fn print_run(result: &RunResult) {
    let stats = &result.output.stats;

    println!("\n{}", "bindmap Mapping Results".bold());
    println!("=======================\n");

    println!("Statistics:");
    println!("  Elements: {}", result.total_elements);
    println!("  Emitted: {}", result.resolved.elements.len());
    println!("  Renamed: {}", stats.elements_renamed);
    println!("  Removed: {}", stats.elements_removed);
    println!("  Callbacks: {}", stats.callbacks_tagged);
    println!("  Functions bound: {}", stats.functions_bound);

    println!("\n{}", "Procedures:".bold());
    for report in &result.output.reports {
        let marker = if report.stats.rules_unmatched == 0 {
            "✓".green()
        } else {
            "!".yellow()
        };
        println!(
            "  {} {} ({} rules, {} unmatched)",
            marker, report.name, report.rules, report.stats.rules_unmatched
        );
    }

    if !result.output.includes.is_empty() {
        println!("\n{}", "Includes:".bold());
        for include in &result.output.includes {
            println!(
                "  {} -> {} [{}]",
                include.include.cyan(),
                include.namespace,
                include.assembly
            );
        }
    }

    for kind in ElementKind::all() {
        let elements: Vec<_> = result.resolved.of_kind(*kind).collect();
        if elements.is_empty() {
            continue;
        }
        println!("\n{} ({}):", kind.as_str().bold(), elements.len());
        for element in elements {
            let callback = if element.is_callback { " [callback]" } else { "" };
            println!(
                "  {} {} {}{}",
                element.native_name.dimmed(),
                "->".dimmed(),
                element.name,
                callback.yellow()
            );
        }
    }

    if !result.resolved.function_groups.is_empty() {
        println!("\n{}", "Function groups:".bold());
        for group in &result.resolved.function_groups {
            println!("  {} ({}): {}", group.name.cyan(), group.namespace, group.functions.join(", "));
        }
    }
}
