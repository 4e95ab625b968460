use crate::commands::RunResult;
use anyhow::Result;

pub fn print_json(result: &RunResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
