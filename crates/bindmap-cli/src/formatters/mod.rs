//! Output formatters for mapping runs.

pub mod human;
pub mod json;
