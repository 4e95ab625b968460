//! bindmap rule engine - ordered, regex-driven rewriting of header models
//!
//! Mapping procedures register rules against a [`MappingSession`]; the
//! [`Generator`] applies them to a [`HeaderModel`](bindmap_core::HeaderModel)
//! one procedure at a time.
//!
//! # Architecture
//!
//! - **Rules**: `tag_name`, `remove` and `tag_callback`, each keyed by
//!   element kind and a regex over the element's name
//! - **Ordered application**: rules run exactly in registration order
//! - **Scoped context**: a find context restricts rules to header modules
//!   and clears itself when its guard drops
//! - **Mapping files**: TOML form of a mapping procedure, plus built-in
//!   mappings embedded in the binary
//!
//! # Example
//!
//! ```
//! use bindmap_config::OptionTable;
//! use bindmap_core::{ElementKind, HeaderModel};
//! use bindmap_rule_engine::{MatchOptions, MappingSession};
//! use std::sync::Arc;
//!
//! let mut model = HeaderModel::new();
//! model.push(ElementKind::Enum, "D3D_PRIMITIVE_TOPOLOGY", "d3dcommon", None);
//!
//! let mut session = MappingSession::new(Arc::new(OptionTable::new()), MatchOptions::default());
//! {
//!     let mut scope = session.find_context(["d3dcommon"]);
//!     scope.tag_name(ElementKind::Enum, "^D3D_PRIMITIVE_TOPOLOGY$", "PrimitiveTopology", true)?;
//! }
//! session.finish().apply(&mut model);
//!
//! assert_eq!(model.active().next().unwrap().name(), "PrimitiveTopology");
//! # Ok::<(), bindmap_rule_engine::RuleError>(())
//! ```

pub mod built_in;
pub mod constants;
pub mod context;
pub mod engine;
pub mod loader;
pub mod matcher;
pub mod procedure;
pub mod resolve;
pub mod rule;
pub mod session;
pub mod toml_rule;

// Re-export core types
pub use built_in::{built_in_mapping_sources, load_built_in_mappings};
pub use constants::*;
pub use context::ContextScope;
pub use engine::{RuleEngine, RuleStats};
pub use loader::{load_from_file, MappingLoader};
pub use matcher::{expand_template, MatchOptions, Pattern};
pub use procedure::{Generator, MappingOutput, MappingProcedure, ProcedureReport, CASE_INSENSITIVE_OPTION};
pub use resolve::{ResolvedElement, ResolvedFunctionGroup, ResolvedModel};
pub use rule::{MatchTarget, Rule, RuleAction, Scope};
pub use session::{AppliedPlan, FunctionGroup, FunctionGroupId, IncludeMapping, MappingPlan, MappingSession};
pub use toml_rule::{MappingFile, MappingMetadata, TomlFunctionGroup, TomlInclude, TomlMapping, TomlRule};

/// Result type for rule operations
pub type Result<T> = std::result::Result<T, RuleError>;

/// Error types for rule engine
///
/// Applying rules never fails; these come from compiling patterns, loading
/// mapping files, and config lookups made by mapping procedures.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("Failed to load mappings from {path}: {source}")]
    LoadError {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] bindmap_config::ConfigError),
}
