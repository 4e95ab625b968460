//! Mapping driver - runs mapping procedures one native module at a time

use crate::engine::RuleStats;
use crate::matcher::MatchOptions;
use crate::session::{FunctionGroup, IncludeMapping, MappingSession};
use crate::Result;
use bindmap_config::{ConfigError, OptionTable};
use bindmap_core::HeaderModel;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// Config key that switches pattern matching to case-insensitive
pub const CASE_INSENSITIVE_OPTION: &str = "CaseInsensitive";

/// A flat mapping script for one native module
///
/// Implementations register rules on the session in a fixed order and
/// return. They never touch the element table directly.
pub trait MappingProcedure {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Register this procedure's rules, include mappings and function groups
    fn map(&self, session: &mut MappingSession) -> Result<()>;
}

/// Per-procedure outcome
#[derive(Debug, Clone, Serialize)]
pub struct ProcedureReport {
    pub name: String,
    pub rules: usize,
    pub stats: RuleStats,
}

/// Everything a run produced besides the rewritten element table
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingOutput {
    pub includes: Vec<IncludeMapping>,
    pub function_groups: Vec<FunctionGroup>,
    pub reports: Vec<ProcedureReport>,
    pub stats: RuleStats,
}

impl MappingOutput {
    /// Include mapping for a header module, if any procedure declared one
    pub fn include(&self, module: &str) -> Option<&IncludeMapping> {
        self.includes.iter().find(|m| m.include == module)
    }

    pub fn function_group(&self, name: &str) -> Option<&FunctionGroup> {
        self.function_groups.iter().find(|g| g.name == name)
    }

    fn absorb(&mut self, includes: Vec<IncludeMapping>, groups: Vec<FunctionGroup>) {
        for mapping in includes {
            match self.includes.iter_mut().find(|m| m.include == mapping.include) {
                Some(existing) => {
                    warn!(include = %mapping.include, "include remapped by a later procedure");
                    *existing = mapping;
                }
                None => self.includes.push(mapping),
            }
        }

        for group in groups {
            match self.function_groups.iter_mut().find(|g| g.name == group.name) {
                Some(existing) => {
                    warn!(group = %group.name, "function group declared by several procedures, merging");
                    existing.merge(group.functions);
                }
                None => self.function_groups.push(group),
            }
        }
    }
}

/// Runs registered procedures against a header model
pub struct Generator {
    options: Arc<OptionTable>,
    match_options: MatchOptions,
    procedures: Vec<Box<dyn MappingProcedure>>,
}

impl Generator {
    /// Create a generator from the run's option table.
    ///
    /// Reads `CaseInsensitive` from the `Options` group (default false).
    pub fn new(options: OptionTable) -> std::result::Result<Self, ConfigError> {
        let case_insensitive = options.get_bool_option(CASE_INSENSITIVE_OPTION, false)?;
        Ok(Self::with_match_options(
            options,
            MatchOptions { case_insensitive },
        ))
    }

    pub fn with_match_options(options: OptionTable, match_options: MatchOptions) -> Self {
        Self {
            options: Arc::new(options),
            match_options,
            procedures: Vec::new(),
        }
    }

    /// Queue a procedure after those already added
    pub fn add<P: MappingProcedure + 'static>(&mut self, procedure: P) -> &mut Self {
        self.procedures.push(Box::new(procedure));
        self
    }

    pub fn add_boxed(&mut self, procedure: Box<dyn MappingProcedure>) -> &mut Self {
        self.procedures.push(procedure);
        self
    }

    pub fn procedure_names(&self) -> impl Iterator<Item = &str> {
        self.procedures.iter().map(|p| p.name())
    }

    /// Run every procedure in order.
    ///
    /// Each procedure gets a fresh session; its rules are applied before the
    /// next procedure runs. The first failing procedure aborts the run.
    pub fn run(&self, model: &mut HeaderModel) -> Result<MappingOutput> {
        let mut output = MappingOutput::default();

        for procedure in &self.procedures {
            let span = info_span!("mapping", procedure = procedure.name());
            let _enter = span.enter();

            let mut session = MappingSession::new(Arc::clone(&self.options), self.match_options);
            procedure.map(&mut session)?;

            let plan = session.finish();
            let rules = plan.rules().len();
            let applied = plan.apply(model);

            info!(
                rules,
                renamed = applied.stats.elements_renamed,
                removed = applied.stats.elements_removed,
                callbacks = applied.stats.callbacks_tagged,
                "procedure applied"
            );

            output.stats += applied.stats;
            output.reports.push(ProcedureReport {
                name: procedure.name().to_string(),
                rules,
                stats: applied.stats,
            });
            output.absorb(applied.includes, applied.function_groups);
        }

        Ok(output)
    }
}
