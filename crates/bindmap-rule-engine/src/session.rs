//! Mapping session - what a mapping procedure registers
//!
//! A session records rules, include mappings and function groups in the
//! order a procedure declares them. Nothing touches the element table until
//! the finished [`MappingPlan`] is applied.

use crate::context::ContextScope;
use crate::engine::{RuleEngine, RuleStats};
use crate::matcher::{MatchOptions, Pattern};
use crate::rule::{MatchTarget, Rule, Scope};
use crate::Result;
use bindmap_config::{ConfigError, OptionTable};
use bindmap_core::{ElementId, ElementKind, HeaderModel};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maps a header module to the assembly and namespace its elements go to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeMapping {
    pub include: String,
    pub assembly: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// Handle to a function group within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionGroupId(usize);

/// Free functions emitted together as one static class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionGroup {
    pub name: String,
    pub assembly: String,
    pub namespace: String,
    pub functions: Vec<ElementId>,
}

impl FunctionGroup {
    /// Add functions not already in the group, keeping order
    pub(crate) fn merge(&mut self, functions: impl IntoIterator<Item = ElementId>) -> usize {
        let mut added = 0;
        for id in functions {
            if !self.functions.contains(&id) {
                self.functions.push(id);
                added += 1;
            }
        }
        added
    }
}

#[derive(Debug, Clone)]
struct FunctionBinding {
    group: FunctionGroupId,
    pattern: Pattern,
    scope: Scope,
}

/// Recording surface handed to a mapping procedure
#[derive(Debug)]
pub struct MappingSession {
    options: Arc<OptionTable>,
    match_options: MatchOptions,
    pub(crate) context: Scope,
    engine: RuleEngine,
    includes: Vec<IncludeMapping>,
    function_groups: Vec<FunctionGroup>,
    bindings: Vec<FunctionBinding>,
}

impl MappingSession {
    pub fn new(options: Arc<OptionTable>, match_options: MatchOptions) -> Self {
        Self {
            options,
            match_options,
            context: Scope::all(),
            engine: RuleEngine::new(),
            includes: Vec::new(),
            function_groups: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Open a find context over the given header modules.
    ///
    /// Rules registered while the returned guard is alive only see elements
    /// declared in those modules. Dropping the guard clears the context.
    pub fn find_context<I, S>(&mut self, modules: I) -> ContextScope<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            self.context.insert(module);
        }
        ContextScope::enter(self)
    }

    /// Modules in the active find context
    pub fn context(&self) -> &Scope {
        &self.context
    }

    /// Exact-key lookup in the `Options` group of the run's config
    pub fn get_option(&self, name: &str) -> std::result::Result<&str, ConfigError> {
        self.options.option(name)
    }

    /// Raw entries of a config group; empty if the group is absent
    pub fn get_options(&self, group: &str) -> &[String] {
        self.options.get_options(group)
    }

    fn compile(&self, pattern: &str) -> Result<Pattern> {
        Pattern::new(pattern, self.match_options)
    }

    fn register(&mut self, rule: Rule) {
        let rule = rule.with_scope(self.context.clone());
        self.engine.push(rule);
    }

    /// Rename every element of `kind` whose native name matches `pattern`.
    ///
    /// `replacement` may use `$1`, `$2`, ... for captured groups. When
    /// `is_final` is false the resulting name is case-normalized on output.
    /// Only fails if `pattern` does not compile.
    pub fn tag_name(
        &mut self,
        kind: ElementKind,
        pattern: &str,
        replacement: &str,
        is_final: bool,
    ) -> Result<()> {
        self.tag_name_with(kind, pattern, replacement, is_final, MatchTarget::Original)
    }

    /// [`tag_name`](Self::tag_name) with an explicit match target
    pub fn tag_name_with(
        &mut self,
        kind: ElementKind,
        pattern: &str,
        replacement: &str,
        is_final: bool,
        target: MatchTarget,
    ) -> Result<()> {
        let pattern = self.compile(pattern)?;
        self.register(Rule::tag_name(kind, pattern, replacement, is_final).with_target(target));
        Ok(())
    }

    /// Remove every element of `kind` whose native name matches `pattern`
    pub fn remove(&mut self, kind: ElementKind, pattern: &str) -> Result<()> {
        self.remove_with(kind, pattern, MatchTarget::Original)
    }

    pub fn remove_with(&mut self, kind: ElementKind, pattern: &str, target: MatchTarget) -> Result<()> {
        let pattern = self.compile(pattern)?;
        self.register(Rule::remove(kind, pattern).with_target(target));
        Ok(())
    }

    /// Mark interfaces whose native name matches `pattern` as callbacks
    pub fn tag_callback(&mut self, pattern: &str) -> Result<()> {
        self.tag_callback_with(pattern, MatchTarget::Original)
    }

    pub fn tag_callback_with(&mut self, pattern: &str, target: MatchTarget) -> Result<()> {
        let pattern = self.compile(pattern)?;
        self.register(Rule::tag_callback(pattern).with_target(target));
        Ok(())
    }

    /// Route a header module's elements into an assembly and namespace
    pub fn map_include_to_namespace(
        &mut self,
        include: &str,
        assembly: &str,
        namespace: &str,
        folder: Option<&str>,
    ) {
        if let Some(existing) = self.includes.iter_mut().find(|m| m.include == include) {
            warn!(include, "include mapped twice, keeping the latest mapping");
            existing.assembly = assembly.to_string();
            existing.namespace = namespace.to_string();
            existing.folder = folder.map(str::to_string);
            return;
        }

        self.includes.push(IncludeMapping {
            include: include.to_string(),
            assembly: assembly.to_string(),
            namespace: namespace.to_string(),
            folder: folder.map(str::to_string),
        });
    }

    /// Declare a function group. A second declaration with the same name
    /// returns the existing group.
    pub fn create_function_group(
        &mut self,
        assembly: &str,
        namespace: &str,
        name: &str,
    ) -> FunctionGroupId {
        if let Some(index) = self.function_groups.iter().position(|g| g.name == name) {
            warn!(group = name, "function group already declared");
            return FunctionGroupId(index);
        }

        self.function_groups.push(FunctionGroup {
            name: name.to_string(),
            assembly: assembly.to_string(),
            namespace: namespace.to_string(),
            functions: Vec::new(),
        });
        FunctionGroupId(self.function_groups.len() - 1)
    }

    pub fn function_group(&self, id: FunctionGroupId) -> Option<&FunctionGroup> {
        self.function_groups.get(id.0)
    }

    /// Bind functions whose native name matches `pattern` to a group.
    ///
    /// Bindings are resolved after every rule of the session has run, so
    /// functions removed by the session never end up in a group.
    pub fn add_functions(&mut self, group: FunctionGroupId, pattern: &str) -> Result<()> {
        let pattern = self.compile(pattern)?;
        self.bindings.push(FunctionBinding {
            group,
            pattern,
            scope: self.context.clone(),
        });
        Ok(())
    }

    /// Rules registered so far, in order
    pub fn rules(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn includes(&self) -> &[IncludeMapping] {
        &self.includes
    }

    /// Stop recording and hand back what was registered
    pub fn finish(self) -> MappingPlan {
        MappingPlan {
            engine: self.engine,
            includes: self.includes,
            function_groups: self.function_groups,
            bindings: self.bindings,
        }
    }
}

/// Everything one procedure registered, ready to apply
#[derive(Debug, Clone)]
pub struct MappingPlan {
    engine: RuleEngine,
    includes: Vec<IncludeMapping>,
    function_groups: Vec<FunctionGroup>,
    bindings: Vec<FunctionBinding>,
}

/// Result of applying a [`MappingPlan`]
#[derive(Debug, Clone)]
pub struct AppliedPlan {
    pub stats: RuleStats,
    pub includes: Vec<IncludeMapping>,
    pub function_groups: Vec<FunctionGroup>,
}

impl MappingPlan {
    pub fn rules(&self) -> &RuleEngine {
        &self.engine
    }

    /// Run the rules in order, then bind functions to their groups
    pub fn apply(self, model: &mut HeaderModel) -> AppliedPlan {
        let mut stats = self.engine.apply(model);
        let mut function_groups = self.function_groups;

        for binding in &self.bindings {
            let ids: Vec<ElementId> = model
                .active_of_kind(ElementKind::Function)
                .filter(|e| binding.scope.contains(e.module()))
                .filter(|e| binding.pattern.is_match(e.original_name()))
                .map(|e| e.id())
                .collect();

            if let Some(group) = function_groups.get_mut(binding.group.0) {
                let added = group.merge(ids);
                debug!(group = %group.name, pattern = %binding.pattern, added, "bound functions");
                stats.functions_bound += added;
            }
        }

        AppliedPlan {
            stats,
            includes: self.includes,
            function_groups,
        }
    }
}
