//! A single registered rule and how it rewrites the element table

use crate::engine::RuleStats;
use crate::matcher::{expand_template, Pattern};
use bindmap_core::{Element, ElementId, ElementKind, HeaderModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::trace;

/// Which name of an element a rule's pattern is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTarget {
    /// The name from the native header. Renames by earlier rules are
    /// invisible, so a later narrow rule overrides a broad one.
    #[default]
    Original,
    /// The name left by the rules applied so far
    Current,
}

/// Header modules a rule is restricted to. Empty means every module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope(BTreeSet<String>);

impl Scope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(modules.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, module: &str) -> bool {
        self.0.is_empty() || self.0.contains(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, module: impl Into<String>) {
        self.0.insert(module.into());
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

/// What a rule does to the elements it matches
#[derive(Debug, Clone)]
pub enum RuleAction {
    /// Rename using a replacement template (`$1`, `$2`, ...)
    TagName {
        /// Template already passed through [`expand_template`]
        template: String,
        /// Use the result verbatim instead of case-normalizing it
        is_final: bool,
    },
    /// Remove the element from the working set. Other kinds, including an
    /// enum's items, are left alone.
    Remove,
    /// Mark an interface as implemented on the managed side
    TagCallback,
}

/// A compiled, scoped rule
#[derive(Debug, Clone)]
pub struct Rule {
    kind: ElementKind,
    pattern: Pattern,
    action: RuleAction,
    target: MatchTarget,
    scope: Scope,
}

impl Rule {
    pub fn tag_name(
        kind: ElementKind,
        pattern: Pattern,
        replacement: &str,
        is_final: bool,
    ) -> Self {
        Self {
            kind,
            pattern,
            action: RuleAction::TagName {
                template: expand_template(replacement),
                is_final,
            },
            target: MatchTarget::default(),
            scope: Scope::all(),
        }
    }

    pub fn remove(kind: ElementKind, pattern: Pattern) -> Self {
        Self {
            kind,
            pattern,
            action: RuleAction::Remove,
            target: MatchTarget::default(),
            scope: Scope::all(),
        }
    }

    /// Callback tagging only ever applies to interfaces
    pub fn tag_callback(pattern: Pattern) -> Self {
        Self {
            kind: ElementKind::Interface,
            pattern,
            action: RuleAction::TagCallback,
            target: MatchTarget::default(),
            scope: Scope::all(),
        }
    }

    pub fn with_target(mut self, target: MatchTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn action(&self) -> &RuleAction {
        &self.action
    }

    pub fn target(&self) -> MatchTarget {
        self.target
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self.action {
            RuleAction::TagName { .. } => "tag_name",
            RuleAction::Remove => "remove",
            RuleAction::TagCallback => "tag_callback",
        }
    }

    fn subject<'e>(&self, element: &'e Element) -> &'e str {
        match self.target {
            MatchTarget::Original => element.original_name(),
            MatchTarget::Current => element.name(),
        }
    }

    /// Active, in-scope elements of this rule's kind whose target name matches
    pub fn matching<'m>(&'m self, model: &'m HeaderModel) -> impl Iterator<Item = &'m Element> {
        model
            .active_of_kind(self.kind)
            .filter(move |e| self.scope.contains(e.module()))
            .filter(move |e| self.pattern.is_match(self.subject(e)))
    }

    /// Apply the rule to the table. Returns how many elements it changed.
    pub fn apply(&self, model: &mut HeaderModel, stats: &mut RuleStats) -> usize {
        match &self.action {
            RuleAction::TagName { template, is_final } => {
                let renames: Vec<(ElementId, String)> = self
                    .matching(model)
                    .map(|e| {
                        let name = self.pattern.replace(self.subject(e), template).into_owned();
                        (e.id(), name)
                    })
                    .collect();

                let mut changed = 0;
                for (id, name) in renames {
                    trace!(element = id.index(), %name, "rename");
                    if model.rename(id, name, *is_final) {
                        changed += 1;
                    }
                }
                stats.elements_renamed += changed;
                changed
            }
            RuleAction::Remove => {
                let ids: Vec<ElementId> = self.matching(model).map(Element::id).collect();
                let changed = ids.into_iter().filter(|id| model.remove(*id)).count();
                stats.elements_removed += changed;
                changed
            }
            RuleAction::TagCallback => {
                let ids: Vec<ElementId> = self.matching(model).map(Element::id).collect();
                let changed = ids.into_iter().filter(|id| model.mark_callback(*id)).count();
                stats.callbacks_tagged += changed;
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchOptions;

    fn pattern(p: &str) -> Pattern {
        Pattern::new(p, MatchOptions::default()).unwrap()
    }

    #[test]
    fn test_tag_name_exact() {
        let mut model = HeaderModel::new();
        let matching = model.push(ElementKind::Enum, "D3D_PRIMITIVE_TOPOLOGY", "d3dcommon", None);
        let other = model.push(ElementKind::Enum, "D3D11_PRIMITIVE_TOPOLOGY", "d3d11", None);

        let rule = Rule::tag_name(
            ElementKind::Enum,
            pattern("^D3D_PRIMITIVE_TOPOLOGY$"),
            "PrimitiveTopology",
            true,
        );
        let mut stats = RuleStats::default();
        assert_eq!(rule.apply(&mut model, &mut stats), 1);

        assert_eq!(model.get(matching).unwrap().name(), "PrimitiveTopology");
        assert_eq!(model.get(other).unwrap().name(), "D3D11_PRIMITIVE_TOPOLOGY");
    }

    #[test]
    fn test_kind_is_respected() {
        let mut model = HeaderModel::new();
        let item = model.push(ElementKind::EnumItem, "D3D_NAME_UNDEFINED", "d3dcommon", None);
        let strukt = model.push(ElementKind::Struct, "D3D_NAME_UNDEFINED", "d3dcommon", None);

        let rule = Rule::remove(ElementKind::EnumItem, pattern("^D3D_NAME_.*"));
        rule.apply(&mut model, &mut RuleStats::default());

        assert!(model.get(item).unwrap().is_removed());
        assert!(!model.get(strukt).unwrap().is_removed());
    }

    #[test]
    fn test_remove_enum_keeps_its_items() {
        let mut model = HeaderModel::new();
        let name = model.push(ElementKind::Enum, "D3D_NAME", "d3dcommon", None);
        let position = model.push(ElementKind::EnumItem, "D3D_NAME_POSITION", "d3dcommon", Some(name));

        let mut stats = RuleStats::default();
        let changed = Rule::remove(ElementKind::Enum, pattern("^D3D_NAME$")).apply(&mut model, &mut stats);

        assert_eq!(changed, 1);
        assert_eq!(stats.elements_removed, 1);
        assert!(model.get(name).unwrap().is_removed());
        assert!(!model.get(position).unwrap().is_removed());
    }

    #[test]
    fn test_scope_limits_modules() {
        let mut model = HeaderModel::new();
        let common = model.push(ElementKind::Struct, "D3D_SHADER_MACRO", "d3dcommon", None);
        let d3d11 = model.push(ElementKind::Struct, "D3D_SHADER_MACRO", "d3d11", None);

        let rule = Rule::tag_name(ElementKind::Struct, pattern("^D3D(.*)"), "$1", false)
            .with_scope(Scope::new(["d3dcommon"]));
        rule.apply(&mut model, &mut RuleStats::default());

        assert_eq!(model.get(common).unwrap().name(), "_SHADER_MACRO");
        assert_eq!(model.get(d3d11).unwrap().name(), "D3D_SHADER_MACRO");
    }

    #[test]
    fn test_match_target_current() {
        let mut model = HeaderModel::new();
        let id = model.push(ElementKind::Enum, "D3D_NAME", "d3dcommon", None);
        model.rename(id, "ParameterName", true);

        let original = Rule::tag_name(ElementKind::Enum, pattern("^Parameter"), "X", true);
        assert_eq!(original.apply(&mut model, &mut RuleStats::default()), 0);

        let current = Rule::tag_name(ElementKind::Enum, pattern("^Parameter"), "Shader", true)
            .with_target(MatchTarget::Current);
        assert_eq!(current.apply(&mut model, &mut RuleStats::default()), 1);
        assert_eq!(model.get(id).unwrap().name(), "ShaderName");
    }

    #[test]
    fn test_tag_callback_only_marks_matching_interface() {
        let mut model = HeaderModel::new();
        let include = model.push(ElementKind::Interface, "ID3DInclude", "d3dcommon", None);
        let blob = model.push(ElementKind::Interface, "ID3D10Blob", "d3dcommon", None);
        let include_ex = model.push(ElementKind::Interface, "ID3DIncludeEx", "d3dcommon", None);

        let mut stats = RuleStats::default();
        Rule::tag_callback(pattern("^ID3DInclude$")).apply(&mut model, &mut stats);

        assert!(model.get(include).unwrap().is_callback());
        assert!(!model.get(blob).unwrap().is_callback());
        assert!(!model.get(include_ex).unwrap().is_callback());
        assert_eq!(stats.callbacks_tagged, 1);
    }
}
