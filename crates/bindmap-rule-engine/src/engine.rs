//! Rule engine - applies registered rules to the element table
//!
//! Rules run strictly in registration order. Later rules are usually
//! narrower exceptions to broader ones registered earlier, so the list is
//! never reordered or deduplicated.

use crate::rule::Rule;
use bindmap_core::HeaderModel;
use serde::Serialize;
use std::ops::AddAssign;
use tracing::debug;

/// Ordered list of rules
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    pub(crate) rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after every rule registered so far
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply all rules to the table in registration order.
    ///
    /// Never fails: a rule that matches nothing is a no-op.
    pub fn apply(&self, model: &mut HeaderModel) -> RuleStats {
        let mut stats = RuleStats::default();

        for (index, rule) in self.rules.iter().enumerate() {
            let changed = rule.apply(model, &mut stats);
            stats.rules_applied += 1;
            if changed == 0 {
                stats.rules_unmatched += 1;
            }

            debug!(
                index,
                action = rule.label(),
                kind = %rule.kind(),
                pattern = %rule.pattern(),
                changed,
                "applied rule"
            );
        }

        stats
    }
}

impl Extend<Rule> for RuleEngine {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        self.rules.extend(iter);
    }
}

/// Statistics from rule application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    pub rules_applied: usize,
    /// Rules that changed no element
    pub rules_unmatched: usize,
    pub elements_renamed: usize,
    pub elements_removed: usize,
    pub callbacks_tagged: usize,
    pub functions_bound: usize,
}

impl AddAssign for RuleStats {
    fn add_assign(&mut self, other: Self) {
        self.rules_applied += other.rules_applied;
        self.rules_unmatched += other.rules_unmatched;
        self.elements_renamed += other.elements_renamed;
        self.elements_removed += other.elements_removed;
        self.callbacks_tagged += other.callbacks_tagged;
        self.functions_bound += other.functions_bound;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{MatchOptions, Pattern};
    use bindmap_core::ElementKind;

    fn pattern(p: &str) -> Pattern {
        Pattern::new(p, MatchOptions::default()).unwrap()
    }

    fn level_model() -> HeaderModel {
        let mut model = HeaderModel::new();
        model.push(ElementKind::EnumItem, "D3D_FEATURE_LEVEL_11_0", "d3dcommon", None);
        model.push(ElementKind::EnumItem, "D3D_DRIVER_TYPE_HARDWARE", "d3dcommon", None);
        model
    }

    fn output_names(model: &HeaderModel) -> Vec<String> {
        model.active().map(|e| e.output_name()).collect()
    }

    #[test]
    fn test_create_engine() {
        let engine = RuleEngine::new();
        assert_eq!(engine.len(), 0);
        assert_eq!(engine.apply(&mut HeaderModel::new()), RuleStats::default());
    }

    #[test]
    fn test_registration_order_is_observable() {
        let broad = Rule::tag_name(ElementKind::EnumItem, pattern("^D3D(.*)"), "$1", false);
        let narrow = Rule::tag_name(
            ElementKind::EnumItem,
            pattern("^D3D_FEATURE_LEVEL_(.*)"),
            "Level_$1",
            true,
        );

        let mut in_order = RuleEngine::new();
        in_order.extend([broad.clone(), narrow.clone()]);
        let mut model = level_model();
        in_order.apply(&mut model);
        assert_eq!(output_names(&model), vec!["Level_11_0", "DriverTypeHardware"]);

        let mut reversed = RuleEngine::new();
        reversed.extend([narrow, broad]);
        let mut model = level_model();
        reversed.apply(&mut model);
        assert_eq!(output_names(&model), vec!["FeatureLevel11_0", "DriverTypeHardware"]);
    }

    #[test]
    fn test_removed_elements_never_resurface() {
        let mut engine = RuleEngine::new();
        engine.push(Rule::remove(ElementKind::EnumItem, pattern("^D3D_FEATURE_LEVEL_.*")));
        engine.push(Rule::tag_name(
            ElementKind::EnumItem,
            pattern("^D3D_FEATURE_LEVEL_.*"),
            "Level",
            true,
        ));

        let mut model = level_model();
        let stats = engine.apply(&mut model);

        assert_eq!(stats.elements_removed, 1);
        assert_eq!(stats.elements_renamed, 0);
        assert_eq!(stats.rules_unmatched, 1);
        assert!(model.active().all(|e| e.name() != "Level"));
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = RuleStats::default();
        total += RuleStats {
            rules_applied: 2,
            elements_renamed: 3,
            ..Default::default()
        };
        total += RuleStats {
            rules_applied: 1,
            elements_removed: 4,
            ..Default::default()
        };
        assert_eq!(total.rules_applied, 3);
        assert_eq!(total.elements_renamed, 3);
        assert_eq!(total.elements_removed, 4);
    }
}
