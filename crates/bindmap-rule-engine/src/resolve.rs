//! Resolved model handed to the binding emitter

use crate::procedure::MappingOutput;
use bindmap_core::{ElementId, ElementKind, HeaderModel};
use serde::Serialize;

/// Final view of one surviving element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub native_name: String,
    /// Name the emitter uses, already case-normalized where needed
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_callback: bool,
}

/// Function group with member names resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFunctionGroup {
    pub name: String,
    pub assembly: String,
    pub namespace: String,
    pub functions: Vec<String>,
}

/// Everything the emitter needs, in declaration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedModel {
    pub elements: Vec<ResolvedElement>,
    pub function_groups: Vec<ResolvedFunctionGroup>,
}

impl ResolvedModel {
    /// Resolve every emitted element against the run's include mappings.
    ///
    /// Items of a removed enum are still active in the table but have
    /// nothing to be emitted into, so they are left out here.
    pub fn build(model: &HeaderModel, output: &MappingOutput) -> Self {
        let elements = model
            .emitted()
            .map(|element| {
                let include = output.include(element.module());
                ResolvedElement {
                    id: element.id(),
                    kind: element.kind(),
                    native_name: element.original_name().to_string(),
                    name: element.output_name(),
                    assembly: include.map(|m| m.assembly.clone()),
                    namespace: include.map(|m| m.namespace.clone()),
                    folder: include.and_then(|m| m.folder.clone()),
                    parent: element.parent(),
                    is_callback: element.is_callback(),
                }
            })
            .collect();

        let function_groups = output
            .function_groups
            .iter()
            .map(|group| ResolvedFunctionGroup {
                name: group.name.clone(),
                assembly: group.assembly.clone(),
                namespace: group.namespace.clone(),
                functions: group
                    .functions
                    .iter()
                    .filter_map(|id| model.get(*id))
                    .filter(|e| !e.is_removed())
                    .map(|e| e.output_name())
                    .collect(),
            })
            .collect();

        Self {
            elements,
            function_groups,
        }
    }

    pub fn of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &ResolvedElement> {
        self.elements.iter().filter(move |e| e.kind == kind)
    }

    /// Elements emitted into a namespace
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a ResolvedElement> {
        self.elements
            .iter()
            .filter(move |e| e.namespace.as_deref() == Some(namespace))
    }
}
