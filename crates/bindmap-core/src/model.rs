//! Header model: the element table every mapping rule operates on.

use crate::error::{Error, Result};
use crate::naming::normalize_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Kind of a native declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A C enumeration
    Enum,
    /// A single enumerator inside an enumeration
    EnumItem,
    /// A C struct
    Struct,
    /// A COM interface
    Interface,
    /// A free function
    Function,
}

impl ElementKind {
    /// Returns all kinds in a consistent order
    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Enum,
            ElementKind::EnumItem,
            ElementKind::Struct,
            ElementKind::Interface,
            ElementKind::Function,
        ]
    }

    /// Returns the snake_case name used in model and mapping files
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Enum => "enum",
            ElementKind::EnumItem => "enum_item",
            ElementKind::Struct => "struct",
            ElementKind::Interface => "interface",
            ElementKind::Function => "function",
        }
    }

    /// Parse a kind from its snake_case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of an element within one [`HeaderModel`].
///
/// Ids are never reused or shifted, so they survive renames and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl ElementId {
    /// Index of this element in its table
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named native declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    original_name: String,
    name: String,
    is_final_name: bool,
    module: String,
    parent: Option<ElementId>,
    is_callback: bool,
    removed: bool,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Name as it appeared in the native header
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Name after every rename applied so far
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the current name is used verbatim on output
    pub fn is_final_name(&self) -> bool {
        self.is_final_name
    }

    /// Name the emitter should use.
    ///
    /// Non-final names are case-normalized (`POINT_LIST` becomes `PointList`).
    pub fn output_name(&self) -> String {
        if self.is_final_name {
            self.name.clone()
        } else {
            normalize_name(&self.name)
        }
    }

    /// Header module (include name) the element was declared in
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Whether the interface is only implemented on the managed side
    pub fn is_callback(&self) -> bool {
        self.is_callback
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Element table produced by the header parser.
///
/// Removal is a tombstone: removed elements keep their slot so ids stay
/// stable, and nothing can bring them back. Ids are handed out in push
/// order, so a parent always precedes its children.
#[derive(Debug, Clone, Default)]
pub struct HeaderModel {
    elements: Vec<Element>,
}

impl HeaderModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration and return its id.
    ///
    /// Names start out final: an element no rule renames is emitted under
    /// its native name.
    pub fn push(
        &mut self,
        kind: ElementKind,
        name: impl Into<String>,
        module: impl Into<String>,
        parent: Option<ElementId>,
    ) -> ElementId {
        let id = ElementId(self.elements.len());
        let name = name.into();
        self.elements.push(Element {
            id,
            kind,
            original_name: name.clone(),
            name,
            is_final_name: true,
            module: module.into(),
            parent,
            is_callback: false,
            removed: false,
        });
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Total number of slots, removed elements included
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements that have not been removed, in declaration order
    pub fn active(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| !e.removed)
    }

    pub fn active_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.active().filter(move |e| e.kind == kind)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// First active element of `kind` with the given native name
    pub fn find(&self, kind: ElementKind, original_name: &str) -> Option<&Element> {
        self.active_of_kind(kind)
            .find(|e| e.original_name == original_name)
    }

    /// Direct children of an element (enum items of an enum)
    pub fn children(&self, id: ElementId) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.parent == Some(id))
    }

    /// Distinct header modules present in the table
    pub fn modules(&self) -> BTreeSet<&str> {
        self.elements.iter().map(|e| e.module.as_str()).collect()
    }

    /// Rename an element. Returns false if the element is removed or unknown.
    pub fn rename(&mut self, id: ElementId, name: impl Into<String>, is_final: bool) -> bool {
        match self.elements.get_mut(id.0) {
            Some(element) if !element.removed => {
                element.name = name.into();
                element.is_final_name = is_final;
                true
            }
            _ => false,
        }
    }

    /// Mark an element as a callback interface. Returns false if it is
    /// removed, unknown, or already marked.
    pub fn mark_callback(&mut self, id: ElementId) -> bool {
        match self.elements.get_mut(id.0) {
            Some(element) if !element.removed && !element.is_callback => {
                element.is_callback = true;
                true
            }
            _ => false,
        }
    }

    /// Remove one element from the working set.
    ///
    /// Only this element is tombstoned; its children stay active. Returns
    /// false if it was already removed or is unknown.
    pub fn remove(&mut self, id: ElementId) -> bool {
        match self.elements.get_mut(id.0) {
            Some(element) if !element.removed => {
                element.removed = true;
                true
            }
            _ => false,
        }
    }

    /// Active elements whose ancestors are all active, in declaration order.
    ///
    /// The items of a removed enum stay in the working set but are not
    /// emitted.
    pub fn emitted(&self) -> impl Iterator<Item = &Element> {
        let mut hidden = vec![false; self.elements.len()];
        for element in &self.elements {
            let parent_hidden = element
                .parent
                .and_then(|p| hidden.get(p.0).copied())
                .unwrap_or(false);
            hidden[element.id.0] = element.removed || parent_hidden;
        }

        self.elements
            .iter()
            .zip(hidden)
            .filter(|(_, hidden)| !hidden)
            .map(|(element, _)| element)
    }

    /// Build a model from the JSON emitted by the header parser.
    ///
    /// Parents are referenced by native name and must be declared, in the
    /// same module, before their children.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: HeaderFile = serde_json::from_str(json)?;
        Self::from_declarations(file.elements)
    }

    /// Build a model from already-deserialized declarations
    pub fn from_declarations(declarations: Vec<ElementDecl>) -> Result<Self> {
        let mut model = Self::new();
        let mut enums: HashMap<(String, String), ElementId> = HashMap::new();
        let mut declared: HashMap<(String, String), ElementKind> = HashMap::new();

        for decl in declarations {
            let parent = match &decl.parent {
                Some(parent) => {
                    let key = (decl.module.clone(), parent.clone());
                    if let (ElementKind::EnumItem, Some(id)) = (decl.kind, enums.get(&key)) {
                        Some(*id)
                    } else if let Some(found) = declared.get(&key) {
                        return Err(Error::InvalidParent {
                            element: decl.name.clone(),
                            kind: decl.kind.to_string(),
                            parent: parent.clone(),
                            parent_kind: found.to_string(),
                        });
                    } else {
                        return Err(Error::UnknownParent {
                            element: decl.name.clone(),
                            parent: parent.clone(),
                            module: decl.module.clone(),
                        });
                    }
                }
                None => None,
            };

            let key = (decl.module.clone(), decl.name.clone());
            let kind = decl.kind;
            let id = model.push(kind, decl.name, decl.module, parent);
            if kind == ElementKind::Enum {
                enums.entry(key.clone()).or_insert(id);
            }
            declared.entry(key).or_insert(kind);
        }

        Ok(model)
    }
}

/// Header parser output file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeaderFile {
    #[serde(default)]
    pub elements: Vec<ElementDecl>,
}

/// One declaration as written by the header parser
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElementDecl {
    pub kind: ElementKind,
    pub name: String,
    pub module: String,
    /// Native name of the enclosing declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}
