//! TOML mapping files
//!
//! A mapping file is the declarative form of a mapping procedure:
//!
//! ```toml
//! [mapping]
//! name = "d3dcommon"
//! context = ["d3dcommon"]
//!
//! [[mapping.includes]]
//! include = "d3dcommon"
//! assembly = "{AssemblyName}"
//! namespace = "{AssemblyName}.Direct3D"
//!
//! [[rules]]
//! action = "tag_name"
//! kind = "enum"
//! pattern = "^D3D(.*)"
//! replacement = "$1"
//! final = false
//!
//! [[function_groups]]
//! name = "D3DCommon"
//! assembly = "{AssemblyName}"
//! namespace = "{AssemblyName}.Direct3D"
//! ```
//!
//! `{Key}` placeholders in assemblies and namespaces are looked up in the
//! `Options` group of the config file.

use crate::procedure::MappingProcedure;
use crate::rule::MatchTarget;
use crate::session::MappingSession;
use crate::{Result, RuleError};
use bindmap_core::ElementKind;
use serde::{Deserialize, Serialize};

/// A complete TOML mapping file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MappingFile {
    pub mapping: MappingMetadata,

    /// Rules, applied in file order
    #[serde(default)]
    pub rules: Vec<TomlRule>,

    #[serde(default)]
    pub function_groups: Vec<TomlFunctionGroup>,
}

/// Mapping header
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MappingMetadata {
    /// Mapping name (for logging and reports)
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Header modules the rules are restricted to. Empty means all.
    #[serde(default)]
    pub context: Vec<String>,

    #[serde(default)]
    pub includes: Vec<TomlInclude>,

    /// Priority (higher = run first)
    #[serde(default)]
    pub priority: Option<u32>,
}

/// Include-to-namespace mapping as written in TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TomlInclude {
    pub include: String,
    pub assembly: String,
    pub namespace: String,
    #[serde(default)]
    pub folder: Option<String>,
}

/// A single TOML rule
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TomlRule {
    TagName {
        kind: ElementKind,
        pattern: String,
        replacement: String,
        /// Use the replacement verbatim (default true)
        #[serde(rename = "final", default = "default_true")]
        is_final: bool,
        #[serde(default)]
        match_target: MatchTarget,
    },
    Remove {
        kind: ElementKind,
        pattern: String,
        #[serde(default)]
        match_target: MatchTarget,
    },
    TagCallback {
        pattern: String,
        #[serde(default)]
        match_target: MatchTarget,
    },
}

/// Function group declaration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TomlFunctionGroup {
    pub name: String,
    pub assembly: String,
    pub namespace: String,

    /// Patterns over native function names bound to this group
    #[serde(default)]
    pub functions: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// A mapping procedure backed by a TOML file
#[derive(Debug, Clone)]
pub struct TomlMapping {
    file: MappingFile,
}

impl TomlMapping {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: MappingFile = toml::from_str(contents)?;
        Ok(Self { file })
    }

    pub fn file(&self) -> &MappingFile {
        &self.file
    }

    pub fn priority(&self) -> u32 {
        self.file.mapping.priority.unwrap_or(0)
    }
}

impl MappingProcedure for TomlMapping {
    fn name(&self) -> &str {
        &self.file.mapping.name
    }

    fn map(&self, session: &mut MappingSession) -> Result<()> {
        let meta = &self.file.mapping;

        for include in &meta.includes {
            let assembly = expand_placeholders(&include.assembly, session)?;
            let namespace = expand_placeholders(&include.namespace, session)?;
            session.map_include_to_namespace(
                &include.include,
                &assembly,
                &namespace,
                include.folder.as_deref(),
            );
        }

        let mut scope = session.find_context(meta.context.iter().cloned());

        for rule in &self.file.rules {
            match rule {
                TomlRule::TagName {
                    kind,
                    pattern,
                    replacement,
                    is_final,
                    match_target,
                } => scope.tag_name_with(*kind, pattern, replacement, *is_final, *match_target)?,
                TomlRule::Remove {
                    kind,
                    pattern,
                    match_target,
                } => scope.remove_with(*kind, pattern, *match_target)?,
                TomlRule::TagCallback {
                    pattern,
                    match_target,
                } => scope.tag_callback_with(pattern, *match_target)?,
            }
        }

        for group in &self.file.function_groups {
            let assembly = expand_placeholders(&group.assembly, &scope)?;
            let namespace = expand_placeholders(&group.namespace, &scope)?;
            let id = scope.create_function_group(&assembly, &namespace, &group.name);
            for pattern in &group.functions {
                scope.add_functions(id, pattern)?;
            }
        }

        Ok(())
    }
}

/// Replace `{Key}` with the `Key` option. `{{` and `}}` are literal braces.
fn expand_placeholders(template: &str, session: &MappingSession) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(stripped) = tail.strip_prefix("{{") {
            out.push('{');
            rest = stripped;
        } else if let Some(stripped) = tail.strip_prefix("}}") {
            out.push('}');
            rest = stripped;
        } else if tail.starts_with('{') {
            let end = tail.find('}').ok_or_else(|| {
                RuleError::InvalidMapping(format!("Unclosed placeholder in '{}'", template))
            })?;
            let key = &tail[1..end];
            out.push_str(session.get_option(key)?);
            rest = &tail[end + 1..];
        } else {
            return Err(RuleError::InvalidMapping(format!(
                "Unmatched '}}' in '{}'",
                template
            )));
        }
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchOptions;
    use bindmap_config::{ConfigError, OptionTable};
    use std::sync::Arc;

    fn session() -> MappingSession {
        let mut options = OptionTable::new();
        options.push("Options", "AssemblyName = SlimDX");
        MappingSession::new(Arc::new(options), MatchOptions::default())
    }

    #[test]
    fn test_parse_rules() {
        let mapping = TomlMapping::from_toml_str(
            r#"
[mapping]
name = "test"
context = ["d3dcommon"]

[[rules]]
action = "tag_name"
kind = "enum_item"
pattern = "^D3D_FEATURE_LEVEL_(.*)"
replacement = "Level_$1"

[[rules]]
action = "remove"
kind = "enum_item"
pattern = "^D3D(\\d+)_SVC_.*"

[[rules]]
action = "tag_callback"
pattern = "^ID3DInclude$"
match_target = "current"
"#,
        )
        .unwrap();

        let rules = &mapping.file().rules;
        assert_eq!(rules.len(), 3);
        assert!(matches!(rules[0], TomlRule::TagName { is_final: true, .. }));
        assert!(matches!(
            rules[2],
            TomlRule::TagCallback {
                match_target: MatchTarget::Current,
                ..
            }
        ));
    }

    #[test]
    fn test_map_registers_in_file_order() {
        let mapping = TomlMapping::from_toml_str(
            r#"
[mapping]
name = "test"
context = ["d3dcommon"]

[[rules]]
action = "tag_name"
kind = "enum"
pattern = "^D3D(.*)"
replacement = "$1"
final = false

[[rules]]
action = "remove"
kind = "enum_item"
pattern = "^D3D(\\d+)_NAME_.*"
"#,
        )
        .unwrap();

        let mut session = session();
        mapping.map(&mut session).unwrap();

        let labels: Vec<&str> = session.rules().rules().iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["tag_name", "remove"]);
        assert!(session.context().is_all());
        assert!(session.rules().rules()[0].scope().contains("d3dcommon"));
        assert!(!session.rules().rules()[0].scope().contains("d3d11"));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = TomlMapping::from_toml_str(
            r#"
[mapping]
name = "test"

[[rules]]
action = "rename"
kind = "enum"
pattern = "x"
"#,
        );
        assert!(matches!(result, Err(RuleError::TomlError(_))));
    }

    #[test]
    fn test_placeholders() {
        let session = session();
        assert_eq!(
            expand_placeholders("{AssemblyName}.Direct3D", &session).unwrap(),
            "SlimDX.Direct3D"
        );
        assert_eq!(expand_placeholders("{{literal}}", &session).unwrap(), "{literal}");
        assert!(matches!(
            expand_placeholders("{Namespace}", &session),
            Err(RuleError::Config(ConfigError::MissingOption { .. }))
        ));
        assert!(matches!(
            expand_placeholders("{AssemblyName", &session),
            Err(RuleError::InvalidMapping(_))
        ));
    }
}
