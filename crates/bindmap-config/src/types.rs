use crate::manager::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the group holding the generator's global options
pub const OPTIONS_GROUP: &str = "Options";

/// Grouped raw option strings read from the config file.
///
/// Each group is an ordered list of `key = value` entries. Order matters:
/// the first entry with a given key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionTable {
    groups: BTreeMap<String, Vec<String>>,
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw entry to a group, creating the group if needed
    pub fn push(&mut self, group: impl Into<String>, entry: impl Into<String>) {
        self.groups.entry(group.into()).or_default().push(entry.into());
    }

    /// Replace a whole group
    pub fn set_group(&mut self, group: impl Into<String>, entries: Vec<String>) {
        self.groups.insert(group.into(), entries);
    }

    /// Exact-key lookup.
    ///
    /// Fails if the group is absent or empty, or if no entry has this key.
    /// Keys and values are trimmed; entries without `=` are skipped.
    pub fn get_option(&self, group: &str, key: &str) -> Result<&str, ConfigError> {
        let missing = || ConfigError::MissingOption {
            name: key.to_string(),
        };

        let entries = self
            .groups
            .get(group)
            .filter(|entries| !entries.is_empty())
            .ok_or_else(missing)?;

        entries
            .iter()
            .find_map(|entry| {
                let (k, v) = entry.split_once('=')?;
                (k.trim() == key).then(|| v.trim())
            })
            .ok_or_else(missing)
    }

    /// Exact-key lookup in the [`OPTIONS_GROUP`] group
    pub fn option(&self, key: &str) -> Result<&str, ConfigError> {
        self.get_option(OPTIONS_GROUP, key)
    }

    /// Boolean option in the [`OPTIONS_GROUP`] group.
    ///
    /// Returns `default` when the key is absent; a present but unparseable
    /// value is an error.
    pub fn get_bool_option(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.option(key) {
            Ok(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    name: key.to_string(),
                    value: value.to_string(),
                }),
            },
            Err(ConfigError::MissingOption { .. }) => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Group lookup. Absent groups yield an empty slice.
    pub fn get_options(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group names in sorted order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slimdx_table() -> OptionTable {
        let mut table = OptionTable::new();
        table.push("Options", "AssemblyName = SlimDX");
        table.push("Options", "Version = 2.0");
        table
    }

    #[test]
    fn test_get_option_exact_key() {
        let table = slimdx_table();
        assert_eq!(table.get_option("Options", "AssemblyName").unwrap(), "SlimDX");
        assert_eq!(table.option("Version").unwrap(), "2.0");
    }

    #[test]
    fn test_get_option_missing_key() {
        let table = slimdx_table();
        let err = table.get_option("Options", "Missing").unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption { ref name } if name == "Missing"));
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_get_option_missing_or_empty_group() {
        let mut table = slimdx_table();
        assert!(table.get_option("Bindings", "AssemblyName").is_err());

        table.set_group("Bindings", Vec::new());
        assert!(table.get_option("Bindings", "AssemblyName").is_err());
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = OptionTable::new();
        table.push("Options", "Namespace=SlimDX.Direct3D");
        table.push("Options", "Namespace = SlimDX.Other");
        assert_eq!(table.option("Namespace").unwrap(), "SlimDX.Direct3D");
    }

    #[test]
    fn test_entries_without_separator_are_skipped() {
        let mut table = OptionTable::new();
        table.push("Options", "AssemblyName");
        table.push("Options", "AssemblyName = SlimDX");
        assert_eq!(table.option("AssemblyName").unwrap(), "SlimDX");
    }

    #[test]
    fn test_get_options_never_fails() {
        let table = slimdx_table();
        assert!(table.get_options("NoSuchGroup").is_empty());
        assert_eq!(table.get_options("Options").len(), 2);
    }

    #[test]
    fn test_bool_option() {
        let mut table = slimdx_table();
        assert!(!table.get_bool_option("CaseInsensitive", false).unwrap());

        table.push("Options", "CaseInsensitive = TRUE");
        assert!(table.get_bool_option("CaseInsensitive", false).unwrap());

        let mut bad = OptionTable::new();
        bad.push("Options", "CaseInsensitive = maybe");
        assert!(matches!(
            bad.get_bool_option("CaseInsensitive", false),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
