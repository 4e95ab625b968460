//! Multi-source mapping loading
//!
//! Loads built-in mappings plus every `*.toml` file under a project's
//! mapping directory.

use crate::built_in::load_built_in_mappings;
use crate::constants::{MAX_DIRECTORY_DEPTH, MAX_TOML_FILE_SIZE};
use crate::{MappingProcedure, Result, RuleError, TomlMapping};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Loads mappings from multiple sources
#[derive(Debug, Clone, Default)]
pub struct MappingLoader {
    /// Include the mappings embedded in the binary
    include_built_in: bool,

    /// Project mapping directories, in the order given
    directories: Vec<PathBuf>,
}

impl MappingLoader {
    /// Loader with built-in mappings and no directories
    pub fn new() -> Self {
        Self {
            include_built_in: true,
            directories: Vec::new(),
        }
    }

    pub fn without_built_in(mut self) -> Self {
        self.include_built_in = false;
        self
    }

    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Load all mappings from all sources
    ///
    /// Built-in mappings come first. Within the directory mappings, higher
    /// priority runs first; ties keep path order so runs are deterministic.
    pub fn load_all(&self) -> Result<Vec<TomlMapping>> {
        let mut all = Vec::new();

        if self.include_built_in {
            all.extend(load_built_in_mappings()?);
        }

        let mut project = Vec::new();
        for dir in &self.directories {
            project.extend(self.load_from_directory(dir)?);
        }

        // Stable sort keeps path order within a priority
        project.sort_by(|a, b| b.priority().cmp(&a.priority()));
        all.extend(project);

        debug!(count = all.len(), "loaded mappings");
        Ok(all)
    }

    /// Load mappings from a specific directory
    pub fn load_from_directory(&self, dir: &Path) -> Result<Vec<TomlMapping>> {
        if !dir.is_dir() {
            return Err(RuleError::LoadError {
                path: dir.display().to_string(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "mapping directory does not exist",
                )),
            });
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(false)
            .max_depth(MAX_DIRECTORY_DEPTH)
        {
            let entry = entry.map_err(|e| RuleError::LoadError {
                path: dir.display().to_string(),
                source: Box::new(e),
            })?;

            let path = entry.path();
            let is_toml = path.extension().is_some_and(|ext| ext == "toml");
            let is_hidden = entry.file_name().to_string_lossy().starts_with('.');
            if entry.file_type().is_file() && is_toml && !is_hidden {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();

        paths.iter().map(|path| load_from_file(path)).collect()
    }
}

/// Load a single mapping file. Every failure names the file.
pub fn load_from_file(path: &Path) -> Result<TomlMapping> {
    let load_error = |e: std::io::Error| RuleError::LoadError {
        path: path.display().to_string(),
        source: Box::new(e),
    };

    let metadata = fs::metadata(path).map_err(load_error)?;
    if metadata.len() > MAX_TOML_FILE_SIZE {
        return Err(RuleError::LoadError {
            path: path.display().to_string(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "File exceeds maximum size of {}MB",
                    MAX_TOML_FILE_SIZE / 1_048_576
                ),
            )),
        });
    }

    let contents = fs::read_to_string(path).map_err(load_error)?;
    let mapping = TomlMapping::from_toml_str(&contents).map_err(|e| RuleError::LoadError {
        path: path.display().to_string(),
        source: Box::new(e),
    })?;

    if mapping.file().rules.is_empty() && mapping.file().function_groups.is_empty() {
        warn!(path = %path.display(), mapping = mapping.name(), "mapping declares nothing");
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MAPPING: &str = r#"
[mapping]
name = "NAME"
priority = PRIORITY

[[rules]]
action = "remove"
kind = "struct"
pattern = "^D3D11_.*"
"#;

    fn write_mapping(dir: &Path, file: &str, name: &str, priority: u32) {
        let contents = MAPPING
            .replace("NAME", name)
            .replace("PRIORITY", &priority.to_string());
        fs::write(dir.join(file), contents).unwrap();
    }

    #[test]
    fn test_load_directory_sorted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        write_mapping(temp.path(), "b.toml", "b", 0);
        write_mapping(temp.path(), "a.toml", "a", 0);
        write_mapping(&temp.path().join("nested"), "c.toml", "c", 10);
        fs::write(temp.path().join("notes.txt"), "not a mapping").unwrap();
        write_mapping(temp.path(), ".hidden.toml", "hidden", 50);

        let loader = MappingLoader::new()
            .without_built_in()
            .with_directory(temp.path());
        let mappings = loader.load_all().unwrap();

        let names: Vec<&str> = mappings.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_built_ins_first() {
        let temp = TempDir::new().unwrap();
        write_mapping(temp.path(), "d3d11.toml", "d3d11", 500);

        let mappings = MappingLoader::new()
            .with_directory(temp.path())
            .load_all()
            .unwrap();
        let names: Vec<&str> = mappings.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["d3dcommon", "d3d11"]);
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = MappingLoader::new()
            .with_directory(temp.path().join("missing"))
            .load_all();
        assert!(matches!(result, Err(RuleError::LoadError { .. })));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.toml"), "[mapping\nname = ").unwrap();

        let err = MappingLoader::new()
            .without_built_in()
            .with_directory(temp.path())
            .load_all()
            .unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("d3d11.toml");

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, RuleError::LoadError { ref path, .. } if path.ends_with("d3d11.toml")));
        assert!(err.to_string().contains("d3d11.toml"));
    }

    #[test]
    fn test_unreadable_contents_report_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.toml");
        fs::write(&path, [0x5b, 0xe9, 0x5d]).unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, RuleError::LoadError { .. }));
        assert!(err.to_string().contains("latin1.toml"));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("huge.toml");
        fs::write(&path, "#".repeat(MAX_TOML_FILE_SIZE as usize + 1)).unwrap();

        assert!(matches!(load_from_file(&path), Err(RuleError::LoadError { .. })));
    }
}
