//! Built-in mappings embedded in the binary
//!
//! These are the mapping files for native modules every run needs. They are
//! embedded at compile time via `include_str!()` so a run works without any
//! mapping directory.

use crate::{Result, TomlMapping};

/// Direct3D common types (d3dcommon.h) shared by Direct3D 10 and 11
pub const D3DCOMMON_MAPPING: &str = include_str!("built_in/d3dcommon.toml");

/// Names and sources of every built-in mapping, in run order
pub fn built_in_mapping_sources() -> Vec<(&'static str, &'static str)> {
    vec![("d3dcommon", D3DCOMMON_MAPPING)]
}

/// Parse all built-in mappings
///
/// # Example
///
/// ```
/// use bindmap_rule_engine::load_built_in_mappings;
///
/// let mappings = load_built_in_mappings().expect("built-in mappings parse");
/// assert_eq!(mappings.len(), 1);
/// ```
pub fn load_built_in_mappings() -> Result<Vec<TomlMapping>> {
    built_in_mapping_sources()
        .into_iter()
        .map(|(_, source)| TomlMapping::from_toml_str(source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Generator, MappingProcedure};
    use bindmap_config::OptionTable;
    use bindmap_core::{ElementKind, HeaderModel};

    #[test]
    fn test_load_built_in_mappings() {
        let mappings = load_built_in_mappings().expect("Failed to load built-in mappings");
        let names: Vec<&str> = mappings.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["d3dcommon"]);
        assert_eq!(mappings[0].file().function_groups[0].name, "D3DCommon");
    }

    fn d3dcommon_model() -> HeaderModel {
        let mut model = HeaderModel::new();
        let topology = model.push(ElementKind::Enum, "D3D_PRIMITIVE_TOPOLOGY", "d3dcommon", None);
        for item in [
            "D3D_PRIMITIVE_TOPOLOGY_POINTLIST",
            "D3D_PRIMITIVE_TOPOLOGY_3_CONTROL_POINT_PATCHLIST",
            "D3D10_PRIMITIVE_TOPOLOGY_POINTLIST",
            "D3D11_PRIMITIVE_TOPOLOGY_POINTLIST",
        ] {
            model.push(ElementKind::EnumItem, item, "d3dcommon", Some(topology));
        }

        let level = model.push(ElementKind::Enum, "D3D_FEATURE_LEVEL", "d3dcommon", None);
        model.push(ElementKind::EnumItem, "D3D_FEATURE_LEVEL_11_0", "d3dcommon", Some(level));

        let driver = model.push(ElementKind::Enum, "D3D_DRIVER_TYPE", "d3dcommon", None);
        model.push(ElementKind::EnumItem, "D3D_DRIVER_TYPE_HARDWARE", "d3dcommon", Some(driver));

        model.push(ElementKind::Struct, "D3D_SHADER_MACRO", "d3dcommon", None);
        model.push(ElementKind::Interface, "ID3DInclude", "d3dcommon", None);
        model.push(ElementKind::Interface, "ID3D10Blob", "d3dcommon", None);

        // Outside the mapping's context, emitted verbatim
        model.push(ElementKind::Enum, "D3D11_USAGE", "d3d11", None);
        model
    }

    #[test]
    fn test_d3dcommon_mapping() {
        let mut options = OptionTable::new();
        options.push("Options", "AssemblyName = SlimDX");

        let mut generator = Generator::new(options).unwrap();
        for mapping in load_built_in_mappings().unwrap() {
            generator.add(mapping);
        }

        let mut model = d3dcommon_model();
        let output = generator.run(&mut model).unwrap();

        let names = |kind| -> Vec<String> {
            model.active_of_kind(kind).map(|e| e.output_name()).collect()
        };

        assert_eq!(
            names(ElementKind::Enum),
            vec!["PrimitiveTopology", "FeatureLevel", "DriverType", "D3D11_USAGE"]
        );
        assert_eq!(
            names(ElementKind::EnumItem),
            vec!["Pointlist", "PatchListWith3ControlPoints", "Level_11_0", "Hardware"]
        );
        assert_eq!(names(ElementKind::Struct), vec!["ShaderMacro"]);
        assert_eq!(names(ElementKind::Interface), vec!["Include", "Blob"]);

        let include = model.find(ElementKind::Interface, "ID3DInclude").unwrap();
        let blob = model.find(ElementKind::Interface, "ID3D10Blob").unwrap();
        assert!(include.is_callback());
        assert!(!blob.is_callback());

        let mapping = output.include("d3dcommon").unwrap();
        assert_eq!(mapping.assembly, "SlimDX");
        assert_eq!(mapping.namespace, "SlimDX.Direct3D");
        assert_eq!(mapping.folder.as_deref(), Some("Direct3D"));
        assert!(output.function_group("D3DCommon").is_some());
        assert_eq!(output.stats.elements_removed, 2);
    }
}
