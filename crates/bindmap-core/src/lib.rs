//! bindmap core - header model types shared by every bindmap crate.
//!
//! The header parser is an external tool; this crate only models its output:
//!
//! - [`HeaderModel`]: the element table mapping rules operate on
//! - [`Element`] and [`ElementKind`]: one native declaration and its kind
//! - [`normalize_name`]: case normalization applied to non-final names
//!
//! # Example
//!
//! ```
//! use bindmap_core::{ElementKind, HeaderModel};
//!
//! let mut model = HeaderModel::new();
//! let id = model.push(ElementKind::Enum, "D3D_DRIVER_TYPE", "d3dcommon", None);
//! model.rename(id, "DRIVER_TYPE", false);
//!
//! assert_eq!(model.get(id).unwrap().output_name(), "DriverType");
//! ```

pub mod error;
pub mod model;
pub mod naming;

pub use error::{Error, Result};
pub use model::{Element, ElementDecl, ElementId, ElementKind, HeaderFile, HeaderModel};
pub use naming::normalize_name;
