//! Error types for the header model.

use thiserror::Error;

/// Result type for header model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a header model.
#[derive(Debug, Error)]
pub enum Error {
    /// An element names a parent that does not exist in its module.
    #[error("Element '{element}' references unknown parent '{parent}' in module '{module}'")]
    UnknownParent {
        /// Name of the element with the dangling reference.
        element: String,
        /// Parent name that could not be found.
        parent: String,
        /// Header module the lookup was scoped to.
        module: String,
    },

    /// A parent reference names a declaration that cannot contain the
    /// element. Only enum items have parents, and only enums contain them.
    #[error("Element '{element}' ({kind}) cannot be nested in '{parent}' ({parent_kind})")]
    InvalidParent {
        element: String,
        kind: String,
        parent: String,
        parent_kind: String,
    },

    /// Header model JSON could not be parsed.
    #[error("Header model JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
