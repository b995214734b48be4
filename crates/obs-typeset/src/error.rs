//! Rendering error type.

use std::path::PathBuf;

/// Error raised while rendering a book to ConTeXt source.
#[derive(Debug, thiserror::Error)]
pub enum TypesetError {
    /// A snippet or template file is absent from the resource set.
    #[error("resource not found: {0}")]
    ResourceMissing(PathBuf),

    /// A `{{name}}` placeholder in a layout snippet had no value.
    /// Unlike configuration tokens, these are always caller-supplied,
    /// so a miss means the snippet and the engine disagree.
    #[error("unresolved placeholder {{{{{name}}}}} in {snippet}")]
    UnresolvedPlaceholder { snippet: String, name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
