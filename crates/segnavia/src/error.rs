//! Menu error types.

use thiserror::Error;

/// Errors surfaced by menu construction and rendering.
#[derive(Debug, Error)]
pub enum MenuError {
    /// A dotted placeholder referenced a binding attribute that does not
    /// exist. Fatal for the current render.
    #[error("binding path `{path}` has no attribute `{segment}`")]
    BindingLookup { path: String, segment: String },

    /// The resolved presenter identifier is not registered.
    #[error("unknown presenter `{0}`")]
    UnknownPresenter(String),

    /// No menu with the given name exists in the collection.
    #[error("unknown menu `{0}`")]
    UnknownMenu(String),

    /// An item's shape violates the invariants of its kind.
    #[error("malformed menu item: {0}")]
    MalformedItem(String),

    #[error("template error")]
    Template(#[from] tera::Error),

    #[error("invalid menu definition")]
    Definition(#[from] serde_json::Error),
}

/// Result type alias using MenuError.
pub type MenuResult<T> = Result<T, MenuError>;
