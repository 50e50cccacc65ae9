//! Router error taxonomy.
//!
//! Every error is raised synchronously to the caller of `register_*` or
//! `run_route`. Nothing is retried and there is no fallback route.

use thiserror::Error;

use crate::routing::value::ValueKind;

/// Boxed error returned from a handler body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while registering or dispatching routes.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A dynamic segment is not of the form `{name:type}`.
    #[error("malformed dynamic segment `{segment}`, expected `{{name:type}}`")]
    Format { segment: String },

    /// The type keyword of a dynamic segment is not recognized.
    #[error("unsupported parameter type `{keyword}`")]
    UnsupportedType { keyword: String },

    /// Declared parameter counts disagree.
    #[error("parameter count mismatch: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// A dynamic segment names a parameter the handler does not declare.
    #[error("handler has no parameter named `{name}`")]
    UnknownParameter { name: String },

    /// A dynamic segment's type disagrees with the handler parameter's type.
    #[error("type mismatch for parameter `{name}`: template declares {declared}, handler expects {expected}")]
    TypeMismatch {
        name: String,
        declared: ValueKind,
        expected: ValueKind,
    },

    /// The same parameter name appears twice in a template or handler.
    #[error("parameter `{name}` is declared more than once")]
    DuplicateParameter { name: String },

    /// The template has no segments left after normalization.
    #[error("route template has no segments")]
    EmptyTemplate,

    /// No registered route matches the input.
    #[error("no route matches `{route}`")]
    RouteNotFound { route: String },

    /// The handler body returned an error.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    /// The admission gate was closed while waiting for a slot.
    #[error("admission gate closed")]
    GateClosed,
}

impl RouterError {
    /// Returns true for errors produced while resolving a route at run time.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::RouteNotFound { .. })
    }
}

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;
