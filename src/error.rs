use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors surfaced at the ambient boundaries of the graph.
///
/// Structural operations report precondition failures through `Option` and
/// `bool` results; this type covers configuration, logging setup, typed
/// attribute extraction and the `try_*` conversions.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A referenced element does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// A caller supplied an argument that cannot be honoured.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An attribute value held a different variant than requested.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The variant the caller asked for.
        expected: &'static str,
        /// The variant actually stored.
        found: &'static str,
    },
    /// Configuration could not be parsed or validated.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for GraphError {
    fn from(err: toml::de::Error) -> Self {
        GraphError::Config(err.to_string())
    }
}
