use thiserror::Error;

/// Error type produced by collaborators (row sources, scanners, overrides, hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Canonical result for rowbind.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Target is not a usable record (nil, scalar, or layout mismatch).
    #[error("structural error: {0}")]
    Structural(String),

    /// Target list empty, or supplied counts mismatched.
    #[error("arity error: {0}")]
    Arity(String),

    #[error("column enumeration failed: {0}")]
    Columns(#[source] BoxError),

    #[error("cannot scan into empty list of fields")]
    EmptyScan,

    // Passed through unchanged from the row source.
    #[error(transparent)]
    Transfer(BoxError),

    #[error(transparent)]
    Iteration(BoxError),

    #[error("error when listing fields: {0}")]
    Override(#[source] BoxError),

    #[error(transparent)]
    PostScan(BoxError),

    /// A schema callback faulted while its descriptor was being built.
    #[error("introspection of {type_name} failed: {message}")]
    Introspection {
        type_name: &'static str,
        message: String,
    },

    #[error("invalid position map: {0}")]
    Map(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand used when a target cannot be resolved to a record.
    pub fn incompatible(kind: &str) -> Self {
        Error::Structural(format!("incompatible object type: {kind}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
