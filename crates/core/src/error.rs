use thiserror::Error;

/// Result type for docguard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docguard operations
///
/// Translation failures (no subject, no match, a condition rejected by the
/// compilability gate) are never errors: they surface as empty conditions.
/// This type covers infrastructure and contract failures only.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The sentence parsing engine failed
    #[error("Parser error: {0}")]
    Parser(String),

    /// The type checker could not be run (not a compile diagnostic)
    #[error("Type check error: {0}")]
    TypeCheck(String),

    /// Serialization of input or output records failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A documentation tag was translated twice
    #[error("Tag '{tag}' of {method} already has a translation")]
    AlreadyTranslated { method: String, tag: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Self::Parser(msg.into())
    }

    /// Creates a type check error
    pub fn type_check(msg: impl Into<String>) -> Self {
        Self::TypeCheck(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates an already-translated contract error
    pub fn already_translated(method: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::AlreadyTranslated {
            method: method.into(),
            tag: tag.into(),
        }
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
