use thiserror::Error;

/// Core error types for provisioning operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    #[error("{kind} not found: {identity}")]
    NotFound { kind: &'static str, identity: String },

    #[error("More than one {kind} named \"{name}\"; use an id to disambiguate")]
    AmbiguousIdentity { kind: &'static str, name: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidSpec error
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }

    /// Create a new NotFound error
    pub fn not_found(kind: &'static str, identity: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            identity: identity.into(),
        }
    }

    /// Create a new AmbiguousIdentity error
    pub fn ambiguous(kind: &'static str, name: impl Into<String>) -> Self {
        Self::AmbiguousIdentity {
            kind,
            name: name.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSpec(_) => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AmbiguousIdentity { .. } => ErrorCategory::Conflict,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Json(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Configuration,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Configuration => write!(f, "configuration"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
