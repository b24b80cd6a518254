use std::error::Error as StdError;

/// Crate-wide result type for platform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed platform errors shared by every [`crate::ChatPlatform`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The platform refused the request for lack of permission.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// A referenced message, channel or member does not exist.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Operation is currently unavailable (not connected, not cached).
    #[error("platform unavailable: {message}")]
    Unavailable { message: String },

    /// Wrapped source error from the platform client.
    #[error("{context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn forbidden(message: impl std::fmt::Display) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound {
            what: what.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}
