use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid document name: {name:?}")]
    InvalidName { name: String },

    #[error("document {name} is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    #[must_use]
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    #[must_use]
    pub fn malformed(name: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            name: name.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
