use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A stored timestamp is neither RFC 3339 nor a naive ISO-8601 datetime.
    #[error("invalid timestamp {value:?}")]
    InvalidTimestamp { value: String },
}

impl Error {
    #[must_use]
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
