//! Error types shared by the content pipeline

use thiserror::Error;

/// Result alias used throughout the content pipeline
pub type Result<T> = std::result::Result<T, BlogError>;

#[derive(Error, Debug)]
pub enum BlogError {
    /// Network or transport failure while talking to the content backend.
    #[error("content backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The request was valid but no record matched.
    #[error("no {content_type} document with uid {uid:?}")]
    NotFound { content_type: String, uid: String },

    /// The backend returned a record without a field the display model needs.
    #[error("malformed record: missing or invalid field `{field}`")]
    MalformedRecord { field: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl BlogError {
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field: field.into(),
        }
    }

    pub fn not_found(content_type: &str, uid: &str) -> Self {
        Self::NotFound {
            content_type: content_type.to_string(),
            uid: uid.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for BlogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed(format!("response body ({})", err))
        } else {
            Self::BackendUnavailable(err.to_string())
        }
    }
}
